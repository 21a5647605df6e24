/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be strictly increasing with at least two points. Outside the
/// table the first and last segments are extended, not clamped.
pub fn interp_one(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let hi = match xp.partition_point(|&v| v < x) {
        0 => 1,
        i if i >= xp.len() => xp.len() - 1,
        i => i,
    };
    let lo = hi - 1;
    let t = (x - xp[lo]) / (xp[hi] - xp[lo]);
    fp[lo] + t * (fp[hi] - fp[lo])
}

pub fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    x.iter().map(|&xi| interp_one(xi, xp, fp)).collect()
}

/// Log-log linear interpolation: `exp(interp(ln x, ln xp, ln fp))`.
///
/// Power laws are reproduced exactly, including beyond the table.
pub fn interp_loglog(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    let log_xp: Vec<f64> = xp.iter().map(|v| v.ln()).collect();
    let log_fp: Vec<f64> = fp.iter().map(|v| v.ln()).collect();
    x.iter()
        .map(|&xi| interp_one(xi.ln(), &log_xp, &log_fp).exp())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interp_basic() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [0.0, 10.0, 20.0];
        let result = interp(&[0.5, 1.5, 1.0], &xp, &fp);
        assert_relative_eq!(result[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(result[1], 15.0, epsilon = 1e-12);
        assert_relative_eq!(result[2], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interp_extends_boundary_segments() {
        let xp = [1.0, 2.0, 3.0];
        let fp = [10.0, 20.0, 40.0];
        let result = interp(&[0.0, 4.0], &xp, &fp);
        assert_relative_eq!(result[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(result[1], 60.0, epsilon = 1e-12);
    }

    #[test]
    fn test_loglog_power_law() {
        let xp = [1.0, 10.0, 100.0];
        let fp: Vec<f64> = xp.iter().map(|x: &f64| 3.0 * x.powf(-2.5)).collect();
        let result = interp_loglog(&[0.5, 5.0, 1000.0], &xp, &fp);
        for (x, got) in [0.5_f64, 5.0, 1000.0].iter().zip(result) {
            assert_relative_eq!(got, 3.0 * x.powf(-2.5), max_relative = 1e-12);
        }
    }
}
