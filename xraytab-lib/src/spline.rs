use crate::error::{Result, XrayDbError};

/// Index pair `(lo, hi)` of the interval used for `x`: the first knot at or
/// above `x`, clamped so that both ends of the table reuse the boundary
/// interval.
#[inline]
fn bracket(xin: &[f64], x: f64) -> (usize, usize) {
    let hi = match xin.partition_point(|&v| v < x) {
        0 => 1,
        i if i >= xin.len() => xin.len() - 1,
        i => i,
    };
    (hi - 1, hi)
}

#[inline]
fn cubic(xin: &[f64], yin: &[f64], y2: &[f64], lo: usize, hi: usize, x: f64) -> f64 {
    let h = xin[hi] - xin[lo];
    let a = (xin[hi] - x) / h;
    let b = (x - xin[lo]) / h;
    a * yin[lo] + b * yin[hi] + (h * h / 6.0) * ((a * a * a - a) * y2[lo] + (b * b * b - b) * y2[hi])
}

/// Cubic spline evaluation with tabulated second derivatives (Elam tables).
///
/// `xin` may repeat a value at an absorption edge; a query never lands in a
/// zero-width interval because the bracket always picks the first knot at
/// or above `x`. Queries outside the table continue the boundary cubic, so
/// callers clamp first when they want boundary values.
pub fn elam_spline(xin: &[f64], yin: &[f64], yspl: &[f64], xout: &[f64]) -> Result<Vec<f64>> {
    if xin.len() < 2 || yin.len() != xin.len() || yspl.len() != xin.len() {
        return Err(XrayDbError::DataError(format!(
            "spline table needs at least two co-indexed knots, got {}/{}/{}",
            xin.len(),
            yin.len(),
            yspl.len()
        )));
    }
    xout.iter()
        .map(|&x| {
            let (lo, hi) = bracket(xin, x);
            if xin[hi] - xin[lo] <= 0.0 {
                return Err(XrayDbError::DataError(format!(
                    "zero-width spline interval at x = {x}"
                )));
            }
            Ok(cubic(xin, yin, yspl, lo, hi, x))
        })
        .collect()
}

/// A cubic spline through (or, when smoothed, near) data points.
///
/// Evaluation outside the knots continues the boundary cubic.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    y2s: Vec<f64>,
}

impl CubicSpline {
    /// Natural cubic spline interpolating `(xs, ys)`.
    pub fn natural(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        check_knots(&xs, &ys)?;
        let n = xs.len();
        let mut y2s = vec![0.0; n];
        if n < 3 {
            return Ok(Self { xs, ys, y2s });
        }

        let mut u = vec![0.0; n - 1];
        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2s[i - 1] + 2.0;
            y2s[i] = (sig - 1.0) / p;
            let d = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * d / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }
        for k in (0..n - 2).rev() {
            y2s[k + 1] = y2s[k + 1] * y2s[k + 2] + u[k + 1];
        }
        Ok(Self { xs, ys, y2s })
    }

    /// Cubic smoothing spline whose residual sum of squares equals
    /// `smoothing`.
    ///
    /// `smoothing <= 0` interpolates. When `smoothing` is at least the
    /// residual of the least-squares line, that line is returned.
    pub fn smoothing(xs: Vec<f64>, ys: Vec<f64>, smoothing: f64) -> Result<Self> {
        if !(smoothing > 0.0) {
            return Self::natural(xs, ys);
        }
        check_knots(&xs, &ys)?;
        let (line, line_rss) = least_squares_line(&xs, &ys);
        if xs.len() < 3 || smoothing >= line_rss {
            let ys = xs.iter().map(|&x| line.0 + line.1 * x).collect();
            let y2s = vec![0.0; xs.len()];
            return Ok(Self { xs, ys, y2s });
        }

        let system = Reinsch::new(&xs, &ys);
        let rss = |lam: f64| system.solve(lam).map(|fit| fit.rss);

        // bracket the multiplier by decades, then bisect in log space
        let (mut lo, mut hi) = (1.0_f64, 1.0_f64);
        if rss(hi)? < smoothing {
            while rss(hi)? < smoothing {
                lo = hi;
                hi *= 10.0;
                if !hi.is_finite() {
                    return Err(XrayDbError::DataError(
                        "smoothing spline did not converge".to_string(),
                    ));
                }
            }
        } else {
            while rss(lo)? > smoothing {
                hi = lo;
                lo /= 10.0;
                if lo < 1e-300 {
                    break;
                }
            }
        }
        for _ in 0..100 {
            let mid = (lo * hi).sqrt();
            let f = rss(mid)?;
            if (f - smoothing).abs() <= 1e-12 * smoothing {
                lo = mid;
                hi = mid;
                break;
            }
            if f < smoothing {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let fit = system.solve((lo * hi).sqrt())?;
        Ok(Self {
            xs,
            ys: fit.values,
            y2s: fit.second_derivatives,
        })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        if self.xs.len() == 1 {
            return self.ys[0];
        }
        let (lo, hi) = bracket(&self.xs, x);
        cubic(&self.xs, &self.ys, &self.y2s, lo, hi, x)
    }

    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

fn check_knots(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.is_empty() || xs.len() != ys.len() {
        return Err(XrayDbError::DataError(format!(
            "spline needs matching non-empty knots, got {} x and {} y",
            xs.len(),
            ys.len()
        )));
    }
    if xs.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(XrayDbError::DataError(
            "spline knots must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}

/// Returns `((intercept, slope), residual sum of squares)`.
fn least_squares_line(xs: &[f64], ys: &[f64]) -> ((f64, f64), f64) {
    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;
    let sxx: f64 = xs.iter().map(|x| (x - mx) * (x - mx)).sum();
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = my - slope * mx;
    let rss = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| {
            let r = y - (intercept + slope * x);
            r * r
        })
        .sum();
    ((intercept, slope), rss)
}

struct SmoothFit {
    values: Vec<f64>,
    second_derivatives: Vec<f64>,
    rss: f64,
}

/// Reinsch formulation of the smoothing spline.
///
/// Unknowns are the second derivatives at the interior knots; with the
/// tridiagonal `R` and the second-difference matrix `Q` the fit solves
/// `(R + lam QtQ) gamma = Qt y` and sets `g = y - lam Q gamma`.
struct Reinsch<'a> {
    ys: &'a [f64],
    h: Vec<f64>,
    // the three non-zero entries of each column of Q
    q: Vec<[f64; 3]>,
    qty: Vec<f64>,
}

impl<'a> Reinsch<'a> {
    fn new(xs: &[f64], ys: &'a [f64]) -> Self {
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let m = xs.len() - 2;
        let q: Vec<[f64; 3]> = (0..m)
            .map(|k| {
                let (a, b) = (1.0 / h[k], 1.0 / h[k + 1]);
                [a, -(a + b), b]
            })
            .collect();
        let qty = (0..m)
            .map(|k| q[k][0] * ys[k] + q[k][1] * ys[k + 1] + q[k][2] * ys[k + 2])
            .collect();
        Reinsch { ys, h, q, qty }
    }

    fn solve(&self, lam: f64) -> Result<SmoothFit> {
        let m = self.q.len();
        let (h, q) = (&self.h, &self.q);

        // lower band of R + lam QtQ: band[k][d] = A[k][k - d]
        let mut band = vec![[0.0; 3]; m];
        for k in 0..m {
            band[k][0] = (h[k] + h[k + 1]) / 3.0
                + lam * (q[k][0] * q[k][0] + q[k][1] * q[k][1] + q[k][2] * q[k][2]);
            if k >= 1 {
                band[k][1] = h[k] / 6.0 + lam * (q[k][0] * q[k - 1][1] + q[k][1] * q[k - 1][2]);
            }
            if k >= 2 {
                band[k][2] = lam * q[k][0] * q[k - 2][2];
            }
        }
        let gamma = banded_cholesky_solve(band, &self.qty)?;

        let n = self.ys.len();
        let mut values = self.ys.to_vec();
        let mut rss = 0.0;
        for (r, value) in values.iter_mut().enumerate() {
            let mut qg = 0.0;
            for (d, k) in [(0, r), (1, r.wrapping_sub(1)), (2, r.wrapping_sub(2))] {
                if k < m {
                    qg += q[k][d] * gamma[k];
                }
            }
            let dev = lam * qg;
            *value -= dev;
            rss += dev * dev;
        }

        let mut second_derivatives = vec![0.0; n];
        second_derivatives[1..n - 1].copy_from_slice(&gamma);
        Ok(SmoothFit {
            values,
            second_derivatives,
            rss,
        })
    }
}

/// Solve `A x = b` for a symmetric positive definite matrix with two
/// sub-diagonals, given as `band[i][d] = A[i][i - d]`.
fn banded_cholesky_solve(mut band: Vec<[f64; 3]>, b: &[f64]) -> Result<Vec<f64>> {
    let m = band.len();
    // factor in place: band becomes L with the same layout
    for i in 0..m {
        for d in (0..=2.min(i)).rev() {
            let j = i - d;
            let mut sum = band[i][d];
            for k in i.saturating_sub(2)..j {
                sum -= band[i][i - k] * band[j][j - k];
            }
            if d == 0 {
                if !(sum > 0.0) {
                    return Err(XrayDbError::DataError(
                        "smoothing system is not positive definite".to_string(),
                    ));
                }
                band[i][0] = sum.sqrt();
            } else {
                band[i][d] = sum / band[j][0];
            }
        }
    }

    let mut x = b.to_vec();
    for i in 0..m {
        for k in i.saturating_sub(2)..i {
            x[i] -= band[i][i - k] * x[k];
        }
        x[i] /= band[i][0];
    }
    for i in (0..m).rev() {
        for k in i + 1..(i + 3).min(m) {
            x[i] -= band[k][k - i] * x[k];
        }
        x[i] /= band[i][0];
    }
    Ok(x)
}
