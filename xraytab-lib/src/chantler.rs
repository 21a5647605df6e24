use std::str::FromStr;

use xraytab_data::ChantlerRecord;

use crate::db::XrayDb;
use crate::element::ElementRef;
use crate::error::{Result, XrayDbError};
use crate::interp::interp_loglog;
use crate::spline::CubicSpline;

/// Kind of Chantler cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChantlerKind {
    Total,
    Photo,
    Incoherent,
}

impl FromStr for ChantlerKind {
    type Err = XrayDbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "total" | "tot" | "mu" => Ok(ChantlerKind::Total),
            "photo" => Ok(ChantlerKind::Photo),
            "incoh" | "incoherent" => Ok(ChantlerKind::Incoherent),
            _ => Err(XrayDbError::UnknownKind(s.to_string())),
        }
    }
}

/// Table indices `lo..=hi` used to interpolate queries spanning
/// `[emin, emax]`: three points of margin on either side.
fn window(te: &[f64], emin: f64, emax: f64) -> (usize, usize) {
    let last = te.len().saturating_sub(1);
    let below = |e: f64| te.partition_point(|&t| t <= e).checked_sub(1);
    let lo = below(emin).map_or(0, |i| i.saturating_sub(3));
    let hi = below(emax).map_or(3, |i| i + 3).min(last);
    (lo, hi)
}

/// Window slices of `te` and `ty` with repeated energies dropped.
fn windowed(te: &[f64], ty: &[f64], energies: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let emin = energies.iter().copied().fold(f64::INFINITY, f64::min);
    let emax = energies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = window(te, emin, emax);

    let mut x = Vec::with_capacity(hi + 1 - lo);
    let mut y = Vec::with_capacity(hi + 1 - lo);
    for (&e, &v) in te[lo..=hi].iter().zip(&ty[lo..=hi]) {
        if x.last().is_some_and(|&prev| e <= prev) {
            continue;
        }
        x.push(e);
        y.push(v);
    }
    if x.len() < 2 {
        return Err(XrayDbError::DataError(format!(
            "Chantler window [{emin}, {emax}] holds fewer than two energies"
        )));
    }
    Ok((x, y))
}

impl XrayDb {
    fn chantler_record<'e>(&self, element: ElementRef<'e>) -> Result<&ChantlerRecord> {
        let z = self.resolve_element(element)?;
        self.tables()?
            .chantler_row(z)
            .ok_or_else(|| XrayDbError::MissingTable {
                table: "Chantler",
                element: element.to_string(),
            })
    }

    fn chantler_loglog<'e>(
        &self,
        element: ElementRef<'e>,
        energies: &[f64],
        column: impl Fn(&ChantlerRecord) -> &Vec<f64>,
    ) -> Result<Vec<f64>> {
        if energies.is_empty() {
            return Ok(Vec::new());
        }
        let row = self.chantler_record(element)?;
        let (x, y) = windowed(&row.energy, column(row), energies)?;
        Ok(interp_loglog(energies, &x, &y))
    }

    /// Tabulated Chantler energies covering `[emin, emax]` in eV, with one
    /// extra point below and two above where the table has them.
    pub fn chantler_energies<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        emin: Option<f64>,
        emax: Option<f64>,
    ) -> Result<Vec<f64>> {
        let row = self.chantler_record(element.into())?;
        let te = &row.energy;
        if te.is_empty() {
            return Ok(Vec::new());
        }
        let emin = emin.unwrap_or(0.0);
        let emax = emax.unwrap_or(1e9);
        let last = te.len() - 1;
        let below = |e: f64| te.partition_point(|&t| t <= e).checked_sub(1);

        let lo = if emin <= te[0] {
            0
        } else {
            below(emin).map_or(0, |i| i.saturating_sub(1))
        };
        let hi = if emax > te[last] {
            last
        } else {
            below(emax).map_or(0, |i| i + 2).min(last)
        };
        Ok(te[lo..=hi.max(lo)].to_vec())
    }

    /// f1, the real part of the anomalous scattering factor (Chantler),
    /// at energies in eV.
    ///
    /// Cubic spline through the tabulated points near the query range.
    pub fn f1_chantler<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        energies: &[f64],
    ) -> Result<Vec<f64>> {
        self.f1_chantler_smoothed(element, energies, 0.0)
    }

    /// Like [`f1_chantler`](Self::f1_chantler) with a smoothing spline whose
    /// residual sum of squares is `smoothing`.
    pub fn f1_chantler_smoothed<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        energies: &[f64],
        smoothing: f64,
    ) -> Result<Vec<f64>> {
        if energies.is_empty() {
            return Ok(Vec::new());
        }
        let row = self.chantler_record(element.into())?;
        let (x, y) = windowed(&row.energy, &row.f1, energies)?;
        let spline = CubicSpline::smoothing(x, y, smoothing)?;
        Ok(spline.evaluate_many(energies))
    }

    /// f2, the imaginary part of the anomalous scattering factor (Chantler).
    ///
    /// Log-log linear interpolation; outside the table the boundary
    /// segments are continued.
    pub fn f2_chantler<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        energies: &[f64],
    ) -> Result<Vec<f64>> {
        self.chantler_loglog(element.into(), energies, |r| &r.f2)
    }

    /// Mass attenuation coefficient in cm²/g from the Chantler tables.
    pub fn mu_chantler<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        energies: &[f64],
        kind: ChantlerKind,
    ) -> Result<Vec<f64>> {
        self.chantler_loglog(element.into(), energies, |r| match kind {
            ChantlerKind::Total => &r.mu_total,
            ChantlerKind::Photo => &r.mu_photo,
            ChantlerKind::Incoherent => &r.mu_incoh,
        })
    }
}
