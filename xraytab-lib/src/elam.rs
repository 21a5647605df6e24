use std::str::FromStr;

use crate::db::XrayDb;
use crate::element::ElementRef;
use crate::error::{Result, XrayDbError};
use crate::spline::elam_spline;

/// Kind of cross-section for Elam calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossSectionKind {
    Photo,
    Coherent,
    Incoherent,
    Total,
}

impl FromStr for CrossSectionKind {
    type Err = XrayDbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "photo" => Ok(CrossSectionKind::Photo),
            "coh" | "coherent" => Ok(CrossSectionKind::Coherent),
            "incoh" | "incoherent" => Ok(CrossSectionKind::Incoherent),
            "total" | "tot" => Ok(CrossSectionKind::Total),
            _ => Err(XrayDbError::UnknownKind(s.to_string())),
        }
    }
}

/// One knot table: ln(E), ln(sigma), spline second derivatives.
struct Knots<'a> {
    log_energy: &'a [f64],
    values: &'a [f64],
    spline: &'a [f64],
}

impl Knots<'_> {
    fn evaluate(&self, energies: &[f64]) -> Result<Vec<f64>> {
        let (Some(&first), Some(&last)) = (self.log_energy.first(), self.log_energy.last()) else {
            return Err(XrayDbError::DataError("empty Elam table".to_string()));
        };
        // tables start near 100 eV; below the floor the first knot is used
        let floor = 10.0 * (0.102 * first.exp()).floor();
        let log_en: Vec<f64> = energies
            .iter()
            // NaN stays NaN
            .map(|&e| if e < floor { floor } else { e })
            .map(|e| e.ln().clamp(first, last))
            .collect();
        Ok(elam_spline(self.log_energy, self.values, self.spline, &log_en)?
            .into_iter()
            .map(f64::exp)
            .collect())
    }
}

impl XrayDb {
    fn elam_knots<'e>(&self, element: ElementRef<'e>, kind: CrossSectionKind) -> Result<Knots<'_>> {
        let tables = self.tables()?;
        let z = self.resolve_element(element)?;
        let missing = |table: &'static str| XrayDbError::MissingTable {
            table,
            element: element.to_string(),
        };
        match kind {
            CrossSectionKind::Photo => {
                let row = tables.photo_row(z).ok_or_else(|| missing("photoabsorption"))?;
                Ok(Knots {
                    log_energy: &row.log_energy,
                    values: &row.log_photoabsorption,
                    spline: &row.log_photoabsorption_spline,
                })
            }
            CrossSectionKind::Coherent => {
                let row = tables.scatter_row(z).ok_or_else(|| missing("scattering"))?;
                Ok(Knots {
                    log_energy: &row.log_energy,
                    values: &row.log_coherent_scatter,
                    spline: &row.log_coherent_scatter_spline,
                })
            }
            CrossSectionKind::Incoherent => {
                let row = tables.scatter_row(z).ok_or_else(|| missing("scattering"))?;
                Ok(Knots {
                    log_energy: &row.log_energy,
                    values: &row.log_incoherent_scatter,
                    spline: &row.log_incoherent_scatter_spline,
                })
            }
            CrossSectionKind::Total => Err(XrayDbError::UnknownKind("total".to_string())),
        }
    }

    /// Elam cross-section in cm²/g for one kind at energies in eV.
    ///
    /// Energies below the start of the table use its first point and
    /// energies beyond its end use the last one. `Total` sums the three
    /// kinds, as [`mu_elam`](Self::mu_elam) does.
    pub fn cross_section_elam<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        energies: &[f64],
        kind: CrossSectionKind,
    ) -> Result<Vec<f64>> {
        let element = element.into();
        match kind {
            CrossSectionKind::Total => {
                let mut total = self.cross_section_elam(element, energies, CrossSectionKind::Photo)?;
                for part in [CrossSectionKind::Coherent, CrossSectionKind::Incoherent] {
                    let values = self.cross_section_elam(element, energies, part)?;
                    for (t, v) in total.iter_mut().zip(values) {
                        *t += v;
                    }
                }
                Ok(total)
            }
            kind => self.elam_knots(element, kind)?.evaluate(energies),
        }
    }

    /// Mass attenuation coefficient in cm²/g using Elam tables.
    pub fn mu_elam<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        energies: &[f64],
        kind: CrossSectionKind,
    ) -> Result<Vec<f64>> {
        self.cross_section_elam(element, energies, kind)
    }

    /// Scalar form of [`mu_elam`](Self::mu_elam).
    pub fn mu_elam_at<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        energy: f64,
        kind: CrossSectionKind,
    ) -> Result<f64> {
        let values = self.mu_elam(element, &[energy], kind)?;
        Ok(values[0])
    }

    pub fn coherent_cross_section_elam<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        energies: &[f64],
    ) -> Result<Vec<f64>> {
        self.cross_section_elam(element, energies, CrossSectionKind::Coherent)
    }

    pub fn incoherent_cross_section_elam<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        energies: &[f64],
    ) -> Result<Vec<f64>> {
        self.cross_section_elam(element, energies, CrossSectionKind::Incoherent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("photo".parse::<CrossSectionKind>().unwrap(), CrossSectionKind::Photo);
        assert_eq!("COH".parse::<CrossSectionKind>().unwrap(), CrossSectionKind::Coherent);
        assert_eq!(
            "incoherent".parse::<CrossSectionKind>().unwrap(),
            CrossSectionKind::Incoherent
        );
        assert_eq!("total".parse::<CrossSectionKind>().unwrap(), CrossSectionKind::Total);
        assert!(matches!(
            "bogus".parse::<CrossSectionKind>(),
            Err(XrayDbError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_floor_and_clamp() {
        let log_energy = [100f64.ln(), 1000f64.ln(), 10000f64.ln()];
        let values = [1.0, 0.0, -1.0];
        let knots = Knots {
            log_energy: &log_energy,
            values: &values,
            spline: &[0.0; 3],
        };
        let out = knots.evaluate(&[1.0, 100.0, 1000.0, 1e7]).unwrap();
        assert!((out[0] - 1f64.exp()).abs() < 1e-12);
        assert!((out[1] - 1f64.exp()).abs() < 1e-12);
        assert!((out[2] - 1.0).abs() < 1e-12);
        assert!((out[3] - (-1f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_nan_energy_is_not_floored() {
        let log_energy = [100f64.ln(), 1000f64.ln()];
        let knots = Knots {
            log_energy: &log_energy,
            values: &[1.0, 0.0],
            spline: &[0.0; 2],
        };
        let out = knots.evaluate(&[f64::NAN, 500.0]).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_finite());
    }
}
