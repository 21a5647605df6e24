use xraytab_data::WaasmaierRecord;

use crate::db::XrayDb;
use crate::element::ElementRef;
use crate::error::{Result, XrayDbError};

/// `f0(q) = offset + sum_i scale_i * exp(-exponent_i * q^2)`.
fn evaluate(record: &WaasmaierRecord, q: f64) -> f64 {
    let q2 = q * q;
    record
        .scale
        .iter()
        .zip(&record.exponents)
        .fold(record.offset, |acc, (a, b)| acc + a * (-b * q2).exp())
}

impl XrayDb {
    /// Ion labels supported by [`f0`](Self::f0), optionally for one element.
    pub fn f0_ions<'e>(&self, element: Option<ElementRef<'e>>) -> Result<Vec<&str>> {
        let waasmaier = &self.raw()?.waasmaier;
        let ions = match element {
            Some(elem) => {
                let z = self.resolve_element(elem)?;
                waasmaier
                    .iter()
                    .filter(|w| w.atomic_number == z)
                    .map(|w| w.ion.as_str())
                    .collect()
            }
            None => waasmaier.iter().map(|w| w.ion.as_str()).collect(),
        };
        Ok(ions)
    }

    /// Elastic scattering factor f0 for an ion at q = sin(theta)/lambda
    /// in Å⁻¹ (Waasmaier and Kirfel).
    ///
    /// The ion label must match exactly (`"Fe"`, `"Fe2+"`, `"O1-"`).
    pub fn f0(&self, ion: &str, q: &[f64]) -> Result<Vec<f64>> {
        let record = self
            .raw()?
            .waasmaier
            .iter()
            .find(|w| w.ion == ion)
            .ok_or_else(|| XrayDbError::UnknownIon(ion.to_string()))?;

        Ok(q.iter().map(|&qi| evaluate(record, qi)).collect())
    }
}
