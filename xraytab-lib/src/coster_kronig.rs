use crate::db::XrayDb;
use crate::element::{ElementRef, title_case};
use crate::error::{Result, XrayDbError};

impl XrayDb {
    /// Coster-Kronig transition probability between two levels of the same
    /// shell (`"L1"` to `"L3"`, ...).
    ///
    /// With `total` the probability includes transitions through
    /// intermediate levels; otherwise only the direct one.
    pub fn ck_probability<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        initial: &str,
        final_level: &str,
        total: bool,
    ) -> Result<f64> {
        let element = element.into();
        let sym = self.symbol(element)?;
        let (initial, final_level) = (title_case(initial), title_case(final_level));
        let record = self
            .raw()?
            .coster_kronig
            .iter()
            .find(|ck| {
                ck.element == sym && ck.initial_level == initial && ck.final_level == final_level
            })
            .ok_or_else(|| XrayDbError::UnknownEdge {
                element: element.to_string(),
                edge: format!("{initial}->{final_level}"),
            })?;

        Ok(if total {
            record.total_transition_probability
        } else {
            record.transition_probability
        })
    }
}
