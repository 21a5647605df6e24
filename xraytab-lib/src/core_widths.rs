use std::collections::HashMap;

use crate::db::XrayDb;
use crate::element::{ElementRef, title_case};
use crate::error::{Result, XrayDbError};

impl XrayDb {
    /// Core-hole widths in eV, keyed by edge.
    ///
    /// Uses Krause and Oliver where available (K and L edges) and
    /// Keski-Rahkonen and Krause otherwise. `use_keski` forces the
    /// Keski-Rahkonen and Krause table for every edge. With `edge` the map
    /// holds that edge only.
    pub fn core_width<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        edge: Option<&str>,
        use_keski: bool,
    ) -> Result<HashMap<String, f64>> {
        let element = element.into();
        let z = self.resolve_element(element)?;
        let raw = self.raw()?;
        // tables built before the merged widths existed only carry Keski-Rahkonen
        let table = if use_keski || raw.corelevel_widths.is_empty() {
            &raw.keski_rahkonen_krause
        } else {
            &raw.corelevel_widths
        };
        let edge = edge.map(title_case);

        let widths: HashMap<String, f64> = table
            .iter()
            .filter(|w| w.atomic_number == z)
            .filter(|w| edge.as_ref().is_none_or(|e| &w.edge == e))
            .map(|w| (w.edge.clone(), w.width))
            .collect();

        if widths.is_empty() {
            return Err(match edge {
                Some(edge) => XrayDbError::UnknownEdge {
                    element: element.to_string(),
                    edge,
                },
                None => XrayDbError::MissingTable {
                    table: "core-hole width",
                    element: element.to_string(),
                },
            });
        }
        Ok(widths)
    }
}
