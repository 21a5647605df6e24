use std::sync::{Arc, PoisonError};

use crate::db::XrayDb;
use crate::error::Result;

/// Edges considered by [`XrayDb::guess_edge`] when none are given.
pub const DEFAULT_GUESS_EDGES: [&str; 5] = ["K", "L3", "L2", "L1", "M5"];

/// Placeholder energy for elements without the edge.
const NO_EDGE: f64 = -1000.0;

/// Index of the tabulated entry closest to `energy`; the first one wins
/// ties. Slots without the edge are skipped.
fn nearest_index(energies: &[f64], energy: f64) -> Option<usize> {
    let mut best = None;
    let mut best_diff = f64::INFINITY;
    for (i, &e) in energies.iter().enumerate() {
        if e == NO_EDGE {
            continue;
        }
        let diff = (energy - e).abs();
        if diff < best_diff {
            best = Some(i);
            best_diff = diff;
        }
    }
    best
}

/// Deviation of `energy` from the edge of element `z`, weighted to prefer
/// energies above the edge, K edges, and elements 10..=92. Labels are
/// matched case-sensitively.
fn penalized_diff(edge: &str, z: usize, energy: f64, edge_energy: f64) -> f64 {
    let mut diff = energy - edge_energy;
    if diff < 0.0 {
        diff *= -2.0;
    }
    if !(10..=92).contains(&z) {
        diff *= 2.0;
    }
    match edge {
        "K" => diff *= 0.25,
        "L1" | "M5" => diff *= 2.0,
        _ => {}
    }
    diff
}

/// First candidate, in order, within 2 of the smallest deviation.
fn select_candidate<'a>(candidates: &[(&'a str, usize, f64)]) -> Option<(&'a str, usize)> {
    let min = candidates
        .iter()
        .map(|&(_, _, d)| d)
        .fold(f64::INFINITY, f64::min);
    candidates
        .iter()
        .find(|&&(_, _, d)| (d - min).abs() < 2.0)
        .map(|&(edge, z, _)| (edge, z))
}

impl XrayDb {
    /// Edge energies indexed by Z for one edge label, or `None` when no
    /// element has that edge. Built on first use and cached.
    fn edge_energies_for(&self, edge: &str) -> Result<Option<Arc<[f64]>>> {
        let key = edge.to_lowercase();
        if let Some(cached) = self
            .edge_energies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok((!cached.is_empty()).then(|| Arc::clone(cached)));
        }

        let tables = self.tables()?;
        let max_z = tables
            .data
            .elements
            .iter()
            .map(|e| e.atomic_number as usize)
            .max()
            .unwrap_or(0);
        let mut energies = vec![NO_EDGE; max_z + 1];
        let mut found = false;
        for level in &tables.data.xray_levels {
            if level.iupac_symbol.to_lowercase() != key {
                continue;
            }
            if let Ok(z) = self.resolve_element(level.element.as_str()) {
                if let Some(slot) = energies.get_mut(z as usize) {
                    *slot = level.absorption_edge;
                    found = true;
                }
            }
        }
        log::debug!("built {edge} edge energy table (max Z {max_z})");

        let energies: Arc<[f64]> = if found { energies.into() } else { Arc::from([]) };
        self.edge_energies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&energies));
        Ok(found.then_some(energies))
    }

    /// Guess the element and edge nearest to `energy` in eV.
    ///
    /// `edges` defaults to [`DEFAULT_GUESS_EDGES`]. Returns the symbol and
    /// the edge label as given, or `None` when no listed edge is tabulated
    /// or `energy` is not a positive number.
    pub fn guess_edge(&self, energy: f64, edges: Option<&[&str]>) -> Result<Option<(String, String)>> {
        let edges = edges.unwrap_or(&DEFAULT_GUESS_EDGES);
        if !(energy.is_finite() && energy > 0.0) {
            return Ok(None);
        }

        let mut candidates = Vec::with_capacity(edges.len());
        for &edge in edges {
            let Some(energies) = self.edge_energies_for(edge)? else {
                continue;
            };
            let Some(z) = nearest_index(&energies, energy) else {
                continue;
            };
            candidates.push((edge, z, penalized_diff(edge, z, energy, energies[z])));
        }

        match select_candidate(&candidates) {
            Some((edge, z)) => {
                let symbol = self.symbol(z as u16)?;
                Ok(Some((symbol.to_string(), edge.to_string())))
            }
            None => Ok(None),
        }
    }
}
