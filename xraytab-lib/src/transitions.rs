use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use xraytab_data::{XrayLevelRecord, XrayTransitionRecord};

use crate::db::XrayDb;
use crate::elam::CrossSectionKind;
use crate::element::{ElementRef, title_case};
use crate::error::{Result, XrayDbError};

/// X-ray absorption edge data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XrayEdge {
    pub energy: f64,
    pub fluorescence_yield: f64,
    pub jump_ratio: f64,
}

impl From<&XrayLevelRecord> for XrayEdge {
    fn from(level: &XrayLevelRecord) -> Self {
        XrayEdge {
            energy: level.absorption_edge,
            fluorescence_yield: level.fluorescence_yield,
            jump_ratio: level.jump_ratio,
        }
    }
}

/// X-ray emission line data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XrayLine {
    pub energy: f64,
    pub intensity: f64,
    pub initial_level: String,
    pub final_level: String,
}

impl From<&XrayTransitionRecord> for XrayLine {
    fn from(trans: &XrayTransitionRecord) -> Self {
        XrayLine {
            energy: trans.emission_energy,
            intensity: trans.intensity,
            initial_level: trans.initial_level.clone(),
            final_level: trans.final_level.clone(),
        }
    }
}

/// Fluorescence yield of an edge for one emission family at an incident
/// energy, with the family's mean energy and summed probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluorescenceYield {
    pub fluorescence_yield: f64,
    pub energy: f64,
    pub probability: f64,
}

/// Families summarized by [`XrayDb::xray_line`].
const LINE_FAMILIES: [&str; 5] = ["ka", "kb", "la", "lb", "lg"];

/// Fluorescence is reported this far below the edge (eV).
const FLUO_EDGE_MARGIN: f64 = -150.0;

/// Intensity-weighted summary of `lines` in table order, or `None` if empty.
fn family_average<'a>(lines: impl Iterator<Item = &'a XrayTransitionRecord>) -> Option<XrayLine> {
    let mut weighted = 0.0;
    let mut intensity = 0.0;
    let mut first: Option<&XrayTransitionRecord> = None;
    for line in lines {
        weighted += line.emission_energy * line.intensity;
        intensity += line.intensity;
        if first.is_none() {
            first = Some(line);
        }
    }
    let first = first?;
    let energy = if intensity > 0.0 { weighted / intensity } else { 0.0 };
    Some(XrayLine {
        energy,
        intensity,
        initial_level: first.initial_level.clone(),
        final_level: first.final_level.chars().take(1).collect(),
    })
}

impl XrayDb {
    /// All absorption edges of an element, keyed by IUPAC label (K, L1, ...).
    pub fn xray_edges<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
    ) -> Result<HashMap<String, XrayEdge>> {
        let z = self.resolve_element(element)?;
        Ok(self
            .tables()?
            .levels_of(z)
            .map(|level| (level.iupac_symbol.clone(), XrayEdge::from(level)))
            .collect())
    }

    /// One absorption edge. The label is case-insensitive (`"l3"` is L3).
    pub fn xray_edge<'e>(&self, element: impl Into<ElementRef<'e>>, edge: &str) -> Result<XrayEdge> {
        let element = element.into();
        let z = self.resolve_element(element)?;
        let label = title_case(edge);
        self.tables()?
            .levels_of(z)
            .find(|l| l.iupac_symbol == label)
            .map(XrayEdge::from)
            .ok_or_else(|| XrayDbError::UnknownEdge {
                element: element.to_string(),
                edge: edge.to_string(),
            })
    }

    /// Emission lines in table order, filtered as in [`xray_lines`](Self::xray_lines).
    fn lines_in_order(
        &self,
        z: u16,
        initial_level: Option<&str>,
        excitation_energy: Option<f64>,
    ) -> Result<Vec<&XrayTransitionRecord>> {
        let tables = self.tables()?;
        let levels: Option<HashSet<String>> = match (excitation_energy, initial_level) {
            (Some(energy), _) => Some(
                tables
                    .levels_of(z)
                    .filter(|l| l.absorption_edge < energy)
                    .map(|l| l.iupac_symbol.clone())
                    .collect(),
            ),
            (None, Some(level)) => Some(HashSet::from([title_case(level)])),
            (None, None) => None,
        };
        Ok(tables
            .transitions_of(z)
            .filter(|t| levels.as_ref().is_none_or(|set| set.contains(&t.initial_level)))
            .collect())
    }

    /// Emission lines of an element, keyed by Siegbahn label (Ka1, Lb1, ...).
    ///
    /// `initial_level` keeps lines from that level only. When
    /// `excitation_energy` is given it replaces that filter: lines from every
    /// level whose edge lies below the excitation energy are kept.
    pub fn xray_lines<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        initial_level: Option<&str>,
        excitation_energy: Option<f64>,
    ) -> Result<HashMap<String, XrayLine>> {
        let z = self.resolve_element(element)?;
        Ok(self
            .lines_in_order(z, initial_level, excitation_energy)?
            .into_iter()
            .map(|t| (t.siegbahn_symbol.clone(), XrayLine::from(t)))
            .collect())
    }

    /// One emission line by Siegbahn label.
    ///
    /// A family label (`Ka`, `Kb`, `La`, `Lb`, `Lg`, or `K`/`L` for `Ka`/`La`)
    /// gives the intensity-weighted mean energy and summed intensity of its
    /// lines, with the first line's initial level and the shell letter of
    /// its final level.
    pub fn xray_line<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        line: &str,
    ) -> Result<Option<XrayLine>> {
        let z = self.resolve_element(element)?;
        let lines = self.lines_in_order(z, None, None)?;

        let family = match line.to_lowercase().as_str() {
            "k" => "ka".to_string(),
            "l" => "la".to_string(),
            other => other.to_string(),
        };
        if LINE_FAMILIES.contains(&family.as_str()) {
            return Ok(family_average(
                lines
                    .into_iter()
                    .filter(|t| t.siegbahn_symbol.to_lowercase().starts_with(&family)),
            ));
        }

        let label = title_case(line);
        Ok(lines
            .into_iter()
            .find(|t| t.siegbahn_symbol == label)
            .map(XrayLine::from))
    }

    /// Absolute fluorescence line strengths in cm²/g: the photoabsorption
    /// jump at the initial level's edge times line intensity times
    /// fluorescence yield.
    pub fn xray_line_strengths<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        excitation_energy: Option<f64>,
    ) -> Result<HashMap<String, f64>> {
        let element = element.into();
        let z = self.resolve_element(element)?;
        let tables = self.tables()?;

        let mut out = HashMap::new();
        for line in self.lines_in_order(z, None, excitation_energy)? {
            let level = line.initial_level.as_str();
            // "M4,5"-style levels use their first component
            let edge = tables
                .levels_of(z)
                .find(|l| l.iupac_symbol == level)
                .or_else(|| {
                    let (first, _) = level.split_once(',')?;
                    tables.levels_of(z).find(|l| l.iupac_symbol == first)
                });
            let Some(edge) = edge else { continue };

            let e0 = edge.absorption_edge;
            let mu = self.mu_elam(z, &[e0 * 0.999, e0 * 1.001], CrossSectionKind::Photo)?;
            out.insert(
                line.siegbahn_symbol.clone(),
                (mu[1] - mu[0]) * line.intensity * edge.fluorescence_yield,
            );
        }
        Ok(out)
    }

    /// Fluorescence yield for `edge` and emission family `emission` (`"Ka"`,
    /// `"Lb"`, ...) at incident `energy` in eV.
    ///
    /// The yield is zero when the energy is more than 150 eV below the edge.
    pub fn fluo_yield<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
        edge: &str,
        emission: &str,
        energy: f64,
    ) -> Result<FluorescenceYield> {
        let element = element.into();
        let z = self.resolve_element(element)?;
        let xedge = self.xray_edge(z, edge)?;
        let emission = title_case(emission);

        let mut weighted = 0.0;
        let mut probability = 0.0;
        for line in self.lines_in_order(z, Some(edge), None)? {
            if line.siegbahn_symbol.starts_with(&emission) {
                weighted += line.emission_energy * line.intensity;
                probability += line.intensity;
            }
        }
        if probability <= 0.0 {
            probability = 1.0;
        }

        let fluorescence_yield = if energy < xedge.energy + FLUO_EDGE_MARGIN {
            0.0
        } else {
            xedge.fluorescence_yield
        };
        Ok(FluorescenceYield {
            fluorescence_yield,
            energy: weighted / probability,
            probability,
        })
    }
}
