#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// The complete set of X-ray tables, as stored in the compressed blob.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct XrayDatabase {
    pub version: Vec<VersionRecord>,
    pub elements: Vec<ElementRecord>,
    pub xray_levels: Vec<XrayLevelRecord>,
    pub xray_transitions: Vec<XrayTransitionRecord>,
    pub coster_kronig: Vec<CosterKronigRecord>,
    pub photoabsorption: Vec<PhotoabsorptionRecord>,
    pub scattering: Vec<ScatteringRecord>,
    pub chantler: Vec<ChantlerRecord>,
    pub waasmaier: Vec<WaasmaierRecord>,
    pub keski_rahkonen_krause: Vec<CoreWidthRecord>,
    pub corelevel_widths: Vec<CoreWidthRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    pub tag: String,
    pub date: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRecord {
    pub atomic_number: u16,
    pub symbol: String,
    pub name: String,
    pub molar_mass: f64,
    pub density: f64,
}

/// One absorption edge (IUPAC level) of an element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XrayLevelRecord {
    pub element: String,
    pub iupac_symbol: String,
    pub absorption_edge: f64,
    pub fluorescence_yield: f64,
    pub jump_ratio: f64,
}

/// One emission line; `initial_level`/`final_level` are split from the
/// IUPAC label (`K-L3` -> `K`, `L3`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XrayTransitionRecord {
    pub element: String,
    pub iupac_symbol: String,
    pub siegbahn_symbol: String,
    pub initial_level: String,
    pub final_level: String,
    pub emission_energy: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosterKronigRecord {
    pub element: String,
    pub initial_level: String,
    pub final_level: String,
    pub transition_probability: f64,
    pub total_transition_probability: f64,
}

/// Elam photoabsorption knots: ln(E), ln(sigma) and spline second derivatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoabsorptionRecord {
    pub element: String,
    pub log_energy: Vec<f64>,
    pub log_photoabsorption: Vec<f64>,
    pub log_photoabsorption_spline: Vec<f64>,
}

/// Elam coherent and incoherent scattering knots, sharing one ln(E) grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatteringRecord {
    pub element: String,
    pub log_energy: Vec<f64>,
    pub log_coherent_scatter: Vec<f64>,
    pub log_coherent_scatter_spline: Vec<f64>,
    pub log_incoherent_scatter: Vec<f64>,
    pub log_incoherent_scatter_spline: Vec<f64>,
}

/// Chantler anomalous scattering table. Energies in eV; `f1` has Z removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChantlerRecord {
    pub element: String,
    pub density: f64,
    pub energy: Vec<f64>,
    pub f1: Vec<f64>,
    pub f2: Vec<f64>,
    pub mu_photo: Vec<f64>,
    pub mu_incoh: Vec<f64>,
    pub mu_total: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaasmaierRecord {
    pub atomic_number: u16,
    pub element: String,
    pub ion: String,
    pub offset: f64,
    pub scale: Vec<f64>,
    pub exponents: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreWidthRecord {
    pub atomic_number: u16,
    pub element: String,
    pub edge: String,
    pub width: f64,
}
