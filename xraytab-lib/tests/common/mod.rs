#![allow(dead_code)]

//! A small, hand-built table set for integration tests.
//!
//! Cross-sections follow power laws with zero spline curvature, so every
//! interpolated value has a closed form the tests can compare against.

use xraytab::XrayDb;
use xraytab::xraytab_data::{
    ChantlerRecord, CoreWidthRecord, CosterKronigRecord, ElementRecord, PhotoabsorptionRecord,
    ScatteringRecord, VersionRecord, WaasmaierRecord, XrayDatabase, XrayLevelRecord,
    XrayTransitionRecord,
};

pub const ELEMENTS: [(u16, &str, &str, f64, f64); 9] = [
    (1, "H", "hydrogen", 1.008, 0.0000899),
    (6, "C", "carbon", 12.011, 2.26),
    (7, "N", "nitrogen", 14.007, 0.00125),
    (8, "O", "oxygen", 15.999, 0.00143),
    (14, "Si", "silicon", 28.086, 2.33),
    (26, "Fe", "iron", 55.845, 7.86),
    (27, "Co", "cobalt", 58.933, 8.9),
    (29, "Cu", "copper", 63.546, 8.96),
    (82, "Pb", "lead", 207.2, 11.34),
];

/// Elam knot energies in eV.
pub const ELAM_ENERGIES: [f64; 5] = [100.0, 1e3, 1e4, 1e5, 1e6];

pub const FE_K_EDGE: f64 = 7112.0;
/// Photoabsorption jumps by this factor at the Fe K edge.
pub const FE_K_JUMP: f64 = 8.0;

/// Chantler grid in eV.
pub const CHANTLER_ENERGIES: [f64; 10] = [
    1000.0, 2000.0, 4000.0, 7000.0, 10000.0, 15000.0, 20000.0, 40000.0, 70000.0, 100000.0,
];
pub const CHANTLER_ELEMENTS: [&str; 4] = ["H", "O", "Si", "Fe"];

/// Photoabsorption in cm²/g at 1 keV below any edge.
pub fn photo_scale(z: u16) -> f64 {
    20.0 * f64::from(z)
}

/// Elam photoabsorption, with the Fe K-edge jump.
pub fn photo(z: u16, energy: f64) -> f64 {
    let jump = if z == 26 && energy > FE_K_EDGE { FE_K_JUMP } else { 1.0 };
    jump * photo_scale(z) * (energy / 1e3).powf(-2.5)
}

pub fn coherent(z: u16, energy: f64) -> f64 {
    f64::from(z) / 10.0 * (energy / 1e3).powi(-1)
}

pub fn incoherent(z: u16) -> f64 {
    f64::from(z) / 100.0
}

pub fn chantler_f1(energy: f64) -> f64 {
    0.5 - 1e-5 * energy
}

pub fn chantler_f2(z: u16, energy: f64) -> f64 {
    0.1 * f64::from(z) * (energy / 1e4).powf(-1.5)
}

pub fn chantler_mu_photo(z: u16, energy: f64) -> f64 {
    2.0 * f64::from(z) * (energy / 1e4).powf(-2.5)
}

pub fn chantler_mu_incoh(z: u16, energy: f64) -> f64 {
    0.01 * f64::from(z) * (energy / 1e4).powf(-0.5)
}

fn ln_all(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values.map(f64::ln).collect()
}

fn photo_record(symbol: &str, z: u16) -> PhotoabsorptionRecord {
    let energies: Vec<f64> = if z == 26 {
        vec![100.0, 1e3, FE_K_EDGE, FE_K_EDGE, 1e4, 1e5, 1e6]
    } else {
        ELAM_ENERGIES.to_vec()
    };
    let mut values: Vec<f64> = energies.iter().map(|&e| photo(z, e)).collect();
    if z == 26 {
        // the second knot at the edge carries the value above it
        values[3] = FE_K_JUMP * values[2];
    }
    PhotoabsorptionRecord {
        element: symbol.into(),
        log_energy: ln_all(energies.iter().copied()),
        log_photoabsorption: ln_all(values.into_iter()),
        log_photoabsorption_spline: vec![0.0; energies.len()],
    }
}

fn scatter_record(symbol: &str, z: u16) -> ScatteringRecord {
    let n = ELAM_ENERGIES.len();
    ScatteringRecord {
        element: symbol.into(),
        log_energy: ln_all(ELAM_ENERGIES.iter().copied()),
        log_coherent_scatter: ln_all(ELAM_ENERGIES.iter().map(|&e| coherent(z, e))),
        log_coherent_scatter_spline: vec![0.0; n],
        log_incoherent_scatter: ln_all(ELAM_ENERGIES.iter().map(|_| incoherent(z))),
        log_incoherent_scatter_spline: vec![0.0; n],
    }
}

fn chantler_record(symbol: &str, z: u16, density: f64) -> ChantlerRecord {
    let te = CHANTLER_ENERGIES;
    let mu_photo: Vec<f64> = te.iter().map(|&e| chantler_mu_photo(z, e)).collect();
    let mu_incoh: Vec<f64> = te.iter().map(|&e| chantler_mu_incoh(z, e)).collect();
    ChantlerRecord {
        element: symbol.into(),
        density,
        energy: te.to_vec(),
        f1: te.iter().map(|&e| chantler_f1(e)).collect(),
        f2: te.iter().map(|&e| chantler_f2(z, e)).collect(),
        mu_total: mu_photo.iter().zip(&mu_incoh).map(|(p, i)| p + i).collect(),
        mu_photo,
        mu_incoh,
    }
}

fn level(element: &str, label: &str, energy: f64, yield_: f64, jump: f64) -> XrayLevelRecord {
    XrayLevelRecord {
        element: element.into(),
        iupac_symbol: label.into(),
        absorption_edge: energy,
        fluorescence_yield: yield_,
        jump_ratio: jump,
    }
}

fn line(element: &str, siegbahn: &str, iupac: &str, energy: f64, intensity: f64) -> XrayTransitionRecord {
    let (initial, final_level) = iupac.split_once('-').unwrap_or((iupac, ""));
    XrayTransitionRecord {
        element: element.into(),
        iupac_symbol: iupac.into(),
        siegbahn_symbol: siegbahn.into(),
        initial_level: initial.into(),
        final_level: final_level.into(),
        emission_energy: energy,
        intensity,
    }
}

fn width(z: u16, element: &str, edge: &str, width: f64) -> CoreWidthRecord {
    CoreWidthRecord {
        atomic_number: z,
        element: element.into(),
        edge: edge.into(),
        width,
    }
}

fn ion(z: u16, element: &str, ion: &str, offset: f64, scale: [f64; 5]) -> WaasmaierRecord {
    WaasmaierRecord {
        atomic_number: z,
        element: element.into(),
        ion: ion.into(),
        offset,
        scale: scale.to_vec(),
        exponents: vec![10.0, 3.0, 1.0, 0.3, 30.0],
    }
}

pub fn fixture_database() -> XrayDatabase {
    let elements = ELEMENTS
        .iter()
        .map(|&(z, symbol, name, molar_mass, density)| ElementRecord {
            atomic_number: z,
            symbol: symbol.into(),
            name: name.into(),
            molar_mass,
            density,
        })
        .collect();

    XrayDatabase {
        version: vec![
            VersionRecord {
                tag: "1.0".into(),
                date: "2020-01-01".into(),
                notes: "first".into(),
            },
            VersionRecord {
                tag: "4.5".into(),
                date: "2024-06-01".into(),
                notes: "test tables".into(),
            },
        ],
        elements,
        xray_levels: vec![
            level("H", "K", 13.6, 0.0, 0.0),
            level("C", "K", 284.2, 0.0028, 34.0),
            level("N", "K", 409.9, 0.0052, 26.0),
            level("O", "K", 543.1, 0.0083, 22.0),
            level("Si", "K", 1839.0, 0.05, 10.0),
            level("Fe", "K", FE_K_EDGE, 0.35, FE_K_JUMP),
            level("Fe", "L1", 846.1, 0.001, 1.15),
            level("Fe", "L2", 721.1, 0.0036, 1.4),
            level("Fe", "L3", 708.1, 0.0063, 4.0),
            level("Co", "K", 7709.0, 0.37, 7.9),
            level("Cu", "K", 8979.0, 0.44, 7.7),
            level("Cu", "L3", 932.7, 0.0097, 3.8),
            level("Pb", "K", 88004.0, 0.96, 5.0),
            level("Pb", "L1", 15861.0, 0.11, 1.14),
            level("Pb", "L2", 15200.0, 0.37, 1.39),
            level("Pb", "L3", 13035.0, 0.32, 2.5),
            level("Pb", "M5", 2484.0, 0.03, 1.5),
        ],
        xray_transitions: vec![
            line("Fe", "Ka1", "K-L3", 6404.0, 0.58),
            line("Fe", "Ka2", "K-L2", 6391.0, 0.29),
            line("Fe", "Kb1", "K-M3", 7058.0, 0.13),
            line("Fe", "La", "L3-M5", 705.0, 0.9),
            line("Fe", "Lb1", "L2-M4", 718.5, 1.0),
            line("Cu", "Ka1", "K-L3", 8048.0, 0.58),
            line("Cu", "Ka2", "K-L2", 8028.0, 0.29),
            line("Pb", "La1", "L3-M5", 10551.0, 0.77),
            line("Pb", "La2", "L3-M4", 10450.0, 0.09),
            line("Pb", "Ma", "M5-N6,7", 2345.0, 1.0),
        ],
        coster_kronig: vec![
            CosterKronigRecord {
                element: "Fe".into(),
                initial_level: "L1".into(),
                final_level: "L2".into(),
                transition_probability: 0.3,
                total_transition_probability: 0.3,
            },
            CosterKronigRecord {
                element: "Fe".into(),
                initial_level: "L1".into(),
                final_level: "L3".into(),
                transition_probability: 0.57,
                total_transition_probability: 0.62,
            },
            CosterKronigRecord {
                element: "Fe".into(),
                initial_level: "L2".into(),
                final_level: "L3".into(),
                transition_probability: 0.17,
                total_transition_probability: 0.17,
            },
        ],
        photoabsorption: ELEMENTS
            .iter()
            .map(|&(z, symbol, ..)| photo_record(symbol, z))
            .collect(),
        scattering: ELEMENTS
            .iter()
            .map(|&(z, symbol, ..)| scatter_record(symbol, z))
            .collect(),
        chantler: ELEMENTS
            .iter()
            .filter(|(_, symbol, ..)| CHANTLER_ELEMENTS.contains(symbol))
            .map(|&(z, symbol, _, _, density)| chantler_record(symbol, z, density))
            .collect(),
        waasmaier: vec![
            ion(1, "H", "H", 0.001, [0.4, 0.3, 0.2, 0.05, 0.049]),
            ion(8, "O", "O", 0.2, [3.0, 2.5, 1.5, 0.5, 0.3]),
            ion(8, "O", "O1-", 0.25, [3.5, 2.5, 1.5, 0.5, 0.75]),
            ion(14, "Si", "Si", 1.0, [5.0, 4.0, 2.5, 1.0, 0.5]),
            ion(26, "Fe", "Fe", 1.5, [10.0, 7.0, 4.0, 2.0, 1.5]),
            ion(26, "Fe", "Fe2+", 1.4, [9.5, 6.5, 3.8, 1.8, 1.0]),
            ion(26, "Fe", "Fe3+", 1.3, [9.0, 6.2, 3.7, 1.8, 1.0]),
        ],
        keski_rahkonen_krause: vec![
            width(26, "Fe", "K", 1.19),
            width(26, "Fe", "L1", 2.0),
            width(26, "Fe", "L3", 0.64),
            width(26, "Fe", "M1", 3.5),
        ],
        corelevel_widths: vec![
            width(26, "Fe", "K", 1.25),
            width(26, "Fe", "L1", 5.3),
            width(26, "Fe", "L3", 0.68),
            width(26, "Fe", "M1", 3.5),
        ],
    }
}

pub fn fixture_db() -> XrayDb {
    XrayDb::from_database(fixture_database()).expect("fixture tables are consistent")
}
