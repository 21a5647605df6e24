use std::path::Path;

use anyhow::{Context, Result};
use xraytab_data::ChantlerRecord;

use crate::parsers::{parse_field, read_source};

/// Highest Z with a Chantler file.
const CHANTLER_MAX_Z: u16 = 92;

/// Parse the per-element Chantler files `01.dat` ..= `92.dat` in `dir`.
///
/// The first comment line carries `<symbol>: Z = ...` and the nominal
/// density; later comment lines carry the relativistic and nuclear Thomson
/// corrections applied to f1. Data rows are
/// `E(keV) f1 f2 mu_photo mu_incoh ...`.
pub fn parse_chantler(dir: &Path) -> Result<Vec<ChantlerRecord>> {
    (1..=CHANTLER_MAX_Z)
        .map(|z| parse_element(&dir.join(format!("{z:02}.dat")), z))
        .collect()
}

fn parse_element(path: &Path, z: u16) -> Result<ChantlerRecord> {
    let content = read_source(path)?;
    let header = content
        .lines()
        .next()
        .with_context(|| format!("{path:?} is empty"))?
        .trim_start_matches('#')
        .trim();
    let element = header
        .split(':')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .with_context(|| format!("{path:?}: no element symbol in header"))?
        .to_string();
    let density = header
        .split_whitespace()
        .rev()
        .find_map(|w| w.parse::<f64>().ok())
        .unwrap_or(0.0);

    let (cl35, nuclear) = f1_corrections(&content);
    let f1_offset = cl35 + nuclear - f64::from(z);

    let mut record = ChantlerRecord {
        element,
        density,
        energy: Vec::new(),
        f1: Vec::new(),
        f2: Vec::new(),
        mu_photo: Vec::new(),
        mu_incoh: Vec::new(),
        mu_total: Vec::new(),
    };
    for (i, line) in content.lines().enumerate() {
        if line.starts_with('#') {
            continue;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 5 {
            continue;
        }
        let v: Vec<f64> = words[..5]
            .iter()
            .map(|w| parse_field(w, path, i + 1))
            .collect::<Result<_>>()?;
        record.energy.push(1000.0 * v[0]);
        record.f1.push(v[1] + f1_offset);
        record.f2.push(v[2]);
        record.mu_photo.push(v[3]);
        record.mu_incoh.push(v[4]);
        record.mu_total.push(v[3] + v[4]);
    }
    Ok(record)
}

/// The CL35 relativistic and nuclear Thomson corrections (e/atom) from the
/// comment lines, zero when absent.
fn f1_corrections(content: &str) -> (f64, f64) {
    let mut cl35 = 0.0;
    let mut nuclear = 0.0;
    for line in content.lines().filter(|l| l.starts_with('#')) {
        let text = line.replace('#', " ");
        let Some((label, value)) = text.split_once('=') else {
            continue;
        };
        let numbers: Vec<f64> = value
            .replace(',', " ")
            .replace("e/atom", " ")
            .split_whitespace()
            .filter_map(|w| w.parse().ok())
            .collect();
        if label.contains("Relativistic") {
            // Henke and CL35 values, in that order
            if let Some(&v) = numbers.get(1) {
                cl35 = v;
            }
        } else if label.contains("Nuclear Thomson") {
            if let Some(&v) = numbers.first() {
                nuclear = v;
            }
        }
    }
    (cl35, nuclear)
}
