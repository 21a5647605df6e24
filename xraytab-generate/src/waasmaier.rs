use std::path::Path;

use anyhow::{Result, bail};
use xraytab_data::WaasmaierRecord;

use crate::parsers::{parse_field, read_source};

/// Parse `waasmaeir_kirfel.dat`.
///
/// Each ion is a `#S <Z> <ion>` block whose data row, three lines later,
/// holds `a1..a5 c b1..b5`.
pub fn parse_waasmaier(path: &Path) -> Result<Vec<WaasmaierRecord>> {
    let content = read_source(path)?;
    let lines: Vec<&str> = content.lines().collect();
    if !lines.get(1).is_some_and(|l| l.contains("Elastic Photon-Atom Scatt")) {
        bail!("{path:?} is not a Waasmaier-Kirfel f0 table");
    }

    let mut records = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let Some(header) = line.strip_prefix("#S ") else {
            continue;
        };
        let mut words = header.split_whitespace();
        let (Some(z), Some(ion)) = (words.next(), words.next()) else {
            continue;
        };
        let Some(row) = lines.get(i + 3) else {
            break;
        };
        let values: Vec<f64> = row.split_whitespace().filter_map(|w| w.parse().ok()).collect();
        if values.len() < 11 {
            continue;
        }
        records.push(WaasmaierRecord {
            atomic_number: parse_field(z, path, i + 1)?,
            element: element_of_ion(ion),
            ion: ion.to_string(),
            offset: values[5],
            scale: values[..5].to_vec(),
            exponents: values[6..11].to_vec(),
        });
    }
    Ok(records)
}

/// `"Fe2+"` -> `"Fe"`, `"Siva"` -> `"Si"`.
fn element_of_ion(ion: &str) -> String {
    let mut symbol: String = ion
        .chars()
        .filter(|c| !c.is_ascii_digit() && *c != '+' && *c != '-')
        .collect();
    for suffix in ["val", "va"] {
        if let Some(stripped) = symbol.strip_suffix(suffix) {
            symbol = stripped.to_string();
        }
    }
    symbol.trim().to_string()
}
