use std::path::Path;

use anyhow::{Context, Result, bail};
use xraytab_data::{
    CosterKronigRecord, PhotoabsorptionRecord, ScatteringRecord, XrayLevelRecord,
    XrayTransitionRecord,
};

use crate::parsers::{parse_field, read_source};

#[derive(Default)]
pub struct ElamTables {
    pub levels: Vec<XrayLevelRecord>,
    pub transitions: Vec<XrayTransitionRecord>,
    pub coster_kronig: Vec<CosterKronigRecord>,
    pub photoabsorption: Vec<PhotoabsorptionRecord>,
    pub scattering: Vec<ScatteringRecord>,
}

/// Parse `elam.dat` (Elam, Ravel and Sieber).
///
/// Blocks start with `Element`, `Edge`, `  Lines`, `  CK`, `Photo` or
/// `Scatter`; the rows of `Lines`, `Photo` and `Scatter` are indented by
/// four spaces.
pub fn parse_elam(path: &Path) -> Result<ElamTables> {
    let content = read_source(path)?;
    if !content.lines().next().is_some_and(|l| l.contains("Elam, Ravel, Sieber")) {
        bail!("{path:?} is not an Elam, Ravel, Sieber data file");
    }

    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .skip_while(|(_, l)| l.starts_with('/'))
        .collect();

    let mut out = ElamTables::default();
    let mut element = String::new();
    let mut edge = String::new();
    let mut i = 0;

    while i < lines.len() {
        let (lineno, line) = lines[i];
        i += 1;
        let field = |word: &str| -> Result<f64> { parse_field(word, path, lineno) };
        let words: Vec<&str> = line.split_whitespace().collect();

        if line.starts_with("Element") {
            element = words
                .get(1)
                .with_context(|| format!("{}:{lineno}: Element without symbol", path.display()))?
                .to_string();
        } else if line.starts_with("Edge") {
            if words.len() < 5 {
                bail!("{}:{lineno}: short Edge line", path.display());
            }
            edge = words[1].to_string();
            out.levels.push(XrayLevelRecord {
                element: element.clone(),
                iupac_symbol: edge.clone(),
                absorption_edge: field(words[2])?,
                fluorescence_yield: field(words[3])?,
                jump_ratio: field(words[4])?,
            });
        } else if line.starts_with("  Lines") {
            for (lineno, row) in indented_rows(&lines, &mut i) {
                let w: Vec<&str> = row.split_whitespace().collect();
                if w.len() < 4 {
                    continue;
                }
                let (initial, final_level) = w[0].split_once('-').unwrap_or((w[0], ""));
                out.transitions.push(XrayTransitionRecord {
                    element: element.clone(),
                    iupac_symbol: w[0].to_string(),
                    siegbahn_symbol: w[1].to_string(),
                    initial_level: initial.to_string(),
                    final_level: final_level.to_string(),
                    emission_energy: parse_field(w[2], path, lineno)?,
                    intensity: parse_field(w[3], path, lineno)?,
                });
            }
        } else if line.starts_with("  CK ") {
            let direct = level_pairs(&words[1..], path, lineno)?;
            // CKtotal, when present, follows its CK line
            let total = match lines.get(i) {
                Some(&(next_no, next)) if next.starts_with("  CKtotal") => {
                    i += 1;
                    let w: Vec<&str> = next.split_whitespace().skip(1).collect();
                    level_pairs(&w, path, next_no)?
                }
                _ => direct.clone(),
            };
            for ((final_level, p), (_, total_p)) in direct.into_iter().zip(total) {
                out.coster_kronig.push(CosterKronigRecord {
                    element: element.clone(),
                    initial_level: edge.clone(),
                    final_level,
                    transition_probability: p,
                    total_transition_probability: total_p,
                });
            }
        } else if line.starts_with("Photo") {
            let columns = numeric_columns::<3>(indented_rows(&lines, &mut i), path)?;
            let [log_energy, log_photoabsorption, log_photoabsorption_spline] = columns;
            out.photoabsorption.push(PhotoabsorptionRecord {
                element: element.clone(),
                log_energy,
                log_photoabsorption,
                log_photoabsorption_spline,
            });
        } else if line.starts_with("Scatter") {
            let columns = numeric_columns::<5>(indented_rows(&lines, &mut i), path)?;
            let [log_energy, coh, coh_spline, incoh, incoh_spline] = columns;
            out.scattering.push(ScatteringRecord {
                element: element.clone(),
                log_energy,
                log_coherent_scatter: coh,
                log_coherent_scatter_spline: coh_spline,
                log_incoherent_scatter: incoh,
                log_incoherent_scatter_spline: incoh_spline,
            });
        }
    }
    Ok(out)
}

/// Consume the four-space indented rows starting at `*i`.
fn indented_rows<'a>(lines: &[(usize, &'a str)], i: &mut usize) -> Vec<(usize, &'a str)> {
    let start = *i;
    while *i < lines.len() && lines[*i].1.starts_with("    ") {
        *i += 1;
    }
    lines[start..*i].to_vec()
}

fn numeric_columns<const N: usize>(rows: Vec<(usize, &str)>, path: &Path) -> Result<[Vec<f64>; N]> {
    let mut columns: [Vec<f64>; N] = std::array::from_fn(|_| Vec::with_capacity(rows.len()));
    for (lineno, row) in rows {
        let words: Vec<&str> = row.split_whitespace().collect();
        if words.len() < N {
            continue;
        }
        for (column, word) in columns.iter_mut().zip(&words) {
            column.push(parse_field(word, path, lineno)?);
        }
    }
    Ok(columns)
}

/// `L2 0.1 L3 0.7 ...` as (level, probability) pairs.
fn level_pairs(words: &[&str], path: &Path, lineno: usize) -> Result<Vec<(String, f64)>> {
    words
        .chunks_exact(2)
        .map(|pair| Ok((pair[0].to_string(), parse_field(pair[1], path, lineno)?)))
        .collect()
}
