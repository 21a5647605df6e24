use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use xraytab_data::{CoreWidthRecord, ElementRecord, VersionRecord};

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {path:?}"))
}

/// Non-comment, non-blank lines with their 1-based line numbers.
fn data_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.starts_with('#') && !line.trim().is_empty())
}

pub fn parse_field<T>(word: &str, path: &Path, lineno: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    word.parse()
        .with_context(|| format!("{}:{lineno}: bad value {word:?}", path.display()))
}

/// `Version.dat`: `tag // date // notes`.
pub fn parse_version(path: &Path) -> Result<Vec<VersionRecord>> {
    let content = read_source(path)?;
    Ok(data_lines(&content)
        .filter_map(|(_, line)| {
            let mut parts = line.splitn(3, "//").map(str::trim);
            Some(VersionRecord {
                tag: parts.next()?.to_string(),
                date: parts.next()?.to_string(),
                notes: parts.next()?.to_string(),
            })
        })
        .collect())
}

/// `elemental_data.txt`: `Z symbol name molar_mass density`.
pub fn parse_elements(path: &Path) -> Result<Vec<ElementRecord>> {
    let content = read_source(path)?;
    let mut records = Vec::new();
    for (lineno, line) in data_lines(&content) {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 5 {
            continue;
        }
        records.push(ElementRecord {
            atomic_number: parse_field(words[0], path, lineno)?,
            symbol: words[1].to_string(),
            name: words[2].to_string(),
            molar_mass: parse_field(words[3], path, lineno)?,
            density: parse_field(words[4], path, lineno)?,
        });
    }
    Ok(records)
}

pub struct CoreWidths {
    pub keski_rahkonen_krause: Vec<CoreWidthRecord>,
    /// Keski-Rahkonen and Krause with K and L edges from Krause and Oliver.
    pub merged: Vec<CoreWidthRecord>,
}

pub fn parse_core_widths(kk_path: &Path, ko_path: &Path) -> Result<CoreWidths> {
    let content = read_source(kk_path)?;
    let mut keski_rahkonen_krause = Vec::new();
    for (lineno, line) in data_lines(&content) {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 4 {
            continue;
        }
        keski_rahkonen_krause.push(CoreWidthRecord {
            atomic_number: parse_field(words[0], kk_path, lineno)?,
            element: words[1].to_string(),
            edge: words[2].to_string(),
            width: parse_field(words[3], kk_path, lineno)?,
        });
    }

    let mut merged: BTreeMap<(u16, String), CoreWidthRecord> = keski_rahkonen_krause
        .iter()
        .map(|r| ((r.atomic_number, r.edge.clone()), r.clone()))
        .collect();

    // Krause-Oliver rows: Z symbol K L1 L2 L3
    let content = read_source(ko_path)?;
    for (lineno, line) in data_lines(&content) {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 6 {
            continue;
        }
        let atomic_number: u16 = parse_field(words[0], ko_path, lineno)?;
        for (edge, word) in ["K", "L1", "L2", "L3"].into_iter().zip(&words[2..6]) {
            merged.insert(
                (atomic_number, edge.to_string()),
                CoreWidthRecord {
                    atomic_number,
                    element: words[1].to_string(),
                    edge: edge.to_string(),
                    width: parse_field(word, ko_path, lineno)?,
                },
            );
        }
    }

    Ok(CoreWidths {
        keski_rahkonen_krause,
        merged: merged.into_values().collect(),
    })
}
