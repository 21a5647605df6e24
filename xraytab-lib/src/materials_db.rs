use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Built-in materials shipped with the library.
const BUILTIN_MATERIALS: &str = include_str!("../data/materials.dat");

/// Header written at the top of a new user materials file.
pub(crate) const OVERLAY_HEADER: &str = "# user-specific database of materials\n# name, formula, density\n";

/// A named material: formula (spaces removed) and density in g/cm³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub formula: String,
    pub density: f64,
}

/// Name-keyed materials in file order. Re-adding a name replaces the
/// entry in place, so a user file shadows the built-in list.
#[derive(Debug, Clone, Default)]
pub(crate) struct MaterialTable {
    entries: Vec<Material>,
    index: HashMap<String, usize>,
}

impl MaterialTable {
    pub(crate) fn builtin() -> Self {
        let mut table = MaterialTable::default();
        table.extend_from_text(BUILTIN_MATERIALS, "built-in materials");
        table
    }

    /// Built-in materials overlaid with the user file, if it exists.
    pub(crate) fn load(user_file: Option<&Path>) -> Result<Self> {
        let mut table = Self::builtin();
        if let Some(path) = user_file.filter(|p| p.exists()) {
            let text = std::fs::read_to_string(path)?;
            table.extend_from_text(&text, &path.display().to_string());
            log::debug!("loaded user materials from {path:?}");
        }
        Ok(table)
    }

    pub(crate) fn extend_from_text(&mut self, text: &str, source: &str) {
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line) {
                Some(material) => self.insert(material),
                None => log::warn!("{source}:{}: skipping malformed material line {line:?}", lineno + 1),
            }
        }
    }

    pub(crate) fn insert(&mut self, material: Material) {
        let key = material.name.to_lowercase();
        match self.index.get(&key) {
            Some(&i) => self.entries[i] = material,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(material);
            }
        }
    }

    /// Case-insensitive lookup by name.
    pub(crate) fn get(&self, name: &str) -> Option<&Material> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.entries[i])
    }

    /// First entry, in table order, whose formula matches case-insensitively.
    pub(crate) fn find_formula(&self, formula: &str) -> Option<&Material> {
        let formula = formula.replace(' ', "").to_lowercase();
        self.entries
            .iter()
            .find(|m| m.formula.to_lowercase() == formula)
    }

    pub(crate) fn entries(&self) -> &[Material] {
        &self.entries
    }
}

/// `name | formula | density`, or `None` if malformed.
pub(crate) fn parse_line(line: &str) -> Option<Material> {
    let mut fields = line.split('|').map(str::trim);
    let (name, formula, density) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() || name.is_empty() || formula.is_empty() {
        return None;
    }
    let density: f64 = density.parse().ok()?;
    Some(Material {
        name: name.to_lowercase(),
        formula: formula.split_whitespace().collect(),
        density,
    })
}

pub(crate) fn format_line(material: &Material) -> String {
    format!(
        " {} | {} | {}\n",
        material.name, material.formula, material.density
    )
}
