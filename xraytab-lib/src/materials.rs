use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::chantler::ChantlerKind;
use crate::chemparser::chemparse;
use crate::constants::{AVOGADRO, R_ELECTRON_CM, wavelength_cm};
use crate::db::XrayDb;
use crate::elam::CrossSectionKind;
use crate::error::{FormulaError, Result, XrayDbError};
use crate::materials_db::{Material, MaterialTable, OVERLAY_HEADER, format_line};

/// A material name or formula resolved to a formula and density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMaterial {
    pub formula: String,
    pub density: f64,
}

/// One element of a material: stoichiometric count, molar mass, and its
/// mass attenuation coefficient (cm²/g) at each energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialComponent {
    pub count: f64,
    pub atomic_mass: f64,
    pub mu: Vec<f64>,
}

/// Per-element breakdown of a material's attenuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialComponents {
    pub density: f64,
    /// Formula mass, sum of count times molar mass.
    pub mass: f64,
    /// Element symbols ordered by atomic number.
    pub elements: Vec<String>,
    pub components: HashMap<String, MaterialComponent>,
}

/// Anomalous components of the refractive index `n = 1 - delta - i beta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaBeta {
    pub delta: f64,
    pub beta: f64,
    /// Attenuation length in cm.
    pub attenuation_length: f64,
}

impl XrayDb {
    fn material_table(&self) -> Result<&RwLock<MaterialTable>> {
        self.materials.get_or_try_init(|| {
            MaterialTable::load(self.user_materials.as_deref()).map(RwLock::new)
        })
    }

    fn read_materials(&self) -> Result<RwLockReadGuard<'_, MaterialTable>> {
        Ok(self
            .material_table()?
            .read()
            .unwrap_or_else(PoisonError::into_inner))
    }

    /// Look up a material by name (case-insensitive).
    pub fn material_get(&self, name: &str) -> Result<Option<Material>> {
        Ok(self.read_materials()?.get(name).cloned())
    }

    /// Every known material, built-in first, with user entries applied.
    pub fn materials(&self) -> Result<Vec<Material>> {
        Ok(self.read_materials()?.entries().to_vec())
    }

    /// Resolve a material name or formula to a formula and density.
    ///
    /// Tries a material name, then a known formula (first match in table
    /// order), then treats `name` as a formula. An explicit `density`
    /// overrides the tabulated one.
    pub fn resolve_material(&self, name: &str, density: Option<f64>) -> Result<ResolvedMaterial> {
        let table = self.read_materials()?;
        let known = table.get(name).or_else(|| table.find_formula(name));
        let formula = known.map_or_else(|| name.to_string(), |m| m.formula.clone());
        let density = density
            .or(known.map(|m| m.density))
            .ok_or_else(|| XrayDbError::MissingDensity(name.to_string()))?;
        Ok(ResolvedMaterial { formula, density })
    }

    /// Add or replace a material, appending it to the user materials file
    /// when one is configured. The entry is usable immediately.
    ///
    /// Names must be non-empty, must not start with `#`, and must not
    /// contain `|` or line breaks, so that the file reads back the same.
    pub fn material_add(&self, name: &str, formula: &str, density: f64) -> Result<()> {
        let name = name.trim();
        if name.is_empty() || name.starts_with('#') || name.contains(['|', '\n', '\r']) {
            return Err(XrayDbError::InvalidMaterialName(name.to_string()));
        }
        let material = Material {
            name: name.to_lowercase(),
            formula: formula.split_whitespace().collect(),
            density,
        };
        chemparse(&material.formula)?;

        let table = self.material_table()?;
        let _guard = self
            .materials_writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(path) = &self.user_materials {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            let is_new = !path.exists();
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            if is_new {
                file.write_all(OVERLAY_HEADER.as_bytes())?;
            }
            file.write_all(format_line(&material).as_bytes())?;
            log::info!("added material {:?} to {path:?}", material.name);
        }

        table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(material);
        Ok(())
    }

    /// Attenuation coefficient of a material in 1/cm at energies in eV.
    ///
    /// `material` is a material name or a chemical formula; `density`
    /// (g/cm³) is required unless the material is known. A given `density`
    /// takes precedence over the tabulated one, as in current xraydb; older
    /// larch releases let the table win.
    pub fn material_mu(
        &self,
        material: &str,
        energies: &[f64],
        density: Option<f64>,
        kind: CrossSectionKind,
    ) -> Result<Vec<f64>> {
        let parts = self.material_mu_components(material, energies, density, kind)?;
        let mut mu = vec![0.0_f64; energies.len()];
        for part in parts.components.values() {
            let mass = part.count * part.atomic_mass;
            for (total, value) in mu.iter_mut().zip(&part.mu) {
                *total += mass * value;
            }
        }
        let scale = parts.density / parts.mass;
        Ok(mu.into_iter().map(|v| v * scale).collect())
    }

    /// Scalar form of [`material_mu`](Self::material_mu).
    pub fn material_mu_at(
        &self,
        material: &str,
        energy: f64,
        density: Option<f64>,
        kind: CrossSectionKind,
    ) -> Result<f64> {
        Ok(self.material_mu(material, &[energy], density, kind)?[0])
    }

    /// Per-element data behind [`material_mu`](Self::material_mu).
    pub fn material_mu_components(
        &self,
        material: &str,
        energies: &[f64],
        density: Option<f64>,
        kind: CrossSectionKind,
    ) -> Result<MaterialComponents> {
        let resolved = self.resolve_material(material, density)?;
        let composition = chemparse(&resolved.formula)?;

        let mut elements: Vec<(u16, String)> = composition
            .keys()
            .map(|sym| Ok((self.atomic_number(sym)?, sym.clone())))
            .collect::<Result<_>>()?;
        elements.sort();

        let mut mass = 0.0;
        let mut components = HashMap::new();
        for (z, sym) in &elements {
            let count = composition[sym];
            let atomic_mass = self.molar_mass(*z)?;
            let mu = self.mu_elam(*z, energies, kind)?;
            mass += count * atomic_mass;
            components.insert(
                sym.clone(),
                MaterialComponent {
                    count,
                    atomic_mass,
                    mu,
                },
            );
        }
        if !(mass > 0.0) {
            return Err(FormulaError::new("formula has no mass", &resolved.formula, 0).into());
        }

        Ok(MaterialComponents {
            density: resolved.density,
            mass,
            elements: elements.into_iter().map(|(_, sym)| sym).collect(),
            components,
        })
    }

    /// Anomalous components of the refractive index and the attenuation
    /// length at `energy` in eV, from the Chantler tables.
    ///
    /// Unless `photo_only`, beta is scaled by `mu_total / mu_photo` of each
    /// element to include scattering.
    pub fn xray_delta_beta(
        &self,
        material: &str,
        density: Option<f64>,
        energy: f64,
        photo_only: bool,
    ) -> Result<DeltaBeta> {
        let resolved = self.resolve_material(material, density)?;
        let composition = chemparse(&resolved.formula)?;
        let lambda = wavelength_cm(energy);

        let mut total_mass = 0.0;
        let mut delta = 0.0;
        let mut beta = 0.0;
        for (sym, &count) in &composition {
            let z = self.atomic_number(sym.as_str())?;
            let f1 = self.f1_chantler(z, &[energy])?[0];
            let f2 = self.f2_chantler(z, &[energy])?[0];
            let weight = resolved.density * count * AVOGADRO;

            delta += weight * (f64::from(z) + f1);
            beta += if photo_only {
                weight * f2
            } else {
                let mu_photo = self.mu_chantler(z, &[energy], ChantlerKind::Photo)?[0];
                let mu_total = self.mu_chantler(z, &[energy], ChantlerKind::Total)?[0];
                weight * f2 * (mu_total / mu_photo)
            };
            total_mass += count * self.molar_mass(z)?;
        }
        if !(total_mass > 0.0) {
            return Err(FormulaError::new("formula has no mass", &resolved.formula, 0).into());
        }

        let scale = lambda * lambda * R_ELECTRON_CM / (2.0 * std::f64::consts::PI * total_mass);
        let (delta, beta) = (delta * scale, beta * scale);
        Ok(DeltaBeta {
            delta,
            beta,
            attenuation_length: lambda / (4.0 * std::f64::consts::PI * beta),
        })
    }

    /// Complex refractive index `1 - delta - i beta`.
    pub fn refractive_index(&self, material: &str, density: Option<f64>, energy: f64) -> Result<Complex64> {
        let db = self.xray_delta_beta(material, density, energy, false)?;
        Ok(Complex64::new(1.0 - db.delta, -db.beta))
    }
}
