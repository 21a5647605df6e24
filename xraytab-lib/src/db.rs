use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use once_cell::sync::OnceCell;
use xraytab_data::{ElementRecord, VersionRecord, XrayDatabase};

use crate::config::XrayDbConfig;
use crate::element::ElementRef;
use crate::error::{Result, XrayDbError};
use crate::materials_db::MaterialTable;

/// Decoded tables plus lookup indices, built once per [`XrayDb`].
pub(crate) struct Tables {
    pub(crate) data: XrayDatabase,
    z_to_element: HashMap<u16, usize>,
    // lowercase symbol and lowercase name -> Z
    key_to_z: HashMap<String, u16>,
    photo: HashMap<u16, usize>,
    scatter: HashMap<u16, usize>,
    chantler: HashMap<u16, usize>,
    levels: HashMap<u16, Vec<usize>>,
    transitions: HashMap<u16, Vec<usize>>,
}

impl Tables {
    fn build(data: XrayDatabase) -> Result<Self> {
        let mut z_to_element = HashMap::new();
        let mut key_to_z = HashMap::new();
        let mut symbol_to_z = HashMap::new();
        for (i, elem) in data.elements.iter().enumerate() {
            z_to_element.insert(elem.atomic_number, i);
            symbol_to_z.insert(elem.symbol.clone(), elem.atomic_number);
            key_to_z.insert(elem.symbol.to_lowercase(), elem.atomic_number);
            key_to_z.insert(elem.name.to_lowercase(), elem.atomic_number);
        }

        let z_of = |sym: &str| symbol_to_z.get(sym).copied();

        let mut photo = HashMap::new();
        for (i, row) in data.photoabsorption.iter().enumerate() {
            check_knots(
                &row.element,
                "photoabsorption",
                &row.log_energy,
                &[&row.log_photoabsorption, &row.log_photoabsorption_spline],
            )?;
            if let Some(z) = z_of(&row.element) {
                photo.insert(z, i);
            }
        }

        let mut scatter = HashMap::new();
        for (i, row) in data.scattering.iter().enumerate() {
            check_knots(
                &row.element,
                "scattering",
                &row.log_energy,
                &[
                    &row.log_coherent_scatter,
                    &row.log_coherent_scatter_spline,
                    &row.log_incoherent_scatter,
                    &row.log_incoherent_scatter_spline,
                ],
            )?;
            if let Some(z) = z_of(&row.element) {
                scatter.insert(z, i);
            }
        }

        let mut chantler = HashMap::new();
        for (i, row) in data.chantler.iter().enumerate() {
            check_knots(
                &row.element,
                "Chantler",
                &row.energy,
                &[&row.f1, &row.f2, &row.mu_photo, &row.mu_incoh, &row.mu_total],
            )?;
            if let Some(z) = z_of(&row.element) {
                chantler.insert(z, i);
            }
        }

        let mut levels: HashMap<u16, Vec<usize>> = HashMap::new();
        for (i, level) in data.xray_levels.iter().enumerate() {
            match z_of(&level.element) {
                Some(z) => levels.entry(z).or_default().push(i),
                None => log::warn!("edge {} for unknown element {}", level.iupac_symbol, level.element),
            }
        }

        let mut transitions: HashMap<u16, Vec<usize>> = HashMap::new();
        for (i, trans) in data.xray_transitions.iter().enumerate() {
            if let Some(z) = z_of(&trans.element) {
                transitions.entry(z).or_default().push(i);
            }
        }

        log::debug!(
            "indexed {} elements, {} edges, {} lines",
            data.elements.len(),
            data.xray_levels.len(),
            data.xray_transitions.len()
        );

        Ok(Tables {
            data,
            z_to_element,
            key_to_z,
            photo,
            scatter,
            chantler,
            levels,
            transitions,
        })
    }

    pub(crate) fn photo_row(&self, z: u16) -> Option<&xraytab_data::PhotoabsorptionRecord> {
        self.photo.get(&z).map(|&i| &self.data.photoabsorption[i])
    }

    pub(crate) fn scatter_row(&self, z: u16) -> Option<&xraytab_data::ScatteringRecord> {
        self.scatter.get(&z).map(|&i| &self.data.scattering[i])
    }

    pub(crate) fn chantler_row(&self, z: u16) -> Option<&xraytab_data::ChantlerRecord> {
        self.chantler.get(&z).map(|&i| &self.data.chantler[i])
    }

    pub(crate) fn levels_of(
        &self,
        z: u16,
    ) -> impl Iterator<Item = &xraytab_data::XrayLevelRecord> + '_ {
        self.levels
            .get(&z)
            .into_iter()
            .flatten()
            .map(|&i| &self.data.xray_levels[i])
    }

    pub(crate) fn transitions_of(
        &self,
        z: u16,
    ) -> impl Iterator<Item = &xraytab_data::XrayTransitionRecord> + '_ {
        self.transitions
            .get(&z)
            .into_iter()
            .flatten()
            .map(|&i| &self.data.xray_transitions[i])
    }

    fn resolve(&self, element: ElementRef<'_>) -> Option<u16> {
        match element {
            ElementRef::Number(z) => self.z_to_element.contains_key(&z).then_some(z),
            ElementRef::Symbol(s) => {
                let key = s.trim().to_lowercase();
                if let Some(&z) = self.key_to_z.get(&key) {
                    return Some(z);
                }
                key.parse::<u16>()
                    .ok()
                    .filter(|z| self.z_to_element.contains_key(z))
            }
        }
    }
}

// Co-indexed arrays must have equal length, and the abscissa must not decrease.
fn check_knots(element: &str, table: &str, x: &[f64], columns: &[&Vec<f64>]) -> Result<()> {
    if columns.iter().any(|c| c.len() != x.len()) {
        return Err(XrayDbError::DataError(format!(
            "{table} arrays for {element} have mismatched lengths"
        )));
    }
    if x.windows(2).any(|w| !(w[1] >= w[0])) {
        return Err(XrayDbError::DataError(format!(
            "{table} energies for {element} are not increasing"
        )));
    }
    Ok(())
}

enum DataSource {
    File(PathBuf),
    Compressed(Vec<u8>),
    Preloaded,
    Missing,
}

/// The main interface to the X-ray tables.
///
/// Holds every cache: the decoded tables, the per-edge energy arrays used
/// by [`guess_edge`](XrayDb::guess_edge), and the merged materials table.
/// Tables are decoded on first use; share one instance by reference or
/// `Arc` rather than constructing one per call.
pub struct XrayDb {
    source: DataSource,
    tables: OnceCell<Tables>,
    pub(crate) edge_energies: RwLock<HashMap<String, Arc<[f64]>>>,
    pub(crate) materials: OnceCell<RwLock<MaterialTable>>,
    pub(crate) user_materials: Option<PathBuf>,
    pub(crate) materials_writer: Mutex<()>,
}

impl XrayDb {
    /// Database configured from the environment (see [`XrayDbConfig::from_env`]).
    pub fn new() -> Self {
        Self::with_config(XrayDbConfig::from_env())
    }

    pub fn with_config(config: XrayDbConfig) -> Self {
        let source = match config.data_path {
            Some(path) => DataSource::File(path),
            None => DataSource::Missing,
        };
        Self::from_source(source, OnceCell::new(), config.user_materials)
    }

    /// Database backed by an in-memory compressed blob, decoded on first use.
    pub fn from_compressed(bytes: Vec<u8>) -> Self {
        Self::from_source(DataSource::Compressed(bytes), OnceCell::new(), None)
    }

    /// Database over already-decoded tables.
    pub fn from_database(data: XrayDatabase) -> Result<Self> {
        let tables = OnceCell::with_value(Tables::build(data)?);
        Ok(Self::from_source(DataSource::Preloaded, tables, None))
    }

    /// Sets the user materials overlay file; `None` keeps additions in memory.
    pub fn with_user_materials(mut self, path: Option<PathBuf>) -> Self {
        self.user_materials = path;
        self.materials = OnceCell::new();
        self
    }

    fn from_source(
        source: DataSource,
        tables: OnceCell<Tables>,
        user_materials: Option<PathBuf>,
    ) -> Self {
        XrayDb {
            source,
            tables,
            edge_energies: RwLock::new(HashMap::new()),
            materials: OnceCell::new(),
            user_materials,
            materials_writer: Mutex::new(()),
        }
    }

    pub(crate) fn tables(&self) -> Result<&Tables> {
        self.tables.get_or_try_init(|| {
            let data = match &self.source {
                DataSource::File(path) => {
                    log::debug!("loading X-ray tables from {path:?}");
                    if !path.exists() {
                        return Err(XrayDbError::DataNotFound(path.clone()));
                    }
                    decode_database(&std::fs::read(path)?)?
                }
                DataSource::Compressed(bytes) => decode_database(bytes)?,
                DataSource::Preloaded | DataSource::Missing => {
                    return Err(XrayDbError::DataNotFound(PathBuf::new()));
                }
            };
            Tables::build(data)
        })
    }

    /// Access the raw decoded tables.
    pub fn raw(&self) -> Result<&XrayDatabase> {
        Ok(&self.tables()?.data)
    }

    /// Latest version record of the loaded tables, if any.
    pub fn version(&self) -> Result<Option<&VersionRecord>> {
        Ok(self.raw()?.version.last())
    }

    /// Resolve an element (number, symbol, name, or Z string) to Z.
    pub fn resolve_element<'e>(&self, element: impl Into<ElementRef<'e>>) -> Result<u16> {
        let element = element.into();
        self.tables()?
            .resolve(element)
            .ok_or_else(|| XrayDbError::UnknownElement(element.to_string()))
    }

    pub(crate) fn element_record<'e>(
        &self,
        element: impl Into<ElementRef<'e>>,
    ) -> Result<&ElementRecord> {
        let element = element.into();
        let tables = self.tables()?;
        tables
            .resolve(element)
            .and_then(|z| tables.z_to_element.get(&z))
            .map(|&i| &tables.data.elements[i])
            .ok_or_else(|| XrayDbError::UnknownElement(element.to_string()))
    }

    pub fn atomic_number<'e>(&self, element: impl Into<ElementRef<'e>>) -> Result<u16> {
        self.resolve_element(element)
    }

    pub fn symbol<'e>(&self, element: impl Into<ElementRef<'e>>) -> Result<&str> {
        Ok(&self.element_record(element)?.symbol)
    }

    pub fn atomic_name<'e>(&self, element: impl Into<ElementRef<'e>>) -> Result<&str> {
        Ok(&self.element_record(element)?.name)
    }

    /// Molar mass in g/mol.
    pub fn molar_mass<'e>(&self, element: impl Into<ElementRef<'e>>) -> Result<f64> {
        Ok(self.element_record(element)?.molar_mass)
    }

    /// Density of the pure element in g/cm³.
    pub fn density<'e>(&self, element: impl Into<ElementRef<'e>>) -> Result<f64> {
        Ok(self.element_record(element)?.density)
    }
}

impl Default for XrayDb {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_database(compressed: &[u8]) -> Result<XrayDatabase> {
    let mut decoder = ruzstd::decoding::StreamingDecoder::new(compressed)
        .map_err(|e| XrayDbError::Decode(format!("{e:?}")))?;
    let mut decompressed = Vec::new();
    std::io::Read::read_to_end(&mut decoder, &mut decompressed)?;
    log::debug!("decompressed {} bytes of X-ray tables", decompressed.len());

    postcard::from_bytes(&decompressed).map_err(|e| XrayDbError::Decode(e.to_string()))
}
