//! X-ray interaction data for the elements and X-ray properties of materials.
//!
//! All lookups go through an [`XrayDb`], which decodes its tables on first
//! use and owns every cache.
//!
//! ```no_run
//! use xraytab::{CrossSectionKind, XrayDb};
//!
//! let db = XrayDb::new();
//! let mu = db.material_mu("water", &[10_000.0], None, CrossSectionKind::Total)?;
//! let edge = db.xray_edge("Fe", "K")?;
//! println!("mu = {:.3} 1/cm, Fe K edge at {} eV", mu[0], edge.energy);
//! # Ok::<(), xraytab::XrayDbError>(())
//! ```

pub mod chantler;
pub mod chemparser;
pub mod config;
pub mod constants;
pub mod core_widths;
pub mod coster_kronig;
pub mod db;
pub mod edge_guess;
pub mod elam;
pub mod element;
pub mod error;
pub mod interp;
pub mod materials;
pub mod materials_db;
pub mod spline;
pub mod transitions;
pub mod waasmaier;

pub use chantler::ChantlerKind;
pub use config::XrayDbConfig;
pub use db::XrayDb;
pub use edge_guess::DEFAULT_GUESS_EDGES;
pub use elam::CrossSectionKind;
pub use element::ElementRef;
pub use error::{FormulaError, Result, XrayDbError};
pub use materials::{DeltaBeta, MaterialComponent, MaterialComponents, ResolvedMaterial};
pub use materials_db::Material;
pub use transitions::{FluorescenceYield, XrayEdge, XrayLine};
pub use xraytab_data;
