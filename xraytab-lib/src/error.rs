use std::fmt;
use std::path::PathBuf;

/// A malformed chemical formula, with the offset of the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaError {
    pub message: String,
    pub formula: String,
    pub position: usize,
}

impl FormulaError {
    pub(crate) fn new(message: impl Into<String>, formula: &str, position: usize) -> Self {
        FormulaError {
            message: message.into(),
            formula: formula.to_string(),
            position,
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = self.formula[..self.position.min(self.formula.len())]
            .chars()
            .count();
        write!(
            f,
            "{}:\n{}\n{:pad$}^",
            self.message,
            self.formula,
            "",
            pad = pad
        )
    }
}

impl std::error::Error for FormulaError {}

#[derive(Debug, thiserror::Error)]
pub enum XrayDbError {
    #[error("invalid chemical formula: {0}")]
    InvalidFormula(#[from] FormulaError),

    #[error("unknown element: {0}")]
    UnknownElement(String),

    #[error("unknown edge '{edge}' for element '{element}'")]
    UnknownEdge { element: String, edge: String },

    #[error("unknown ion: {0}")]
    UnknownIon(String),

    #[error("unknown cross-section kind: {0}")]
    UnknownKind(String),

    #[error("no {table} data for element '{element}'")]
    MissingTable { table: &'static str, element: String },

    #[error("invalid material name {0:?}")]
    InvalidMaterialName(String),

    #[error("density must be given for unknown material '{0}'")]
    MissingDensity(String),

    #[error("X-ray data file not found: {0:?}")]
    DataNotFound(PathBuf),

    #[error("could not decode X-ray data: {0}")]
    Decode(String),

    #[error("data error: {0}")]
    DataError(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, XrayDbError>;
