use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum KeggError {
    #[error("missing required attribute '{key}' on <{element}>")]
    MissingAttribute { element: String, key: String },

    #[error("value of attribute '{key}' is not numeric: {value}")]
    NonNumericAttribute { key: String, value: String },

    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("pathway name {name} does not match org '{org}' and number '{number}'")]
    PathwayNameMismatch {
        name: String,
        org: String,
        number: String,
    },

    #[error("expected <{expected}> element, found <{found}>")]
    UnexpectedElement { expected: &'static str, found: String },

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("need to run analysis first")]
    AnalysisNotRun,

    #[error("none of the {tested} tested pathways is part of the selection")]
    NoMatchingPathways { tested: usize },

    #[error("delimiter {0:?} is reserved to separate the list of genes")]
    ReservedDelimiter(char),

    #[error("file {0} does already exist, set overwrite to replace it")]
    OutputExists(PathBuf),

    #[error("contingency table of pathway {pathway_id} has a negative cell: {table:?}")]
    NegativeContingencyCell {
        pathway_id: String,
        table: [[i64; 2]; 2],
    },

    #[error("statistical test failed: {0}")]
    Statistics(String),

    #[error("can not load {0}, file does not exist in cache")]
    CacheMiss(String),

    #[error("cache directory {0} does not exist")]
    CacheDirMissing(PathBuf),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("KEGG request failed: {0}")]
    KeggHttp(String),

    #[error("KEGG returned status {status}: {message}")]
    KeggStatus { status: u16, message: String },

    #[error("too many entries are requested at once ({requested}/{max})")]
    TooManyGenes { requested: usize, max: usize },

    #[error("no genes to request")]
    EmptyGeneRequest,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),
}
