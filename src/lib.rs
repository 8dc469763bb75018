//! KEGG pathway toolkit: KGML parsing and serialization, pathway enrichment
//! analysis, and a cached client for the KEGG REST API.

pub mod analysis;
pub mod catalog;
pub mod color;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod output;
pub mod resolver;
pub mod stats;
pub mod storage;
pub mod tsv;
pub mod xml;

pub use analysis::{CsvTarget, Enrichment, EnrichmentResult, EnrichmentSummary};
pub use error::KeggError;
pub use models::{KgmlElement, Pathway};
pub use resolver::{KeggClient, KeggHttpClient, Resolver};
pub use storage::Storage;
