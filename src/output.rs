use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use crate::analysis::EnrichmentSummary;
use crate::models::PathwaySummary;

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_pathway(summary: &PathwaySummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    pub fn print_list(list: &BTreeMap<String, String>) -> io::Result<()> {
        Self::print_json(list)
    }

    pub fn print_enrichment(rows: &[EnrichmentSummary]) -> io::Result<()> {
        Self::print_json(&rows)
    }

    fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
