//! Pathway overrepresentation analysis of a gene list.

use std::collections::HashSet;
use std::fmt;
use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;

use crate::error::KeggError;
use crate::models::Pathway;
use crate::stats::fisher_exact;
use crate::storage::write_atomic;

/// Separator of the gene list inside one CSV field.
pub const CSV_GENE_DELIMITER: char = ' ';

pub const DEFAULT_GENE_DELIMITER: &str = ",";

const HEADER: [&str; 7] = [
    "pathway_name",
    "pathway_title",
    "pathway_id",
    "study_count",
    "pathway_genes",
    "pvalue",
    "found_genes",
];

/// Outcome of testing one pathway against a gene list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentResult {
    pub organism: String,
    /// Pathway number, e.g. `04064`.
    pub pathway_id: String,
    pub pathway_name: String,
    pub pathway_title: Option<String>,
    pub found_genes: Vec<String>,
    pub pathway_genes: Vec<String>,
    /// `None` until tested; pathways without any found gene stay untested.
    pub pvalue: Option<f64>,
}

/// Flat export row of an [`EnrichmentResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentSummary {
    pub pathway_name: String,
    pub pathway_title: Option<String>,
    pub pathway_id: String,
    pub study_count: usize,
    pub pathway_genes: usize,
    pub pvalue: Option<f64>,
    pub found_genes: String,
}

impl EnrichmentResult {
    pub fn new(
        organism: impl Into<String>,
        pathway_id: impl Into<String>,
        pathway_name: impl Into<String>,
        pathway_title: Option<String>,
        found_genes: Vec<String>,
        pathway_genes: Vec<String>,
    ) -> Self {
        Self {
            organism: organism.into(),
            pathway_id: pathway_id.into(),
            pathway_name: pathway_name.into(),
            pathway_title,
            found_genes,
            pathway_genes,
            pvalue: None,
        }
    }

    pub fn pathway_genes_count(&self) -> usize {
        self.pathway_genes.len()
    }

    pub fn study_count(&self) -> usize {
        self.found_genes.len()
    }

    pub fn json_summary(&self, gene_delimiter: &str) -> EnrichmentSummary {
        EnrichmentSummary {
            pathway_name: self.pathway_name.clone(),
            pathway_title: self.pathway_title.clone(),
            pathway_id: self.pathway_id.clone(),
            study_count: self.study_count(),
            pathway_genes: self.pathway_genes_count(),
            pvalue: self.pvalue,
            found_genes: self.found_genes.join(gene_delimiter),
        }
    }

    /// Column names shared by every export format.
    pub fn header() -> [&'static str; 7] {
        HEADER
    }
}

impl fmt::Display for EnrichmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<EnrichmentResult {}:{} ({}) {}/{}>",
            self.organism,
            self.pathway_id,
            self.pathway_name,
            self.study_count(),
            self.pathway_genes_count()
        )
    }
}

/// Where [`Enrichment::to_csv`] writes to.
pub enum CsvTarget<'a> {
    /// A file; fails when it exists and `overwrite` is not set.
    Path { path: &'a Utf8Path, overwrite: bool },
    Writer(&'a mut dyn Write),
}

/// Header plus one string row per result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub header: [&'static str; 7],
    pub rows: Vec<[String; 7]>,
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header.join("\t"))?;
        for row in &self.rows {
            writeln!(f, "{}", row.join("\t"))?;
        }
        Ok(())
    }
}

/// Enrichment analysis over a fixed pathway collection.
///
/// Results accumulate: every call to [`Enrichment::run_analysis`] appends to the
/// result list of earlier calls. Build a new engine for an independent run.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pathways: Vec<Pathway>,
    result: Vec<EnrichmentResult>,
}

impl Enrichment {
    pub fn new(pathways: Vec<Pathway>) -> Self {
        Self {
            pathways,
            result: Vec::new(),
        }
    }

    pub fn pathways(&self) -> &[Pathway] {
        &self.pathways
    }

    pub fn result(&self) -> &[EnrichmentResult] {
        &self.result
    }

    pub fn result_mut(&mut self) -> &mut Vec<EnrichmentResult> {
        &mut self.result
    }

    fn check_analysis_result_exist(&self) -> Result<(), KeggError> {
        if self.result.is_empty() {
            return Err(KeggError::AnalysisNotRun);
        }
        Ok(())
    }

    /// Tests every pathway for overrepresentation of `gene_list` and returns
    /// the accumulated result list.
    pub fn run_analysis<S: AsRef<str>>(
        &mut self,
        gene_list: &[S],
    ) -> Result<&[EnrichmentResult], KeggError> {
        let study_genes: HashSet<&str> = gene_list.iter().map(AsRef::as_ref).collect();
        let study_n = gene_list.len() as i64;
        let mut all_found_genes = 0usize;
        let mut absolute_pathway_genes = 0i64;

        for pathway in &self.pathways {
            let pathway_genes = pathway.get_genes();
            absolute_pathway_genes += pathway_genes.len() as i64;

            let found_genes: Vec<String> = pathway_genes
                .iter()
                .filter(|gene| study_genes.contains(gene.as_str()))
                .cloned()
                .collect();
            all_found_genes += found_genes.len();

            self.result.push(EnrichmentResult::new(
                pathway.org(),
                pathway.number(),
                pathway.name(),
                pathway.title().map(str::to_string),
                found_genes,
                pathway_genes,
            ));
        }
        tracing::debug!(
            pathways = self.pathways.len(),
            study_genes = gene_list.len(),
            found = all_found_genes,
            "collected pathway genes"
        );

        for analysis in &mut self.result {
            if analysis.study_count() == 0 {
                continue;
            }
            let a = analysis.study_count() as i64;
            let b = study_n - a;
            let c = analysis.pathway_genes_count() as i64 - a;
            let d = absolute_pathway_genes - analysis.pathway_genes_count() as i64 - b;
            let table = [[a, b], [c, d]];
            let cells = non_negative_table(table).ok_or_else(|| {
                KeggError::NegativeContingencyCell {
                    pathway_id: analysis.pathway_id.clone(),
                    table,
                }
            })?;
            analysis.pvalue = Some(fisher_exact(cells)?);
        }

        Ok(&self.result)
    }

    /// Results whose pathway id is one of `pathway_ids`. With `inplace` the
    /// engine keeps only those results.
    pub fn get_subset<S: AsRef<str>>(
        &mut self,
        pathway_ids: &[S],
        inplace: bool,
    ) -> Result<Vec<EnrichmentResult>, KeggError> {
        self.check_analysis_result_exist()?;
        let wanted: HashSet<&str> = pathway_ids.iter().map(AsRef::as_ref).collect();
        let subset: Vec<EnrichmentResult> = self
            .result
            .iter()
            .filter(|item| wanted.contains(item.pathway_id.as_str()))
            .cloned()
            .collect();
        if inplace {
            self.result = subset.clone();
        }
        Ok(subset)
    }

    /// Keeps only the results of `pathway_ids`. When none of them was tested
    /// the results are left as they are and [`KeggError::NoMatchingPathways`] is returned.
    pub fn retain_pathways<S: AsRef<str>>(&mut self, pathway_ids: &[S]) -> Result<usize, KeggError> {
        let subset = self.get_subset(pathway_ids, false)?;
        if subset.is_empty() {
            return Err(KeggError::NoMatchingPathways {
                tested: self.result.len(),
            });
        }
        tracing::debug!(kept = subset.len(), tested = self.result.len(), "filtered results");
        self.result = subset;
        Ok(self.result.len())
    }

    pub fn to_json(&self) -> Result<Vec<EnrichmentSummary>, KeggError> {
        self.check_analysis_result_exist()?;
        Ok(self
            .result
            .iter()
            .map(|item| item.json_summary(DEFAULT_GENE_DELIMITER))
            .collect())
    }

    /// Writes a header row and one row per result. Genes inside a row are
    /// separated by a space, so `delimiter` must not be a space.
    pub fn to_csv(&self, target: CsvTarget<'_>, delimiter: u8) -> Result<(), KeggError> {
        self.check_analysis_result_exist()?;
        if char::from(delimiter) == CSV_GENE_DELIMITER {
            return Err(KeggError::ReservedDelimiter(CSV_GENE_DELIMITER));
        }
        if let CsvTarget::Path { path, overwrite } = &target {
            if path.as_std_path().is_file() && !overwrite {
                return Err(KeggError::OutputExists(path.as_std_path().to_path_buf()));
            }
        }

        let content = self.csv_bytes(delimiter)?;
        match target {
            CsvTarget::Path { path, .. } => {
                write_atomic(path, &content)?;
                tracing::info!(path = %path, rows = self.result.len(), "wrote enrichment CSV");
            }
            CsvTarget::Writer(writer) => {
                writer
                    .write_all(&content)
                    .map_err(|err| KeggError::Filesystem(err.to_string()))?;
                writer
                    .flush()
                    .map_err(|err| KeggError::Filesystem(err.to_string()))?;
            }
        }
        Ok(())
    }

    fn csv_bytes(&self, delimiter: u8) -> Result<Vec<u8>, KeggError> {
        let gene_delimiter = CSV_GENE_DELIMITER.to_string();
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());
        for item in &self.result {
            writer
                .serialize(item.json_summary(&gene_delimiter))
                .map_err(|err| KeggError::Serialization(err.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|err| KeggError::Serialization(err.to_string()))
    }

    pub fn to_table(&self) -> Result<ResultTable, KeggError> {
        self.check_analysis_result_exist()?;
        let rows = self
            .result
            .iter()
            .map(|item| {
                let summary = item.json_summary(DEFAULT_GENE_DELIMITER);
                [
                    summary.pathway_name,
                    summary.pathway_title.unwrap_or_default(),
                    summary.pathway_id,
                    summary.study_count.to_string(),
                    summary.pathway_genes.to_string(),
                    summary.pvalue.map(|p| format!("{p:?}")).unwrap_or_default(),
                    summary.found_genes,
                ]
            })
            .collect();
        Ok(ResultTable {
            header: HEADER,
            rows,
        })
    }
}

fn non_negative_table(table: [[i64; 2]; 2]) -> Option<[[u64; 2]; 2]> {
    let cell = |value: i64| u64::try_from(value).ok();
    Some([
        [cell(table[0][0])?, cell(table[0][1])?],
        [cell(table[1][0])?, cell(table[1][1])?],
    ])
}
