use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::KeggError;
use crate::models::Pathway;
use crate::storage::Storage;
use crate::tsv::parse_tsv_to_dict;

pub const DEFAULT_BASE_URL: &str = "https://rest.kegg.jp";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Upper bound of identifiers in one `/list` request.
pub const MAX_GENES_PER_REQUEST: usize = 50;

pub trait KeggClient: Send + Sync {
    /// Body of a successful GET request to `url`.
    fn fetch(&self, url: &str) -> Result<String, KeggError>;
}

#[derive(Clone)]
pub struct KeggHttpClient {
    client: Client,
}

impl KeggHttpClient {
    pub fn new() -> Result<Self, KeggError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, KeggError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("kegg-tools/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| KeggError::KeggHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| KeggError::KeggHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, KeggError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "KEGG request failed".to_string());
        Err(KeggError::KeggStatus { status, message })
    }
}

impl KeggClient for KeggHttpClient {
    fn fetch(&self, url: &str) -> Result<String, KeggError> {
        tracing::info!(url, "requesting KEGG resource");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| KeggError::KeggHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        response
            .text()
            .map_err(|err| KeggError::KeggHttp(err.to_string()))
    }
}

/// Cache-or-fetch access to KEGG pathways and identifier lists.
pub struct Resolver<C: KeggClient> {
    storage: Storage,
    client: C,
    base_url: String,
}

impl<C: KeggClient> Resolver<C> {
    pub fn new(storage: Storage, client: C) -> Self {
        Self {
            storage,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cached content of `filename`, or the body of `url` which is then cached.
    pub fn cache_or_request(&self, filename: &str, url: &str) -> Result<String, KeggError> {
        if self.storage.exist(filename)? {
            tracing::debug!(filename, "cache hit");
            return self.storage.load(filename);
        }
        tracing::debug!(filename, url, "cache miss");
        let data = self.client.fetch(url)?;
        self.storage.save(filename, &data)?;
        Ok(data)
    }

    fn cache_or_request_to_dict(
        &self,
        filename: &str,
        url: &str,
        col_keys: usize,
        col_values: usize,
    ) -> Result<BTreeMap<String, String>, KeggError> {
        let data = self.cache_or_request(filename, url)?;
        Ok(parse_tsv_to_dict(&data, col_keys, col_values))
    }

    /// `path:<org><number>` to pathway title.
    pub fn get_pathway_list(&self, organism: &str) -> Result<BTreeMap<String, String>, KeggError> {
        self.cache_or_request_to_dict(
            &format!("pathway_list_{organism}.tsv"),
            &format!("{}/list/pathway/{organism}", self.base_url),
            0,
            1,
        )
    }

    pub fn get_pathway(&self, organism: &str, code: &str) -> Result<Pathway, KeggError> {
        let data = self.cache_or_request(
            &format!("{organism}_path{code}.kgml"),
            &format!("{}/get/{organism}{code}/kgml", self.base_url),
        )?;
        Pathway::parse(data)
    }

    pub fn get_compounds(&self) -> Result<BTreeMap<String, String>, KeggError> {
        self.cache_or_request_to_dict(
            "compound.tsv",
            &format!("{}/list/compound", self.base_url),
            0,
            1,
        )
    }

    /// Organism code to organism name. The first column of the list is the
    /// KEGG taxonomy id, so codes come from the second column.
    pub fn get_organism_list(&self) -> Result<BTreeMap<String, String>, KeggError> {
        self.cache_or_request_to_dict(
            "organism.tsv",
            &format!("{}/list/organism", self.base_url),
            1,
            2,
        )
    }

    pub fn check_organism(&self, organism: &str) -> Result<bool, KeggError> {
        Ok(self.get_organism_list()?.contains_key(organism))
    }
}

/// Resolves `<org>:<id>` gene identifiers to their primary gene name.
/// Never cached.
pub fn get_gene_names<C: KeggClient + ?Sized, S: AsRef<str>>(
    client: &C,
    base_url: &str,
    genes: &[S],
    max_genes: usize,
) -> Result<BTreeMap<String, String>, KeggError> {
    if genes.is_empty() {
        return Err(KeggError::EmptyGeneRequest);
    }
    if genes.len() > max_genes {
        return Err(KeggError::TooManyGenes {
            requested: genes.len(),
            max: max_genes,
        });
    }
    let query = genes
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("+");
    let data = client.fetch(&format!(
        "{}/list/{query}",
        base_url.trim_end_matches('/')
    ))?;
    Ok(parse_tsv_to_dict(&data, 0, 1)
        .into_iter()
        .map(|(key, value)| {
            let name = value.split(", ").next().unwrap_or_default().to_string();
            (key, name)
        })
        .collect())
}
