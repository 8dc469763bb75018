use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use kegg_tools::error::KeggError;
use kegg_tools::resolver::{
    DEFAULT_BASE_URL, KeggClient, MAX_GENES_PER_REQUEST, Resolver, get_gene_names,
};
use kegg_tools::storage::Storage;

const BASE_URL: &str = "http://kegg.test";

#[derive(Default)]
struct MockKegg {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockKegg {
    fn with_response(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), body.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl KeggClient for MockKegg {
    fn fetch(&self, url: &str) -> Result<String, KeggError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| KeggError::KeggStatus {
                status: 404,
                message: format!("no mock for {url}"),
            })
    }
}

fn resolver(client: MockKegg) -> (tempfile::TempDir, Resolver<MockKegg>) {
    let dir = tempfile::tempdir().unwrap();
    let cache = Utf8PathBuf::from_path_buf(dir.path().join("cache")).unwrap();
    let storage = Storage::new(cache).unwrap();
    (dir, Resolver::new(storage, client).with_base_url(BASE_URL))
}

#[test]
fn base_url_defaults_to_kegg() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let resolver = Resolver::new(Storage::new(cache).unwrap(), MockKegg::default());
    assert_eq!(resolver.base_url(), DEFAULT_BASE_URL);
    assert_eq!(
        resolver.with_base_url("http://localhost/").base_url(),
        "http://localhost"
    );
}

#[test]
fn cache_or_request_fetches_once() {
    let client = MockKegg::default().with_response("http://example.com/test.txt", "hello world!");
    let (_dir, resolver) = resolver(client);

    assert!(!resolver.storage().exist("test.txt").unwrap());
    let first = resolver
        .cache_or_request("test.txt", "http://example.com/test.txt")
        .unwrap();
    assert_eq!(first, "hello world!");
    assert!(resolver.storage().exist("test.txt").unwrap());

    let second = resolver
        .cache_or_request("test.txt", "http://example.com/test.txt")
        .unwrap();
    assert_eq!(second, "hello world!");
    assert_eq!(resolver.client().calls().len(), 1);
}

#[test]
fn failed_fetch_is_not_cached() {
    let (_dir, resolver) = resolver(MockKegg::default());
    assert_matches!(
        resolver.cache_or_request("missing.txt", "http://example.com/missing.txt"),
        Err(KeggError::KeggStatus { status: 404, .. })
    );
    assert!(!resolver.storage().exist("missing.txt").unwrap());
}

#[test]
fn get_pathway_uses_kgml_endpoint() {
    let kgml = fs::read_to_string("tests/data/pathway.kgml").unwrap();
    let client = MockKegg::default().with_response("http://kegg.test/get/mmu04064/kgml", &kgml);
    let (_dir, resolver) = resolver(client);

    let pathway = resolver.get_pathway("mmu", "04064").unwrap();
    assert_eq!(pathway.name(), "path:mmu04064");
    assert!(resolver.storage().exist("mmu_path04064.kgml").unwrap());

    let cached = resolver.get_pathway("mmu", "04064").unwrap();
    assert_eq!(cached, pathway);
    assert_eq!(
        resolver.client().calls(),
        vec!["http://kegg.test/get/mmu04064/kgml"]
    );
}

#[test]
fn pathway_list_and_compounds() {
    let client = MockKegg::default()
        .with_response(
            "http://kegg.test/list/pathway/mmu",
            "path:mmu00010\tGlycolysis / Gluconeogenesis - Mus musculus (mouse)\npath:mmu04064\tNF-kappa B signaling pathway - Mus musculus (mouse)\n",
        )
        .with_response(
            "http://kegg.test/list/compound",
            "cpd:C00001\tH2O; Water\ncpd:C00002\tATP; Adenosine 5'-triphosphate\n",
        );
    let (_dir, resolver) = resolver(client);

    let pathways = resolver.get_pathway_list("mmu").unwrap();
    assert_eq!(pathways.len(), 2);
    assert_eq!(
        pathways["path:mmu04064"],
        "NF-kappa B signaling pathway - Mus musculus (mouse)"
    );
    assert!(resolver.storage().exist("pathway_list_mmu.tsv").unwrap());

    let compounds = resolver.get_compounds().unwrap();
    assert_eq!(compounds["cpd:C00001"], "H2O; Water");
    assert!(resolver.storage().exist("compound.tsv").unwrap());
}

#[test]
fn organism_list_uses_code_column() {
    let client = MockKegg::default().with_response(
        "http://kegg.test/list/organism",
        "T01001\thsa\tHomo sapiens (human)\tEukaryotes;Animals;Vertebrates;Mammals\nT01002\tmmu\tMus musculus (mouse)\tEukaryotes;Animals;Vertebrates;Mammals\n",
    );
    let (_dir, resolver) = resolver(client);

    let organisms = resolver.get_organism_list().unwrap();
    assert_eq!(organisms["mmu"], "Mus musculus (mouse)");
    assert!(resolver.check_organism("hsa").unwrap());
    assert!(!resolver.check_organism("xyz").unwrap());
    assert_eq!(resolver.client().calls().len(), 1);
}

#[test]
fn gene_names_keep_first_synonym() {
    let client = MockKegg::default().with_response(
        "http://kegg.test/list/mmu:11797+mmu:266632+mmu:22033",
        "mmu:11797\tBirc2, AW146227, Api1, Api2, Birc3\nmmu:266632\tIrak4, 8430405M07Rik, 9330209D03Rik\n",
    );

    let names = get_gene_names(
        &client,
        BASE_URL,
        &["mmu:11797", "mmu:266632", "mmu:22033"],
        MAX_GENES_PER_REQUEST,
    )
    .unwrap();
    assert_eq!(names["mmu:11797"], "Birc2");
    assert_eq!(names["mmu:266632"], "Irak4");
    assert!(!names.contains_key("mmu:22033"));
}

#[test]
fn gene_name_request_limits() {
    let client = MockKegg::default();
    let too_many = vec!["mmu:12345"; 51];
    assert_matches!(
        get_gene_names(&client, BASE_URL, &too_many, MAX_GENES_PER_REQUEST),
        Err(KeggError::TooManyGenes { requested: 51, max: 50 })
    );
    let empty: [&str; 0] = [];
    assert_matches!(
        get_gene_names(&client, BASE_URL, &empty, MAX_GENES_PER_REQUEST),
        Err(KeggError::EmptyGeneRequest)
    );
    assert!(client.calls().is_empty());
}
