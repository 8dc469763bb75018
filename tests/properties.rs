use std::collections::HashSet;

use assert_matches::assert_matches;
use proptest::prelude::*;

use kegg_tools::analysis::Enrichment;
use kegg_tools::domain::{EntryType, RelationType, SubtypeName};
use kegg_tools::error::KeggError;
use kegg_tools::models::{Entry, Pathway, Relation, Subtype};

fn organism_code() -> impl Strategy<Value = String> {
    proptest::string::string_regex("(ko|ec|[a-z]{3})").unwrap()
}

fn pathway_number() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9]{5}").unwrap()
}

fn gene_names() -> impl Strategy<Value = Vec<Vec<u32>>> {
    proptest::collection::vec(proptest::collection::vec(10000u32..10040, 1..4), 0..12)
}

/// Sizes of 2 to 4 pathways with consecutive gene ids, plus a duplicate free
/// study list drawn from their union. Every contingency cell stays non-negative.
fn disjoint_study() -> impl Strategy<Value = (Vec<u32>, Vec<String>)> {
    proptest::collection::vec(1u32..10, 2..5).prop_flat_map(|sizes| {
        let total: u32 = sizes.iter().sum();
        let genes: Vec<String> = (1..=total).map(|gene| gene.to_string()).collect();
        let len = genes.len();
        (Just(sizes), proptest::sample::subsequence(genes, 0..=len).prop_shuffle())
    })
}

fn pathway_with_genes(org: &str, number: &str, genes: &[Vec<u32>]) -> Pathway {
    let mut pathway = Pathway::new(format!("path:{org}{number}"), org, number).unwrap();
    for (index, names) in genes.iter().enumerate() {
        let name = names
            .iter()
            .map(|gene| format!("{org}:{gene}"))
            .collect::<Vec<_>>()
            .join(" ");
        pathway.push_entry(Entry::new((index + 1).to_string(), name, EntryType::Gene).unwrap());
    }
    pathway
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn pathway_name_must_be_composed_of_org_and_number(org in organism_code(), other in organism_code(), number in pathway_number()) {
        let name = format!("path:{org}{number}");
        prop_assert!(Pathway::new(name, org.as_str(), number.as_str()).is_ok());
        if org != other {
            assert_matches!(
                Pathway::new(format!("path:{other}{number}"), org.as_str(), number.as_str()),
                Err(KeggError::PathwayNameMismatch { .. })
            );
        }
    }

    #[test]
    fn document_round_trip(org in organism_code(), number in pathway_number(), genes in gene_names(), title in "[A-Za-z ,<>&\"']{0,30}") {
        let mut pathway = pathway_with_genes(&org, &number, &genes).with_title(title);
        if genes.len() >= 2 {
            let mut relation = Relation::new("1", "2", RelationType::PpRel);
            relation.subtypes.push(Subtype { name: SubtypeName::Inhibition, value: "--|".to_string() });
            pathway.push_relation(relation);
        }
        let document = pathway.to_xml_string().unwrap();
        let reparsed = Pathway::parse(document.as_str()).unwrap();
        prop_assert_eq!(reparsed, pathway);
    }

    #[test]
    fn genes_are_unique_and_first_seen(genes in gene_names()) {
        let pathway = pathway_with_genes("mmu", "04064", &genes);
        let listed = pathway.get_genes();

        let mut expected = Vec::new();
        let mut seen = HashSet::new();
        for gene in genes.iter().flatten() {
            if seen.insert(*gene) {
                expected.push(gene.to_string());
            }
        }
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn pvalues_of_disjoint_pathways_stay_in_unit_interval(
        (sizes, study) in disjoint_study()
    ) {
        let mut pathways = Vec::new();
        let mut first = 1;
        for (index, size) in sizes.iter().enumerate() {
            let number = format!("0400{index}");
            let mut pathway = Pathway::new(format!("path:mmu{number}"), "mmu", number).unwrap();
            for gene in first..first + size {
                let entry = Entry::new(gene.to_string(), format!("mmu:{gene}"), EntryType::Gene);
                pathway.push_entry(entry.unwrap());
            }
            first += size;
            pathways.push(pathway);
        }

        let mut enrichment = Enrichment::new(pathways);
        let results = enrichment.run_analysis(&study).unwrap();
        prop_assert_eq!(results.len(), sizes.len());
        let found: usize = results.iter().map(|result| result.study_count()).sum();
        prop_assert_eq!(found, study.len());
        for result in results {
            match result.pvalue {
                Some(pvalue) => prop_assert!(pvalue > 0.0 && pvalue <= 1.0, "{}", pvalue),
                None => prop_assert_eq!(result.study_count(), 0),
            }
        }
    }
}
