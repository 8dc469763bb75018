//! Static KEGG pathway tables.

/// Immune system pathways as (number, title).
pub const IMMUNE_SYSTEM_PATHWAYS: &[(&str, &str)] = &[
    ("04640", "Hematopoietic cell lineage"),
    ("04610", "Complement and coagulation cascades"),
    ("04611", "Platelet activation"),
    ("04620", "Toll-like receptor signaling pathway"),
    ("04621", "NOD-like receptor signaling pathway"),
    ("04622", "RIG-I-like receptor signaling pathway"),
    ("04623", "Cytosolic DNA-sensing pathway"),
    ("04625", "C-type lectin receptor signaling pathway"),
    ("04650", "Natural killer cell mediated cytotoxicity"),
    ("04612", "Antigen processing and presentation"),
    ("04660", "T cell receptor signaling pathway"),
    ("04658", "Th1 and Th2 cell differentiation"),
    ("04659", "Th17 cell differentiation"),
    ("04657", "IL-17 signaling pathway"),
    ("04662", "B cell receptor signaling pathway"),
    ("04664", "Fc epsilon RI signaling pathway"),
    ("04666", "Fc gamma R-mediated phagocytosis"),
    ("04670", "Leukocyte transendothelial migration"),
    ("04672", "Intestinal immune network for IgA production"),
    ("04062", "Chemokine signaling pathway"),
];

pub fn immune_system_pathway_ids() -> Vec<&'static str> {
    IMMUNE_SYSTEM_PATHWAYS.iter().map(|(number, _)| *number).collect()
}

pub fn immune_system_pathway_title(number: &str) -> Option<&'static str> {
    IMMUNE_SYSTEM_PATHWAYS
        .iter()
        .find(|(candidate, _)| *candidate == number)
        .map(|(_, title)| *title)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::is_valid_pathway_number;

    #[test]
    fn numbers_are_unique_and_valid() {
        let ids = immune_system_pathway_ids();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.iter().all(|id| is_valid_pathway_number(id)));
    }

    #[test]
    fn title_lookup() {
        assert_eq!(
            immune_system_pathway_title("04620"),
            Some("Toll-like receptor signaling pathway")
        );
        assert_eq!(immune_system_pathway_title("00010"), None);
    }
}
