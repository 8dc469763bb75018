use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::{Entry, KgmlElement, Reaction, Relation, expect_tag};
use crate::domain::{
    EntryType, is_valid_pathway_name, is_valid_pathway_number, is_valid_pathway_org,
};
use crate::error::KeggError;
use crate::xml::{
    Element, XmlSource, get_attribute, get_numeric_attribute, get_optional_attribute, parse_xml,
    to_document_string,
};

pub const KGML_DOCTYPE: &str = r#"pathway SYSTEM "https://www.kegg.jp/kegg/xml/KGML_v0.7.2_.dtd""#;

/// Root of a KGML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pathway {
    name: String,
    org: String,
    number: String,
    title: Option<String>,
    image: Option<String>,
    link: Option<String>,
    entries: Vec<Entry>,
    relations: Vec<Relation>,
    reactions: Vec<Reaction>,
}

/// Counts and gene list of a pathway, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct PathwaySummary {
    pub name: String,
    pub title: Option<String>,
    pub entries: usize,
    pub relations: usize,
    pub reactions: usize,
    pub genes: Vec<String>,
}

impl Pathway {
    /// Validates org and number formats and that `name` is exactly `path:<org><number>`.
    pub fn new(
        name: impl Into<String>,
        org: impl Into<String>,
        number: impl Into<String>,
    ) -> Result<Self, KeggError> {
        let name = name.into();
        let org = org.into();
        let number = number.into();

        if !is_valid_pathway_org(&org) {
            return Err(KeggError::InvalidField {
                field: "pathway organism",
                value: org,
            });
        }
        if !is_valid_pathway_number(&number) {
            return Err(KeggError::InvalidField {
                field: "pathway number",
                value: number,
            });
        }
        if !is_valid_pathway_name(&name) {
            return Err(KeggError::InvalidField {
                field: "pathway name",
                value: name,
            });
        }
        if name != format!("path:{org}{number}") {
            return Err(KeggError::PathwayNameMismatch { name, org, number });
        }

        Ok(Self {
            name,
            org,
            number,
            title: None,
            image: None,
            link: None,
            entries: Vec::new(),
            relations: Vec::new(),
            reactions: Vec::new(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn push_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn push_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    pub fn push_reaction(&mut self, reaction: Reaction) {
        self.reactions.push(reaction);
    }

    /// First entry whose id equals `entry_id`.
    pub fn get_entry_by_id(&self, entry_id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id() == entry_id)
    }

    /// Unique gene identifiers of all gene entries, in first-seen order.
    pub fn get_genes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut genes = Vec::new();
        for entry in &self.entries {
            if entry.entry_type != EntryType::Gene {
                continue;
            }
            for gene in entry.get_gene_id() {
                if seen.insert(gene.clone()) {
                    genes.push(gene);
                }
            }
        }
        tracing::debug!(pathway = %self.name, genes = genes.len(), "collected unique genes");
        genes
    }

    pub fn summary(&self) -> PathwaySummary {
        PathwaySummary {
            name: self.name.clone(),
            title: self.title.clone(),
            entries: self.entries.len(),
            relations: self.relations.len(),
            reactions: self.reactions.len(),
            genes: self.get_genes(),
        }
    }

    /// Parses a whole KGML document (or an already parsed `<pathway>` element).
    pub fn parse(source: impl XmlSource) -> Result<Self, KeggError> {
        let root = parse_xml(source)?;
        let pathway = Self::from_xml_tree(&root)?;
        tracing::debug!(
            pathway = %pathway.name,
            entries = pathway.entries.len(),
            relations = pathway.relations.len(),
            reactions = pathway.reactions.len(),
            "parsed KGML pathway"
        );
        Ok(pathway)
    }

    /// Standalone KGML document with declaration, doctype and a creation-date comment.
    pub fn to_xml_string(&self) -> Result<String, KeggError> {
        let comment = format!(" Creation date: {} ", chrono::Utc::now().to_rfc3339());
        to_document_string(&self.to_xml_tree(), KGML_DOCTYPE, Some(&comment))
    }
}

impl KgmlElement for Pathway {
    const TAG: &'static str = "pathway";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        expect_tag(element, Self::TAG)?;
        let mut pathway = Self::new(
            get_attribute(element, "name")?,
            get_attribute(element, "org")?,
            get_numeric_attribute(element, "number")?,
        )?;
        pathway.title = get_optional_attribute(element, "title");
        pathway.image = get_optional_attribute(element, "image");
        pathway.link = get_optional_attribute(element, "link");

        for child in element.children() {
            match child.tag() {
                Entry::TAG => pathway.entries.push(Entry::from_xml_tree(child)?),
                Relation::TAG => pathway.relations.push(Relation::from_xml_tree(child)?),
                Reaction::TAG => pathway.reactions.push(Reaction::from_xml_tree(child)?),
                _ => {}
            }
        }
        Ok(pathway)
    }

    fn to_xml_tree(&self) -> Element {
        let mut element = Element::new(Self::TAG)
            .with_attribute("name", self.name.as_str())
            .with_attribute("org", self.org.as_str())
            .with_attribute("number", self.number.as_str());
        element.set_optional_attribute("title", self.title.as_ref());
        element.set_optional_attribute("image", self.image.as_ref());
        element.set_optional_attribute("link", self.link.as_ref());
        for entry in &self.entries {
            element.push_child(entry.to_xml_tree());
        }
        for relation in &self.relations {
            element.push_child(relation.to_xml_tree());
        }
        for reaction in &self.reactions {
            element.push_child(reaction.to_xml_tree());
        }
        element
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Pathway {} title='{}'>",
            self.name,
            self.title.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pathway_optional_attributes() {
        let pathway = Pathway::from_xml(
            r#"<pathway name="path:mmu05205" org="mmu" number="05205" title="Proteoglycans in cancer"></pathway>"#,
        )
        .unwrap();
        assert_eq!(pathway.org(), "mmu");
        assert_eq!(pathway.name(), "path:mmu05205");
        assert_eq!(pathway.title(), Some("Proteoglycans in cancer"));
        assert!(pathway.link().is_none());
        assert!(pathway.image().is_none());
    }

    #[test]
    fn pathway_missing_required_attributes() {
        for xml in [
            r#"<pathway org="mmu" number="05205"></pathway>"#,
            r#"<pathway name="path:mmu05205" number="05205"></pathway>"#,
            r#"<pathway name="path:mmu05205" org="mmu"></pathway>"#,
        ] {
            assert_matches!(
                Pathway::from_xml(xml),
                Err(KeggError::MissingAttribute { .. })
            );
        }
    }

    #[test]
    fn pathway_name_must_match_org_and_number() {
        assert_matches!(
            Pathway::from_xml(r#"<pathway name="path:mmu05205" org="mmu" number="12345"/>"#),
            Err(KeggError::PathwayNameMismatch { .. })
        );
        assert_matches!(
            Pathway::new("invalid:mmu12345", "mmu", "12345"),
            Err(KeggError::InvalidField { field: "pathway name", .. })
        );
        assert_matches!(
            Pathway::new("path:mmu12345", "mmuu", "12345"),
            Err(KeggError::InvalidField { field: "pathway organism", .. })
        );
        assert_matches!(
            Pathway::new("path:mmu12345", "mmu", "123456"),
            Err(KeggError::InvalidField { field: "pathway number", .. })
        );
    }

    #[test]
    fn genes_are_deduplicated_in_first_seen_order() {
        let mut pathway = Pathway::new("path:hsa04010", "hsa", "04010").unwrap();
        pathway.push_entry(Entry::new("1", "hsa:10 hsa:20", EntryType::Gene).unwrap());
        pathway.push_entry(Entry::new("2", "cpd:C00001", EntryType::Compound).unwrap());
        pathway.push_entry(Entry::new("3", "hsa:20 hsa:30", EntryType::Gene).unwrap());
        assert_eq!(pathway.get_genes(), vec!["10", "20", "30"]);
    }

    #[test]
    fn entry_lookup_by_id() {
        let mut pathway = Pathway::new("path:ko00010", "ko", "00010").unwrap();
        pathway.push_entry(Entry::new("18", "ko:K00844", EntryType::Ortholog).unwrap());
        assert_eq!(
            pathway.get_entry_by_id("18").map(|entry| entry.name.as_str()),
            Some("ko:K00844")
        );
        assert!(pathway.get_entry_by_id("invalid").is_none());
    }

    #[test]
    fn document_string_reparses() {
        let mut pathway = Pathway::new("path:ec00020", "ec", "00020")
            .unwrap()
            .with_title("Citrate cycle (TCA cycle)")
            .with_image("https://www.kegg.jp/kegg/pathway/ec/ec00020.png");
        pathway.push_entry(Entry::new("1", "ec:1.1.1.37", EntryType::Enzyme).unwrap());
        let document = pathway.to_xml_string().unwrap();
        assert!(document.starts_with("<?xml"));
        assert!(document.contains("<!DOCTYPE pathway"));
        assert!(document.contains("Creation date"));

        let parsed = Pathway::parse(document.as_str()).unwrap();
        assert_eq!(parsed, pathway);
    }
}
