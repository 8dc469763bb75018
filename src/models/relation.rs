use std::fmt;

use serde::Serialize;

use super::{KgmlElement, expect_tag};
use crate::domain::{RelationType, SubtypeName};
use crate::error::KeggError;
use crate::xml::{Element, get_attribute};

/// Qualifier of a relation, e.g. `activation` drawn as `-->`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtype {
    pub name: SubtypeName,
    pub value: String,
}

impl KgmlElement for Subtype {
    const TAG: &'static str = "subtype";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        expect_tag(element, Self::TAG)?;
        Ok(Self {
            name: get_attribute(element, "name")?.parse()?,
            value: get_attribute(element, "value")?.to_string(),
        })
    }

    fn to_xml_tree(&self) -> Element {
        Element::new(Self::TAG)
            .with_attribute("name", self.name.as_str())
            .with_attribute("value", self.value.as_str())
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Subtype name='{}' value='{}'>", self.name, self.value)
    }
}

/// Directed edge from `entry1` to `entry2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub entry1: String,
    pub entry2: String,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    pub subtypes: Vec<Subtype>,
}

impl Relation {
    pub fn new(
        entry1: impl Into<String>,
        entry2: impl Into<String>,
        relation_type: RelationType,
    ) -> Self {
        Self {
            entry1: entry1.into(),
            entry2: entry2.into(),
            relation_type,
            subtypes: Vec::new(),
        }
    }
}

impl KgmlElement for Relation {
    const TAG: &'static str = "relation";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        expect_tag(element, Self::TAG)?;
        let mut relation = Self::new(
            get_attribute(element, "entry1")?,
            get_attribute(element, "entry2")?,
            get_attribute(element, "type")?.parse()?,
        );
        for child in element.children() {
            if child.tag() == Subtype::TAG {
                relation.subtypes.push(Subtype::from_xml_tree(child)?);
            }
        }
        Ok(relation)
    }

    fn to_xml_tree(&self) -> Element {
        let mut element = Element::new(Self::TAG)
            .with_attribute("entry1", self.entry1.as_str())
            .with_attribute("entry2", self.entry2.as_str())
            .with_attribute("type", self.relation_type.as_str());
        for subtype in &self.subtypes {
            element.push_child(subtype.to_xml_tree());
        }
        element
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Relation {}->{} type='{}'>",
            self.entry1, self.entry2, self.relation_type
        )
    }
}
