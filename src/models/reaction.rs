use std::fmt;

use serde::Serialize;

use super::{KgmlElement, expect_tag};
use crate::domain::ReactionType;
use crate::error::KeggError;
use crate::xml::{Element, check_numeric, get_attribute, get_numeric_attribute};

/// Alternative name of a substrate or product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alt {
    pub name: String,
}

impl KgmlElement for Alt {
    const TAG: &'static str = "alt";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        expect_tag(element, Self::TAG)?;
        Ok(Self {
            name: get_attribute(element, "name")?.to_string(),
        })
    }

    fn to_xml_tree(&self) -> Element {
        Element::new(Self::TAG).with_attribute("name", self.name.as_str())
    }
}

impl fmt::Display for Alt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Alt name='{}'>", self.name)
    }
}

/// Substrate of a reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substrate {
    id: String,
    pub name: String,
    pub alt: Option<Alt>,
}

/// Product of a reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: String,
    pub name: String,
    pub alt: Option<Alt>,
}

impl Substrate {
    /// Fails when `id` is not made of decimal digits.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, KeggError> {
        let id = id.into();
        check_numeric("id", &id)?;
        Ok(Self {
            id,
            name: name.into(),
            alt: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Product {
    /// Fails when `id` is not made of decimal digits.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, KeggError> {
        let id = id.into();
        check_numeric("id", &id)?;
        Ok(Self {
            id,
            name: name.into(),
            alt: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

fn parse_participant(
    element: &Element,
    tag: &'static str,
) -> Result<(String, String, Option<Alt>), KeggError> {
    expect_tag(element, tag)?;
    let id = get_numeric_attribute(element, "id")?.to_string();
    let name = get_attribute(element, "name")?.to_string();
    let mut alt = None;
    for child in element.children() {
        if child.tag() == Alt::TAG {
            alt = Some(Alt::from_xml_tree(child)?);
        }
    }
    Ok((id, name, alt))
}

fn participant_element(tag: &'static str, id: &str, name: &str, alt: Option<&Alt>) -> Element {
    let mut element = Element::new(tag)
        .with_attribute("id", id)
        .with_attribute("name", name);
    if let Some(alt) = alt {
        element.push_child(alt.to_xml_tree());
    }
    element
}

impl KgmlElement for Substrate {
    const TAG: &'static str = "substrate";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        let (id, name, alt) = parse_participant(element, Self::TAG)?;
        Ok(Self { id, name, alt })
    }

    fn to_xml_tree(&self) -> Element {
        participant_element(Self::TAG, &self.id, &self.name, self.alt.as_ref())
    }
}

impl KgmlElement for Product {
    const TAG: &'static str = "product";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        let (id, name, alt) = parse_participant(element, Self::TAG)?;
        Ok(Self { id, name, alt })
    }

    fn to_xml_tree(&self) -> Element {
        participant_element(Self::TAG, &self.id, &self.name, self.alt.as_ref())
    }
}

impl fmt::Display for Substrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Substrate id={} name='{}'>", self.id, self.name)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Product id={} name='{}'>", self.id, self.name)
    }
}

/// Biochemical reaction with its substrates and products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reaction {
    id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
    pub substrates: Vec<Substrate>,
    pub products: Vec<Product>,
}

impl Reaction {
    /// Fails when `id` is not made of decimal digits, the same rule the parser applies.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        reaction_type: ReactionType,
    ) -> Result<Self, KeggError> {
        let id = id.into();
        check_numeric("id", &id)?;
        Ok(Self {
            id,
            name: name.into(),
            reaction_type,
            substrates: Vec::new(),
            products: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl KgmlElement for Reaction {
    const TAG: &'static str = "reaction";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        expect_tag(element, Self::TAG)?;
        let mut reaction = Self::new(
            get_numeric_attribute(element, "id")?,
            get_attribute(element, "name")?,
            get_attribute(element, "type")?.parse()?,
        )?;
        for child in element.children() {
            match child.tag() {
                Substrate::TAG => reaction.substrates.push(Substrate::from_xml_tree(child)?),
                Product::TAG => reaction.products.push(Product::from_xml_tree(child)?),
                _ => {}
            }
        }
        Ok(reaction)
    }

    fn to_xml_tree(&self) -> Element {
        let mut element = Element::new(Self::TAG)
            .with_attribute("id", self.id.as_str())
            .with_attribute("name", self.name.as_str())
            .with_attribute("type", self.reaction_type.as_str());
        for substrate in &self.substrates {
            element.push_child(substrate.to_xml_tree());
        }
        for product in &self.products {
            element.push_child(product.to_xml_tree());
        }
        element
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Reaction id={} name='{}' type='{}'>",
            self.id, self.name, self.reaction_type
        )
    }
}
