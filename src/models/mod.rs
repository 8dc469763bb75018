//! KGML object model. Every record parses from and serializes to one XML
//! element through [`KgmlElement`].

mod entry;
mod pathway;
mod reaction;
mod relation;

pub use entry::{Component, Entry, Graphics, HexColor};
pub use pathway::{KGML_DOCTYPE, Pathway, PathwaySummary};
pub use reaction::{Alt, Product, Reaction, Substrate};
pub use relation::{Relation, Subtype};

use crate::error::KeggError;
use crate::xml::{Element, XmlSource, parse_xml};

pub trait KgmlElement: Sized {
    /// Tag name of the element this record maps to.
    const TAG: &'static str;

    /// Builds the record from one element. Unknown child elements are ignored.
    fn from_xml_tree(element: &Element) -> Result<Self, KeggError>;

    fn to_xml_tree(&self) -> Element;

    fn from_xml(source: impl XmlSource) -> Result<Self, KeggError> {
        let element = parse_xml(source)?;
        Self::from_xml_tree(&element)
    }

    fn to_xml(&self) -> Result<String, KeggError> {
        self.to_xml_tree().to_xml_string()
    }
}

fn expect_tag(element: &Element, expected: &'static str) -> Result<(), KeggError> {
    if element.tag() != expected {
        return Err(KeggError::UnexpectedElement {
            expected,
            found: element.tag().to_string(),
        });
    }
    Ok(())
}
