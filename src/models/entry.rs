use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::{KgmlElement, expect_tag};
use crate::domain::{EntryType, GraphicsType, is_valid_hex_color};
use crate::error::KeggError;
use crate::xml::{
    Element, check_numeric, get_attribute, get_numeric_attribute, get_optional_attribute,
    get_optional_integer,
};

/// `#rrggbb` color as used by KGML graphics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = KeggError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !is_valid_hex_color(value) {
            return Err(KeggError::InvalidField {
                field: "hex color",
                value: value.to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }
}

/// Rendering hints of an entry. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graphics {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub coords: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub graphics_type: Option<GraphicsType>,
    pub fgcolor: Option<HexColor>,
    pub bgcolor: Option<HexColor>,
}

impl Graphics {
    /// First synonym of the comma separated label, as drawn on the diagram.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|name| name.split(", ").next())
    }
}

impl KgmlElement for Graphics {
    const TAG: &'static str = "graphics";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        expect_tag(element, Self::TAG)?;
        Ok(Self {
            x: get_optional_integer(element, "x")?,
            y: get_optional_integer(element, "y")?,
            width: get_optional_integer(element, "width")?,
            height: get_optional_integer(element, "height")?,
            coords: get_optional_attribute(element, "coords"),
            name: get_optional_attribute(element, "name"),
            graphics_type: element.attribute("type").map(str::parse).transpose()?,
            fgcolor: element.attribute("fgcolor").map(str::parse).transpose()?,
            bgcolor: element.attribute("bgcolor").map(str::parse).transpose()?,
        })
    }

    fn to_xml_tree(&self) -> Element {
        let mut element = Element::new(Self::TAG);
        element.set_optional_attribute("name", self.name.as_ref());
        element.set_optional_attribute("fgcolor", self.fgcolor.as_ref());
        element.set_optional_attribute("bgcolor", self.bgcolor.as_ref());
        element.set_optional_attribute("type", self.graphics_type);
        element.set_optional_attribute("x", self.x);
        element.set_optional_attribute("y", self.y);
        element.set_optional_attribute("coords", self.coords.as_ref());
        element.set_optional_attribute("width", self.width);
        element.set_optional_attribute("height", self.height);
        element
    }
}

impl fmt::Display for Graphics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Graphics name='{}' type='{}'>",
            self.name.as_deref().unwrap_or(""),
            self.graphics_type.map(GraphicsType::as_str).unwrap_or("")
        )
    }
}

/// Member of a group entry, referencing another entry id of the same pathway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    id: String,
}

impl Component {
    pub fn new(id: impl Into<String>) -> Result<Self, KeggError> {
        let id = id.into();
        if id.is_empty() {
            return Err(KeggError::InvalidField {
                field: "component id",
                value: id,
            });
        }
        Ok(Self { id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl KgmlElement for Component {
    const TAG: &'static str = "component";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        expect_tag(element, Self::TAG)?;
        Self::new(get_attribute(element, "id")?)
    }

    fn to_xml_tree(&self) -> Element {
        Element::new(Self::TAG).with_attribute("id", self.id.as_str())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Component id={}>", self.id)
    }
}

/// Node of the pathway diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    id: String,
    /// One or more whitespace separated database identifiers.
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub link: Option<String>,
    pub reaction: Option<String>,
    pub graphics: Option<Graphics>,
    pub components: Vec<Component>,
}

impl Entry {
    /// Fails when `id` is not made of decimal digits, the same rule the parser applies.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        entry_type: EntryType,
    ) -> Result<Self, KeggError> {
        let id = id.into();
        check_numeric("id", &id)?;
        Ok(Self {
            id,
            name: name.into(),
            entry_type,
            link: None,
            reaction: None,
            graphics: None,
            components: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifiers of all names with the `<org>:` prefix removed, in name order.
    pub fn get_gene_id(&self) -> Vec<String> {
        self.name
            .split_whitespace()
            .map(|token| match token.split_once(':') {
                Some((_, id)) => id.to_string(),
                None => token.to_string(),
            })
            .collect()
    }

    pub fn has_multiple_names(&self) -> bool {
        self.name.split_whitespace().nth(1).is_some()
    }
}

impl KgmlElement for Entry {
    const TAG: &'static str = "entry";

    fn from_xml_tree(element: &Element) -> Result<Self, KeggError> {
        expect_tag(element, Self::TAG)?;
        let mut entry = Self::new(
            get_numeric_attribute(element, "id")?,
            get_attribute(element, "name")?,
            get_attribute(element, "type")?.parse()?,
        )?;
        entry.link = get_optional_attribute(element, "link");
        entry.reaction = get_optional_attribute(element, "reaction");

        for child in element.children() {
            match child.tag() {
                Graphics::TAG => entry.graphics = Some(Graphics::from_xml_tree(child)?),
                Component::TAG => entry.components.push(Component::from_xml_tree(child)?),
                _ => {}
            }
        }
        Ok(entry)
    }

    fn to_xml_tree(&self) -> Element {
        let mut element = Element::new(Self::TAG)
            .with_attribute("id", self.id.as_str())
            .with_attribute("name", self.name.as_str())
            .with_attribute("type", self.entry_type.as_str());
        element.set_optional_attribute("link", self.link.as_ref());
        element.set_optional_attribute("reaction", self.reaction.as_ref());
        if let Some(graphics) = &self.graphics {
            element.push_child(graphics.to_xml_tree());
        }
        for component in &self.components {
            element.push_child(component.to_xml_tree());
        }
        element
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Entry id={} name='{}' type='{}'>",
            self.id, self.name, self.entry_type
        )
    }
}
