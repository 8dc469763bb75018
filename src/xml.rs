//! Minimal owned XML element tree on top of `quick-xml`, plus the attribute
//! accessors used by the KGML models.

use std::io::Write;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::KeggError;

/// One XML element with its attributes (in document order) and child elements.
/// Text content is not retained; KGML carries all data in attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Sets an attribute, replacing an existing value with the same key.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(name, _)| name == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn set_optional_attribute<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set_attribute(key, value.to_string());
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Serializes this element (and its subtree) without an XML declaration.
    pub fn to_xml_string(&self) -> Result<String, KeggError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        write_element(&mut writer, self)?;
        into_utf8(writer.into_inner())
    }
}

/// Input accepted by [`parse_xml`]: raw XML text or an already parsed element.
pub trait XmlSource {
    fn into_element(self) -> Result<Element, KeggError>;
}

impl XmlSource for &str {
    fn into_element(self) -> Result<Element, KeggError> {
        read_document(self)
    }
}

impl XmlSource for &String {
    fn into_element(self) -> Result<Element, KeggError> {
        read_document(self)
    }
}

impl XmlSource for String {
    fn into_element(self) -> Result<Element, KeggError> {
        read_document(&self)
    }
}

impl XmlSource for Element {
    fn into_element(self) -> Result<Element, KeggError> {
        Ok(self)
    }
}

impl XmlSource for &Element {
    fn into_element(self) -> Result<Element, KeggError> {
        Ok(self.clone())
    }
}

/// Returns the root element of `source`, parsing it first when it is text.
pub fn parse_xml(source: impl XmlSource) -> Result<Element, KeggError> {
    source.into_element()
}

/// Required attribute. An empty value is returned as-is; only absence fails.
pub fn get_attribute<'a>(element: &'a Element, key: &str) -> Result<&'a str, KeggError> {
    element
        .attribute(key)
        .ok_or_else(|| KeggError::MissingAttribute {
            element: element.tag().to_string(),
            key: key.to_string(),
        })
}

/// Required attribute made only of ASCII decimal digits (no sign, no decimal point).
pub fn get_numeric_attribute<'a>(element: &'a Element, key: &str) -> Result<&'a str, KeggError> {
    let value = get_attribute(element, key)?;
    check_numeric(key, value)?;
    Ok(value)
}

/// Same digit rule as [`get_numeric_attribute`] for values that do not come
/// from an element.
pub fn check_numeric(key: &str, value: &str) -> Result<(), KeggError> {
    if !is_numeric(value) {
        return Err(non_numeric(key, value));
    }
    Ok(())
}

pub fn get_optional_attribute(element: &Element, key: &str) -> Option<String> {
    element.attribute(key).map(str::to_string)
}

/// Optional attribute that must be an integer when present. A leading `-` is accepted.
pub fn get_optional_integer(element: &Element, key: &str) -> Result<Option<i32>, KeggError> {
    match element.attribute(key) {
        None => Ok(None),
        Some(value) => parse_integer(key, value).map(Some),
    }
}

fn parse_integer(key: &str, value: &str) -> Result<i32, KeggError> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if !is_numeric(digits) {
        return Err(non_numeric(key, value));
    }
    value.parse::<i32>().map_err(|_| non_numeric(key, value))
}

fn non_numeric(key: &str, value: &str) -> KeggError {
    KeggError::NonNumericAttribute {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}

/// Serializes `root` as a standalone document: declaration, doctype, an
/// optional comment, then the element tree.
pub fn to_document_string(
    root: &Element,
    doctype: &str,
    comment: Option<&str>,
) -> Result<String, KeggError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::DocType(BytesText::from_escaped(doctype)))
        .map_err(xml_error)?;
    if let Some(comment) = comment {
        writer
            .write_event(Event::Comment(BytesText::from_escaped(comment)))
            .map_err(xml_error)?;
    }
    write_element(&mut writer, root)?;
    into_utf8(writer.into_inner())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), KeggError> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }
    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(xml_error)
}

fn read_document(xml: &str) -> Result<Element, KeggError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| KeggError::Xml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(KeggError::Xml(format!("unclosed element <{}>", open.tag)));
    }
    root.ok_or_else(|| KeggError::Xml("document has no root element".to_string()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), KeggError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(KeggError::Xml("multiple root elements".to_string()));
    }
    *root = Some(element);
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, KeggError> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(xml_error)?
        .to_string();
    let mut element = Element::new(tag);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let key = std::str::from_utf8(attribute.key.as_ref()).map_err(xml_error)?;
        let value = attribute.unescape_value().map_err(xml_error)?;
        element.attributes.push((key.to_string(), value.into_owned()));
    }
    Ok(element)
}

fn into_utf8(bytes: Vec<u8>) -> Result<String, KeggError> {
    String::from_utf8(bytes).map_err(xml_error)
}

fn xml_error<E: std::fmt::Display>(err: E) -> KeggError {
    KeggError::Xml(err.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_xml_accepts_text_and_elements() {
        let element = parse_xml("<hello>world</hello>").unwrap();
        assert_eq!(element.tag(), "hello");

        let again = parse_xml(&element).unwrap();
        assert_eq!(again, element);
    }

    #[test]
    fn nested_children_keep_document_order() {
        let element = parse_xml(r#"<a><b n="1"/><c><d/></c><b n="2"></b></a>"#).unwrap();
        let tags: Vec<_> = element.children().iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["b", "c", "b"]);
        assert_eq!(element.children()[2].attribute("n"), Some("2"));
        assert_eq!(element.children()[1].children()[0].tag(), "d");
    }

    #[test]
    fn attribute_entities_are_unescaped() {
        let element = parse_xml(r#"<subtype name="activation" value="--&gt;"/>"#).unwrap();
        assert_eq!(element.attribute("value"), Some("-->"));
    }

    #[test]
    fn missing_and_empty_attributes_differ() {
        let element = parse_xml(r#"<component id=""/>"#).unwrap();
        assert_eq!(get_attribute(&element, "id").unwrap(), "");
        assert_matches!(
            get_attribute(&element, "name"),
            Err(KeggError::MissingAttribute { .. })
        );
    }

    #[test]
    fn numeric_attribute_rejects_signs_and_decimals() {
        let element = parse_xml(r#"<entry a="154" b="-1" c="1.5" d=""/>"#).unwrap();
        assert_eq!(get_numeric_attribute(&element, "a").unwrap(), "154");
        for key in ["b", "c", "d"] {
            assert_matches!(
                get_numeric_attribute(&element, key),
                Err(KeggError::NonNumericAttribute { .. })
            );
        }
    }

    #[test]
    fn optional_integers_allow_negative_values() {
        let element = parse_xml(r#"<graphics x="-12" y="40" width="+3" height="1.5"/>"#).unwrap();
        assert_eq!(get_optional_integer(&element, "x").unwrap(), Some(-12));
        assert_eq!(get_optional_integer(&element, "y").unwrap(), Some(40));
        assert_eq!(get_optional_integer(&element, "coords").unwrap(), None);
        for key in ["width", "height"] {
            assert_matches!(
                get_optional_integer(&element, key),
                Err(KeggError::NonNumericAttribute { .. })
            );
        }
        assert_matches!(check_numeric("id", "n1"), Err(KeggError::NonNumericAttribute { .. }));
        assert!(check_numeric("id", "154").is_ok());
    }

    #[test]
    fn malformed_documents_fail() {
        assert_matches!(parse_xml("<a><b></a>"), Err(KeggError::Xml(_)));
        assert_matches!(parse_xml("<a>"), Err(KeggError::Xml(_)));
        assert_matches!(parse_xml(""), Err(KeggError::Xml(_)));
    }

    #[test]
    fn serialized_element_parses_back() {
        let mut root = Element::new("relation")
            .with_attribute("entry1", "44")
            .with_attribute("entry2", "50");
        root.push_child(Element::new("subtype").with_attribute("value", "--|"));
        let text = root.to_xml_string().unwrap();
        assert_eq!(parse_xml(text.as_str()).unwrap(), root);
    }
}
