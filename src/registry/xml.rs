//! Minimal XML element tree.
//!
//! Registry code text is spread across mixed content (`typedef void <name>X</name>;`),
//! so every element keeps the text before its first child (`text`) and the text
//! following its own end tag (`tail`). Inner text is rebuilt from those pieces.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::GenError;

/// One element of a parsed document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub tag: String,
    attrs: Vec<(String, String)>,
    /// Text before the first child element.
    pub text: String,
    /// Text after this element's end tag, up to the next sibling.
    pub tail: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Look up an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Direct children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// All descendants (not including `self`) with the given tag, in document order.
    pub fn descendants_named<'a>(&'a self, tag: &str) -> Vec<&'a XmlElement> {
        let mut out = Vec::new();
        self.collect_descendants(tag, &mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, tag: &str, out: &mut Vec<&'a XmlElement>) {
        for child in &self.children {
            if child.tag == tag {
                out.push(child);
            }
            child.collect_descendants(tag, out);
        }
    }

    /// Every `child_tag` element whose parent is a `parent_tag` element,
    /// anywhere below `self` (`.//parent_tag/child_tag`).
    pub fn find_all<'a>(&'a self, parent_tag: &str, child_tag: &'a str) -> Vec<&'a XmlElement> {
        self.descendants_named(parent_tag)
            .into_iter()
            .flat_map(|p| p.children_named(child_tag))
            .collect()
    }

    /// Concatenated text content, recursing only into children accepted by
    /// `keep`. A rejected child's tail is dropped along with it.
    pub fn inner_text(&self, keep: &dyn Fn(&XmlElement) -> bool) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            if keep(child) {
                out.push_str(&child.inner_text(keep));
                out.push_str(&child.tail);
            }
        }
        out
    }
}

/// Parse a document and return its root element.
pub fn parse_document(input: &str) -> Result<XmlElement, GenError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(start_element(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| GenError::xml("Unbalanced end tag"))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| GenError::xml(format!("Text error: {e}")))?;
                push_text(&mut stack, &text);
            }
            Ok(Event::CData(e)) => {
                let bytes = e.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| GenError::xml(format!("Invalid CDATA: {e}")))?;
                push_text(&mut stack, text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(GenError::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(GenError::xml(format!(
            "Unclosed element <{}>",
            stack.last().map(|e| e.tag.as_str()).unwrap_or_default()
        )));
    }
    root.ok_or_else(|| GenError::xml("Document has no root element"))
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement, GenError> {
    let name = e.name();
    let tag = std::str::from_utf8(name.as_ref())
        .map_err(|e| GenError::xml(format!("Invalid tag name: {e}")))?
        .to_string();

    let mut attrs = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| GenError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| GenError::xml(format!("Attribute key error: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| GenError::xml(format!("Attribute value error: {e}")))?
            .to_string();
        attrs.push((key, value));
    }

    Ok(XmlElement {
        tag,
        attrs,
        ..Default::default()
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Text goes to the open element's `text` until it has children, after
/// which it belongs to the tail of the most recent child.
fn push_text(stack: &mut [XmlElement], text: &str) {
    let Some(open) = stack.last_mut() else {
        return;
    };
    match open.children.last_mut() {
        Some(last) => last.tail.push_str(text),
        None => open.text.push_str(text),
    }
}
