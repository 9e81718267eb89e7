//! Element tree for map, object and animation documents.
//!
//! The loaders only need two capabilities from a markup document: ordered
//! iteration over child elements and attribute lookup by name. [`Element`]
//! provides exactly that, built from `quick-xml` reader events so the whole
//! document is available for the hand-walked traversal the loaders perform.

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event, attributes::AttrError};
use quick_xml::reader::Reader;
use thiserror::Error;

use crate::vfs::Vfs;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed markup: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Unbalanced element tags")]
    UnbalancedTags,
}

/// A single element with its attributes and child elements, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Create an empty element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute insertion, mainly useful in tests.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder-style child insertion.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// The element's tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw attribute value by name, `None` if the attribute is absent.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// All child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    /// Child elements with the given tag, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Parse markup text into its root [`Element`].
pub fn parse_document(text: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    // Open elements; the last entry is the one currently receiving children.
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(DocumentError::UnbalancedTags)?;
                attach(&mut stack, &mut root, element);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DocumentError::UnbalancedTags);
    }

    root.ok_or(DocumentError::MissingRoot)
}

/// Read and parse a document through the virtual file system.
pub fn load_document(vfs: &dyn Vfs, path: &Path) -> Result<Element, DocumentError> {
    let text = vfs.read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text)
}

/// Parse only the root element's tag and attributes.
///
/// Reading stops at the root's start tag; the rest of the document is never
/// parsed, so the returned element has no children.
pub fn parse_root(text: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event()? {
            Event::Start(start) | Event::Empty(start) => return element_from_start(&start),
            Event::Eof => return Err(DocumentError::MissingRoot),
            _ => {}
        }
    }
}

/// Read a document through the virtual file system and parse its root element only.
pub fn read_root(vfs: &dyn Vfs, path: &Path) -> Result<Element, DocumentError> {
    let text = vfs.read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_root(&text)
}

fn element_from_start(start: &BytesStart) -> Result<Element, DocumentError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        // Only the first top-level element is the root; trailing ones are ignored.
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_children_in_order() {
        let root = parse_document(
            r#"<?xml version="1.0"?>
            <map id="town">
                <layer id="ground"><instances><i o="a"/><i o="b"></i></instances></layer>
                <camera id="main"/>
                <layer id="top"/>
            </map>"#,
        )
        .unwrap();

        assert_eq!(root.name(), "map");
        assert_eq!(root.attribute("id"), Some("town"));
        let layers: Vec<_> = root
            .children_named("layer")
            .map(|l| l.attribute("id").unwrap())
            .collect();
        assert_eq!(layers, vec!["ground", "top"]);

        let instances: Vec<_> = root
            .children_named("layer")
            .next()
            .unwrap()
            .children_named("instances")
            .flat_map(|i| i.children_named("i"))
            .map(|i| i.attribute("o").unwrap())
            .collect();
        assert_eq!(instances, vec!["a", "b"]);
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let root = parse_document(r#"<object id="a&amp;b" namespace="x"/>"#).unwrap();
        assert_eq!(root.attribute("id"), Some("a&b"));
        assert_eq!(root.attribute("missing"), None);
    }

    #[test]
    fn test_empty_document_has_no_root() {
        assert!(matches!(
            parse_document("<?xml version=\"1.0\"?>"),
            Err(DocumentError::MissingRoot)
        ));
    }

    #[test]
    fn test_root_is_read_without_body() {
        let text = r#"<?xml version="1.0"?><map id="town" loader="mygame"><layer><broken></map>"#;
        assert!(parse_document(text).is_err());

        let root = parse_root(text).unwrap();
        assert_eq!(root.name(), "map");
        assert_eq!(root.attribute("loader"), Some("mygame"));
        assert_eq!(root.children().count(), 0);
        assert!(matches!(parse_root("<!-- nothing -->"), Err(DocumentError::MissingRoot)));
    }

    #[test]
    fn test_mismatched_tags_are_rejected() {
        assert!(parse_document("<map><layer></map>").is_err());
        assert!(parse_document("<map><layer>").is_err());
    }
}
