//! Parsed XML documents
//!
//! A [`Document`] owns its node arena (an [`xot::Xot`]) together with the root
//! node of one parsed tree. It lives for exactly one pipeline run: operations
//! take it by value and hand it back, so no node ever outlives the run.
//!
//! Serialization is deterministic. The source XML declaration (and any byte
//! order mark) is dropped on parse; [`Document::to_bytes`] writes a fresh
//! declaration naming the output encoding.

use xot::output::xml::Parameters;
use xot::{Node, Xot};

use crate::encoding::Encoding;
use crate::error::{Error, Result};

/// An in-memory XML tree.
pub struct Document {
    xot: Xot,
    root: Node,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("text_nodes", &self.text_nodes().len())
            .finish()
    }
}

impl Document {
    /// Parse XML text.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut xot = Xot::new();
        let root = xot
            .parse(strip_prolog(xml))
            .map_err(|e| Error::XmlParse {
                message: e.to_string(),
            })?;
        Ok(Self { xot, root })
    }

    /// Decode `bytes` with `encoding` and parse the result.
    pub fn from_bytes(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let text = encoding.decode(bytes)?;
        Self::parse(&text)
    }

    /// Serialize the tree without an XML declaration.
    pub fn to_xml_string(&self, indent: bool) -> Result<String> {
        let parameters = Parameters {
            indentation: indent.then(Default::default),
            ..Default::default()
        };
        self.xot
            .serialize_xml_string(parameters, self.root)
            .map_err(|e| Error::XmlSerialize {
                message: e.to_string(),
            })
    }

    /// Serialize the tree with a declaration and encode it.
    pub fn to_bytes(&self, encoding: Encoding, indent: bool) -> Result<Vec<u8>> {
        let body = self.to_xml_string(indent)?;
        let mut text = format!("<?xml version=\"1.0\" encoding=\"{}\"?>\n", encoding);
        text.push_str(body.trim_start());
        if !text.ends_with('\n') {
            text.push('\n');
        }
        encoding.encode(&text)
    }

    /// All text nodes, in document order.
    pub(crate) fn text_nodes(&self) -> Vec<Node> {
        self.xot
            .descendants(self.root)
            .filter(|&node| self.xot.text_str(node).is_some())
            .collect()
    }

    /// The values of all text nodes, in document order.
    pub fn text_values(&self) -> Vec<String> {
        self.text_nodes()
            .into_iter()
            .filter_map(|node| self.text(node).map(str::to_string))
            .collect()
    }

    pub(crate) fn text(&self, node: Node) -> Option<&str> {
        self.xot.text_str(node)
    }

    /// Replace the value of a text node. An empty value removes the node.
    pub(crate) fn set_text(&mut self, node: Node, value: String) -> Result<()> {
        if value.is_empty() {
            return self.xot.remove(node).map_err(|e| Error::XmlSerialize {
                message: e.to_string(),
            });
        }
        if let Some(text) = self.xot.text_mut(node) {
            text.set(value);
        }
        Ok(())
    }

    /// Child elements of the document element with the given local name.
    pub(crate) fn top_level_elements(&mut self, local_name: &str) -> Result<Vec<Node>> {
        let name = self.xot.add_name(local_name);
        let document_element =
            self.xot
                .document_element(self.root)
                .map_err(|e| Error::XmlParse {
                    message: e.to_string(),
                })?;
        Ok(self
            .xot
            .children(document_element)
            .filter(|&child| {
                self.xot
                    .element(child)
                    .is_some_and(|element| element.name() == name)
            })
            .collect())
    }

    /// Make `value` the only content of `element`.
    pub(crate) fn set_element_text(&mut self, element: Node, value: &str) -> Result<()> {
        let children: Vec<Node> = self.xot.children(element).collect();
        for child in children {
            self.xot.remove(child).map_err(|e| Error::XmlSerialize {
                message: e.to_string(),
            })?;
        }
        let text = self.xot.new_text(value);
        self.xot
            .append(element, text)
            .map_err(|e| Error::XmlSerialize {
                message: e.to_string(),
            })
    }
}

/// Drop a leading byte order mark and XML declaration.
///
/// The declaration names the encoding of the bytes we already decoded; keeping
/// it would make the parser second-guess that decision.
fn strip_prolog(xml: &str) -> &str {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let trimmed = xml.trim_start();
    if trimmed.starts_with("<?xml") && trimmed[5..].starts_with(|c: char| c.is_whitespace()) {
        if let Some(end) = trimmed.find("?>") {
            return &trimmed[end + 2..];
        }
    }
    xml
}
