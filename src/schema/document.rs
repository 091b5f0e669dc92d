// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Parses an XML schema document into a [`SchemaNode`] tree (§3, §6).
//!
//! The synthetic `#document` root's first child is a `?xml` pseudo-node when
//! the document carries an XML declaration, followed by the real document
//! element. Meta-version detection (§3) reads exactly that shape.

use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::core::error::Error;
use crate::schema::node::SchemaNode;

/// Tag used for the synthetic pseudo-node standing in for an XML declaration.
pub const XML_DECL_TAG: &str = "?xml";

/// A parsed schema document: the synthetic root plus whether it carried a
/// leading XML declaration (used to derive the meta-version, §3).
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub root: Arc<SchemaNode>,
    pub has_xml_declaration: bool,
}

impl SchemaDocument {
    /// The document element: the first root child that is not the `?xml`
    /// pseudo-node, i.e. whichever of the first or second child carries the
    /// real content (§3).
    pub fn document_element(&self) -> Option<&Arc<SchemaNode>> {
        self.root.children.iter().find(|c| c.tag != XML_DECL_TAG)
    }
}

/// Parse `xml` (the contents of one schema file, e.g. `bm/meta.xml`) into a
/// [`SchemaDocument`].
pub fn parse_document(label: &str, xml: &str) -> Result<SchemaDocument, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root = SchemaNode::new("#document");
    let mut has_xml_declaration = false;
    // Stack of (node, is_empty_tracked) while we are inside open elements.
    let mut stack: Vec<SchemaNode> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Decl(_)) => {
                has_xml_declaration = true;
                root.children.push(Arc::new(SchemaNode::new(XML_DECL_TAG)));
            }
            Ok(Event::Start(e)) => {
                let mut node = SchemaNode::new(decode_name(&e));
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr
                        .unescape_value()
                        .map(|v| v.into_owned())
                        .unwrap_or_default();
                    node.attributes.insert(key, value);
                }
                stack.push(node);
            }
            Ok(Event::Empty(e)) => {
                let mut node = SchemaNode::new(decode_name(&e));
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr
                        .unescape_value()
                        .map(|v| v.into_owned())
                        .unwrap_or_default();
                    node.attributes.insert(key, value);
                }
                let node = Arc::new(node);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root.children.push(node),
                }
            }
            Ok(Event::End(_)) => {
                let finished = stack
                    .pop()
                    .ok_or_else(|| Error::xml(label, "unbalanced closing tag"))?;
                let finished = Arc::new(finished);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(finished),
                    None => root.children.push(finished),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(Error::xml(label, err.to_string())),
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::xml(label, "document ended with unclosed elements"));
    }

    Ok(SchemaDocument {
        root: Arc::new(root),
        has_xml_declaration,
    })
}

fn decode_name(e: &quick_xml::events::BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declaration_as_leading_pseudo_node() {
        let xml = r#"<?xml version="1.0"?><root><managedObject class="A"/></root>"#;
        let doc = parse_document("test", xml).unwrap();
        assert!(doc.has_xml_declaration);
        assert_eq!(doc.root.children[0].tag, XML_DECL_TAG);
        assert_eq!(doc.document_element().unwrap().tag, "root");
    }

    #[test]
    fn parses_document_without_declaration() {
        let xml = r#"<root><managedObject class="A"/></root>"#;
        let doc = parse_document("test", xml).unwrap();
        assert!(!doc.has_xml_declaration);
        assert_eq!(doc.document_element().unwrap().tag, "root");
    }

    #[test]
    fn preserves_child_order_and_attributes() {
        let xml = r#"<managedObject class="Cell"><p name="a" type="integer"><proto index="1"/></p></managedObject>"#;
        let doc = parse_document("test", xml).unwrap();
        let mo = doc.document_element().unwrap();
        assert_eq!(mo.attr("class"), Some("Cell"));
        let p = &mo.children[0];
        assert_eq!(p.tag, "p");
        assert_eq!(p.attr("name"), Some("a"));
        assert_eq!(p.children[0].tag, "proto");
        assert_eq!(p.children[0].attr("index"), Some("1"));
    }

    #[test]
    fn rejects_unbalanced_documents() {
        let xml = r#"<root><p></root>"#;
        assert!(parse_document("test", xml).is_err());
    }
}
