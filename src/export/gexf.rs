//! GEXF 1.3 reader and writer.
//!
//! The writer emits a directed static graph that layout tools such as Gephi
//! open directly, with `viz:position` and `viz:size` on every node and the
//! usage count stored as a node attribute. The reader accepts files saved
//! back by those tools: it looks at `node`, `edge`, `position` and
//! `attvalue` elements by local name and ignores everything else.

use std::io::{BufRead, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::warn;

use super::{CodecError, CodecResult, EdgeRecord, Exporter, InterchangeDocument, NodeRecord};
use crate::render::{marker_size, DEFAULT_MIN_SIZE};

pub const GEXF_NAMESPACE: &str = "http://gexf.net/1.3";
pub const VIZ_NAMESPACE: &str = "http://gexf.net/1.3/viz";

const USAGE_ATTRIBUTE: &str = "usage";

/// GEXF exporter implementation.
pub struct GexfExporter;

impl Exporter for GexfExporter {
    fn export<W: Write>(&self, document: &InterchangeDocument, writer: &mut W) -> CodecResult<()> {
        let mut xml = Writer::new_with_indent(writer, b' ', 2);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.write_event(Event::Start(BytesStart::new("gexf").with_attributes([
            ("xmlns", GEXF_NAMESPACE),
            ("xmlns:viz", VIZ_NAMESPACE),
            ("version", "1.3"),
        ])))?;

        xml.write_event(Event::Start(BytesStart::new("meta")))?;
        xml.write_event(Event::Start(BytesStart::new("creator")))?;
        xml.write_event(Event::Text(BytesText::new(env!("CARGO_PKG_NAME"))))?;
        xml.write_event(Event::End(BytesEnd::new("creator")))?;
        xml.write_event(Event::End(BytesEnd::new("meta")))?;

        xml.write_event(Event::Start(
            BytesStart::new("graph")
                .with_attributes([("defaultedgetype", "directed"), ("mode", "static")]),
        ))?;

        xml.write_event(Event::Start(
            BytesStart::new("attributes").with_attributes([("class", "node")]),
        ))?;
        xml.write_event(Event::Empty(BytesStart::new("attribute").with_attributes([
            ("id", USAGE_ATTRIBUTE),
            ("title", USAGE_ATTRIBUTE),
            ("type", "integer"),
        ])))?;
        xml.write_event(Event::End(BytesEnd::new("attributes")))?;

        xml.write_event(Event::Start(BytesStart::new("nodes")))?;
        for node in &document.nodes {
            write_node(&mut xml, node)?;
        }
        xml.write_event(Event::End(BytesEnd::new("nodes")))?;

        xml.write_event(Event::Start(BytesStart::new("edges")))?;
        for (id, edge) in document.edges.iter().enumerate() {
            let id = id.to_string();
            xml.write_event(Event::Empty(BytesStart::new("edge").with_attributes([
                ("id", id.as_str()),
                ("source", edge.source.as_str()),
                ("target", edge.target.as_str()),
            ])))?;
        }
        xml.write_event(Event::End(BytesEnd::new("edges")))?;

        xml.write_event(Event::End(BytesEnd::new("graph")))?;
        xml.write_event(Event::End(BytesEnd::new("gexf")))?;

        writeln!(xml.get_mut())?;
        Ok(())
    }
}

fn write_node<W: Write>(xml: &mut Writer<W>, node: &NodeRecord) -> CodecResult<()> {
    let usage = node.usage.to_string();
    let size = marker_size(node.usage, DEFAULT_MIN_SIZE).to_string();
    let x = node.x.to_string();
    let y = node.y.to_string();

    xml.write_event(Event::Start(BytesStart::new("node").with_attributes([
        ("id", node.id.as_str()),
        ("label", node.label.as_str()),
    ])))?;

    xml.write_event(Event::Start(BytesStart::new("attvalues")))?;
    xml.write_event(Event::Empty(
        BytesStart::new("attvalue")
            .with_attributes([("for", USAGE_ATTRIBUTE), ("value", usage.as_str())]),
    ))?;
    xml.write_event(Event::End(BytesEnd::new("attvalues")))?;

    xml.write_event(Event::Empty(
        BytesStart::new("viz:size").with_attributes([("value", size.as_str())]),
    ))?;
    xml.write_event(Event::Empty(BytesStart::new("viz:position").with_attributes([
        ("x", x.as_str()),
        ("y", y.as_str()),
        ("z", "0"),
    ])))?;

    xml.write_event(Event::End(BytesEnd::new("node")))?;
    Ok(())
}

/// Reads a GEXF document.
///
/// Node labels default to the node id, positions to the origin. A usage
/// attribute written by [`GexfExporter`] is picked up when present.
///
/// # Errors
///
/// Returns [`CodecError::MalformedDocument`] for a node without `id`, an
/// edge without `source` or `target`, or a non-numeric coordinate.
pub fn read_gexf<R: BufRead>(reader: R) -> CodecResult<InterchangeDocument> {
    let mut xml = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut document = InterchangeDocument::default();
    let mut current: Option<NodeRecord> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if let Some(node) = handle_element(&e, &mut current, &mut document)? {
                    current = Some(node);
                }
            }
            Event::Empty(e) => {
                // A self-closing node has no children to wait for.
                if let Some(node) = handle_element(&e, &mut current, &mut document)? {
                    document.nodes.push(node);
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"node" {
                    if let Some(node) = current.take() {
                        document.nodes.push(node);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(document)
}

/// Applies one opening element. Returns a freshly opened node, if any.
fn handle_element(
    e: &BytesStart<'_>,
    current: &mut Option<NodeRecord>,
    document: &mut InterchangeDocument,
) -> CodecResult<Option<NodeRecord>> {
    match e.local_name().as_ref() {
        b"node" => {
            let id = required_attr(e, b"id", "node")?;
            let mut node = NodeRecord::new(id);
            if let Some(label) = attr(e, b"label")? {
                node.label = label;
            }
            return Ok(Some(node));
        }
        b"position" => {
            if let Some(node) = current.as_mut() {
                node.x = coordinate(e, b"x")?;
                node.y = coordinate(e, b"y")?;
            }
        }
        b"attvalue" => {
            if let Some(node) = current.as_mut() {
                let target = attr(e, b"for")?;
                if target.as_deref() == Some(USAGE_ATTRIBUTE) {
                    if let Some(value) = attr(e, b"value")? {
                        node.usage = match value.trim().parse() {
                            Ok(usage) => usage,
                            Err(_) => {
                                warn!(node = %node.id, value = %value, "ignoring invalid usage value");
                                0
                            }
                        };
                    }
                }
            }
        }
        b"edge" => {
            document.edges.push(EdgeRecord {
                source: required_attr(e, b"source", "edge")?,
                target: required_attr(e, b"target", "edge")?,
            });
        }
        _ => {}
    }
    Ok(None)
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> CodecResult<Option<String>> {
    for attribute in e.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == name {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(e: &BytesStart<'_>, name: &[u8], element: &str) -> CodecResult<String> {
    attr(e, name)?.ok_or_else(|| {
        CodecError::MalformedDocument(format!(
            "<{}> is missing the '{}' attribute",
            element,
            String::from_utf8_lossy(name)
        ))
    })
}

fn coordinate(e: &BytesStart<'_>, name: &[u8]) -> CodecResult<f64> {
    match attr(e, name)? {
        Some(value) => value.trim().parse().map_err(|_| {
            CodecError::MalformedDocument(format!(
                "invalid {} coordinate '{}'",
                String::from_utf8_lossy(name),
                value
            ))
        }),
        None => Ok(0.0),
    }
}
