//! JSON interchange implementation.
//!
//! The document is written as `{"nodes": [...], "edges": [...]}`, one object
//! per node carrying `id`, `label`, `x`, `y` and `usage`.

use super::{CodecResult, Exporter, InterchangeDocument};
use std::io::{BufRead, Write};

/// JSON exporter implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    /// Indent the output. Off by default; large graphs get big quickly.
    pub pretty: bool,
}

impl JsonExporter {
    /// An exporter producing indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, document: &InterchangeDocument, writer: &mut W) -> CodecResult<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, document)?;
        } else {
            serde_json::to_writer(&mut *writer, document)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

/// Reads a JSON interchange document.
pub fn read_json<R: BufRead>(reader: R) -> CodecResult<InterchangeDocument> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{EdgeRecord, NodeRecord};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn create_test_document() -> InterchangeDocument {
        let mut pandas = NodeRecord::new("pandas");
        pandas.x = 12.5;
        pandas.y = -7.25;
        let mut numpy = NodeRecord::new("numpy");
        numpy.usage = 1;

        InterchangeDocument {
            nodes: vec![pandas, numpy],
            edges: vec![EdgeRecord {
                source: "pandas".to_string(),
                target: "numpy".to_string(),
            }],
        }
    }

    #[test]
    fn test_json_export_shape() {
        let mut output = Vec::new();
        JsonExporter::default()
            .export(&create_test_document(), &mut output)
            .unwrap();

        let json_str = String::from_utf8(output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json_str).unwrap();

        assert_eq!(parsed["nodes"][0]["id"], "pandas");
        assert_eq!(parsed["nodes"][0]["label"], "pandas");
        assert_eq!(parsed["nodes"][0]["x"], 12.5);
        assert_eq!(parsed["nodes"][1]["usage"], 1);
        assert_eq!(parsed["edges"][0]["source"], "pandas");
        assert_eq!(parsed["edges"][0]["target"], "numpy");
    }

    #[test]
    fn test_json_compact_is_single_line() {
        let mut output = Vec::new();
        JsonExporter::default()
            .export(&create_test_document(), &mut output)
            .unwrap();
        let json_str = String::from_utf8(output).unwrap();
        assert_eq!(json_str.lines().count(), 1);

        let mut output = Vec::new();
        JsonExporter::pretty()
            .export(&create_test_document(), &mut output)
            .unwrap();
        assert!(String::from_utf8(output).unwrap().lines().count() > 1);
    }

    #[test]
    fn test_json_read_back() {
        let document = create_test_document();
        let mut output = Vec::new();
        JsonExporter::default().export(&document, &mut output).unwrap();

        let restored = read_json(Cursor::new(output)).unwrap();
        assert_eq!(restored, document);
    }

    #[test]
    fn test_json_read_defaults() {
        let input = r#"{"nodes": [{"id": "a"}], "edges": []}"#;
        let document = read_json(Cursor::new(input)).unwrap();

        assert_eq!(document.nodes[0].label, "");
        assert_eq!(document.nodes[0].x, 0.0);
        assert_eq!(document.nodes[0].usage, 0);
    }

    #[test]
    fn test_json_read_rejects_garbage() {
        assert!(read_json(Cursor::new("nodes: []")).is_err());
    }
}
