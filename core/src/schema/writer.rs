use crate::prelude::{StageError, StageResult};
use crate::schema::document::MobiusDocument;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;

const INDENT: &[u8] = b"    ";

/// Serializes `document` as JSON with four-space indentation.
pub fn write_document<W: Write>(document: &MobiusDocument, writer: W) -> StageResult<()> {
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    document
        .serialize(&mut serializer)
        .map_err(|e| StageError::Internal(format!("serializing document: {e}")))
}

pub fn to_pretty_json(document: &MobiusDocument) -> StageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_document(document, &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::document::Metadata;

    #[test]
    fn empty_document_uses_four_space_indent() {
        let document = MobiusDocument {
            entities: Vec::new(),
            simulation: Vec::new(),
            metadata: Metadata::new(0.0, 0.04, 0),
        };
        let text = String::from_utf8(to_pretty_json(&document).unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"entities\": [],\n    \"simulation\": [],"));
        assert!(text.contains("\n        \"duration\": 0.0,"));
        assert!(text.contains("\"model_GUID\": \"\""));
        assert!(text.contains("\"isSI\": true"));
    }
}
