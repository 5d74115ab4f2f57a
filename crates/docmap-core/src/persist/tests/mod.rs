mod insert;
mod properties;

use crate::wire::{WireDocument, WireValue};

// ---- helpers -----------------------------------------------------------

fn text(s: &str) -> WireValue {
    WireValue::Text(s.to_string())
}

fn doc_of(value: &WireValue) -> &WireDocument {
    value.as_document().expect("wire value should be a document")
}

fn keys(doc: &WireDocument) -> Vec<&str> {
    doc.keys().collect()
}
