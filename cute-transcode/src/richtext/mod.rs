//! Rich-text documents.
//!
//! The flat form of a `RichText` field is Markdown, produced by rendering the
//! document to HTML and converting that to Markdown. A document holding one
//! paragraph with one unmarked text node flattens to that text verbatim. The
//! reverse direction does not parse Markdown: flat text comes back as a
//! single paragraph holding a single text node.

mod html;
mod markdown;

use serde_json::{Value, json};

pub use html::to_html;
pub use markdown::html_to_markdown;

/// Renders a rich-text document as Markdown.
///
/// Plain documents (see [`plain_text`]) yield their text unchanged, so that
/// they survive [`document_from_text`] exactly.
pub fn to_markdown(document: &Value) -> String {
    match plain_text(document) {
        Some(text) => text.to_string(),
        None => html_to_markdown(&to_html(document)),
    }
}

/// The text of a document made of one paragraph holding one unmarked text
/// node.
pub fn plain_text(document: &Value) -> Option<&str> {
    if node_type(document)? != "document" {
        return None;
    }
    let [paragraph] = document.get("content")?.as_array()?.as_slice() else {
        return None;
    };
    if node_type(paragraph)? != "paragraph" {
        return None;
    }
    let [text] = paragraph.get("content")?.as_array()?.as_slice() else {
        return None;
    };
    if node_type(text)? != "text" {
        return None;
    }
    let unmarked = text
        .get("marks")
        .and_then(Value::as_array)
        .is_none_or(|marks| marks.is_empty());
    if !unmarked {
        return None;
    }
    text.get("value")?.as_str()
}

fn node_type(node: &Value) -> Option<&str> {
    node.get("nodeType")?.as_str()
}

/// Wraps plain text in a document with one paragraph and one unmarked text
/// node.
pub fn document_from_text(text: &str) -> Value {
    json!({
        "nodeType": "document",
        "data": {},
        "content": [{
            "nodeType": "paragraph",
            "data": {},
            "content": [{
                "nodeType": "text",
                "value": text,
                "marks": [],
                "data": {}
            }]
        }]
    })
}
