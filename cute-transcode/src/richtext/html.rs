//! Rich-text document → HTML.

use serde_json::Value;

/// Renders a rich-text document as HTML.
///
/// Embedded entries and assets have no textual form and render as nothing;
/// entry and asset hyperlinks render their inner text only. Unknown node
/// types render their children.
pub fn to_html(document: &Value) -> String {
    let mut out = String::new();
    render(document, &mut out);
    out
}

fn render(node: &Value, out: &mut String) {
    match node {
        Value::String(text) => push_escaped(text, out),
        Value::Object(_) => render_node(node, out),
        _ => {}
    }
}

fn render_node(node: &Value, out: &mut String) {
    let node_type = node.get("nodeType").and_then(Value::as_str).unwrap_or_default();

    if node_type == "text" {
        render_text(node, out);
        return;
    }

    if let Some(level) = node_type.strip_prefix("heading-") {
        let tag = format!("h{level}");
        wrap(&tag, node, out);
        return;
    }

    match node_type {
        "paragraph" => wrap("p", node, out),
        "unordered-list" => wrap("ul", node, out),
        "ordered-list" => wrap("ol", node, out),
        "list-item" => wrap("li", node, out),
        "blockquote" => wrap("blockquote", node, out),
        "table" => wrap("table", node, out),
        "table-row" => wrap("tr", node, out),
        "table-header-cell" => wrap("th", node, out),
        "table-cell" => wrap("td", node, out),
        "hr" => out.push_str("<hr/>"),
        "hyperlink" => {
            let uri = node
                .pointer("/data/uri")
                .and_then(Value::as_str)
                .unwrap_or_default();
            out.push_str("<a href=\"");
            push_escaped(uri, out);
            out.push_str("\">");
            render_children(node, out);
            out.push_str("</a>");
        }
        "embedded-entry-block"
        | "embedded-entry-inline"
        | "embedded-asset-block"
        | "embedded-resource-block"
        | "embedded-resource-inline" => {}
        _ => render_children(node, out),
    }
}

fn wrap(tag: &str, node: &Value, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    render_children(node, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn render_children(node: &Value, out: &mut String) {
    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            render(child, out);
        }
    }
}

fn render_text(node: &Value, out: &mut String) {
    let value = node.get("value").and_then(Value::as_str).unwrap_or_default();
    let tags: Vec<&str> = node
        .get("marks")
        .and_then(Value::as_array)
        .map(|marks| {
            marks
                .iter()
                .filter_map(|m| m.get("type").and_then(Value::as_str))
                .filter_map(mark_tag)
                .collect()
        })
        .unwrap_or_default();

    for tag in &tags {
        out.push('<');
        out.push_str(tag);
        out.push('>');
    }
    for (i, line) in value.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<br/>");
        }
        push_escaped(line, out);
    }
    for tag in tags.iter().rev() {
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn mark_tag(mark: &str) -> Option<&'static str> {
    match mark {
        "bold" => Some("b"),
        "italic" => Some("i"),
        "underline" => Some("u"),
        "code" => Some("code"),
        "superscript" => Some("sup"),
        "subscript" => Some("sub"),
        "strikethrough" => Some("s"),
        _ => None,
    }
}

fn push_escaped(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
