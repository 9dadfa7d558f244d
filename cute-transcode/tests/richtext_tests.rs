use cute_transcode::richtext::{document_from_text, html_to_markdown, plain_text, to_html, to_markdown};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn text(value: &str, marks: &[&str]) -> Value {
    let marks: Vec<Value> = marks.iter().map(|m| json!({ "type": m })).collect();
    json!({ "nodeType": "text", "value": value, "marks": marks, "data": {} })
}

fn node(node_type: &str, content: Vec<Value>) -> Value {
    json!({ "nodeType": node_type, "data": {}, "content": content })
}

fn doc(content: Vec<Value>) -> Value {
    node("document", content)
}

fn para(content: Vec<Value>) -> Value {
    node("paragraph", content)
}

// ── HTML ──────────────────────────────────────────────────────────

#[test]
fn renders_paragraph_with_marks() {
    let d = doc(vec![para(vec![text("Hello ", &[]), text("world", &["bold", "italic"])])]);
    assert_eq!(to_html(&d), "<p>Hello <b><i>world</i></b></p>");
}

#[test]
fn escapes_text() {
    let d = doc(vec![para(vec![text("a < b & \"c\"", &[])])]);
    assert_eq!(to_html(&d), "<p>a &lt; b &amp; &quot;c&quot;</p>");
}

#[test]
fn renders_line_breaks() {
    let d = doc(vec![para(vec![text("one\ntwo", &[])])]);
    assert_eq!(to_html(&d), "<p>one<br/>two</p>");
}

#[test]
fn renders_hyperlinks() {
    let link = json!({
        "nodeType": "hyperlink",
        "data": { "uri": "https://example.test/?a=1&b=2" },
        "content": [text("docs", &[])]
    });
    let d = doc(vec![para(vec![link])]);
    assert_eq!(
        to_html(&d),
        "<p><a href=\"https://example.test/?a=1&amp;b=2\">docs</a></p>"
    );
}

#[test]
fn embedded_entries_render_nothing() {
    let embed = json!({
        "nodeType": "embedded-entry-block",
        "data": { "target": { "sys": { "id": "x", "type": "Link", "linkType": "Entry" } } },
        "content": []
    });
    let d = doc(vec![para(vec![text("A", &[])]), embed, para(vec![text("B", &[])])]);
    assert_eq!(to_html(&d), "<p>A</p><p>B</p>");
}

#[test]
fn entry_hyperlinks_render_inner_text() {
    let link = json!({
        "nodeType": "entry-hyperlink",
        "data": { "target": { "sys": { "id": "x" } } },
        "content": [text("see this", &[])]
    });
    assert_eq!(to_html(&doc(vec![para(vec![link])])), "<p>see this</p>");
}

// ── Markdown ──────────────────────────────────────────────────────

#[test]
fn markdown_for_marks() {
    let d = doc(vec![para(vec![
        text("Hello ", &[]),
        text("world", &["bold"]),
        text(" and ", &[]),
        text("code", &["code"]),
    ])]);
    assert_eq!(to_markdown(&d), "Hello **world** and `code`");
}

#[test]
fn markdown_for_headings_and_paragraphs() {
    let d = doc(vec![
        node("heading-2", vec![text("Title", &[])]),
        para(vec![text("First", &[])]),
        para(vec![text("Second", &[])]),
    ]);
    assert_eq!(to_markdown(&d), "## Title\n\nFirst\n\nSecond");
}

#[test]
fn markdown_for_lists() {
    let item = |t: &str| node("list-item", vec![para(vec![text(t, &[])])]);
    let unordered = doc(vec![node("unordered-list", vec![item("a"), item("b")])]);
    assert_eq!(to_markdown(&unordered), "- a\n- b");

    let ordered = doc(vec![
        node("ordered-list", vec![item("a"), item("b")]),
        para(vec![text("after", &[])]),
    ]);
    assert_eq!(to_markdown(&ordered), "1. a\n2. b\n\nafter");
}

#[test]
fn markdown_for_nested_lists() {
    let inner = node("unordered-list", vec![node("list-item", vec![para(vec![text("b", &[])])])]);
    let outer = node(
        "unordered-list",
        vec![node("list-item", vec![para(vec![text("a", &[])]), inner])],
    );
    assert_eq!(to_markdown(&doc(vec![outer])), "- a\n  - b");
}

#[test]
fn markdown_for_links_unescapes_href() {
    let link = json!({
        "nodeType": "hyperlink",
        "data": { "uri": "https://example.test/?a=1&b=2" },
        "content": [text("docs", &[])]
    });
    let d = doc(vec![para(vec![text("See ", &[]), link])]);
    assert_eq!(to_markdown(&d), "See [docs](https://example.test/?a=1&b=2)");
}

#[test]
fn markdown_for_blockquote_and_rule() {
    let d = doc(vec![
        node("blockquote", vec![para(vec![text("quoted", &[])])]),
        node("hr", vec![]),
        para(vec![text("done", &[])]),
    ]);
    assert_eq!(to_markdown(&d), "> quoted\n\n---\n\ndone");
}

#[test]
fn markdown_for_tables() {
    let cell = |kind: &str, t: &str| node(kind, vec![para(vec![text(t, &[])])]);
    let table = node(
        "table",
        vec![
            node("table-row", vec![cell("table-header-cell", "H1"), cell("table-header-cell", "H2")]),
            node("table-row", vec![cell("table-cell", "a"), cell("table-cell", "b")]),
        ],
    );
    assert_eq!(to_markdown(&doc(vec![table])), "| H1 | H2 |\n| --- | --- |\n| a | b |");
}

#[test]
fn markdown_keeps_special_characters() {
    let d = doc(vec![para(vec![text("5 * 3 < 20 & _ok_", &[])])]);
    assert_eq!(to_markdown(&d), "5 * 3 < 20 & _ok_");
}

#[test]
fn markdown_collapses_blank_lines() {
    assert_eq!(html_to_markdown("<p>a</p><p></p><p></p><p>b</p>"), "a\n\nb");
}

#[test]
fn markdown_of_empty_document_is_empty() {
    assert_eq!(to_markdown(&doc(vec![])), "");
    assert_eq!(to_markdown(&Value::Null), "");
}

// ── Plain text documents ──────────────────────────────────────────

#[test]
fn document_from_text_has_one_text_node() {
    let d = document_from_text("Hi there");
    assert_eq!(d["nodeType"], "document");
    assert_eq!(d["content"].as_array().map(Vec::len), Some(1));
    assert_eq!(d["content"][0]["nodeType"], "paragraph");
    assert_eq!(d["content"][0]["content"][0]["value"], "Hi there");
    assert_eq!(d["content"][0]["content"][0]["marks"], json!([]));
}

#[test]
fn plain_text_survives_markdown() {
    for sample in ["Hello", "line one\nline two", "a < b && c > d", "quote \" mark"] {
        assert_eq!(to_markdown(&document_from_text(sample)), sample);
    }
}

#[test]
fn plain_text_only_for_single_unmarked_node() {
    assert_eq!(plain_text(&document_from_text("x\n\n\n")), Some("x\n\n\n"));
    assert_eq!(plain_text(&doc(vec![para(vec![text("bold", &["bold"])])])), None);
    assert_eq!(plain_text(&doc(vec![para(vec![text("a", &[]), text("b", &[])])])), None);
    assert_eq!(plain_text(&doc(vec![para(vec![text("a", &[])]), para(vec![text("b", &[])])])), None);
    assert_eq!(plain_text(&doc(vec![node("heading-1", vec![text("h", &[])])])), None);
}

#[test]
fn marked_documents_still_render_through_html() {
    let d = doc(vec![para(vec![text("loud", &["bold"])])]);
    assert_eq!(to_markdown(&d), "**loud**");
}
