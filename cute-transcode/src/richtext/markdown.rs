//! HTML → Markdown for the tag set produced by [`to_html`](super::to_html).

/// Converts rich-text HTML to Markdown.
///
/// Text is not Markdown-escaped. Unknown tags are dropped and their text
/// kept. The result is trimmed and never contains more than one blank line
/// in a row.
pub fn html_to_markdown(html: &str) -> String {
    let mut writer = Writer::new();
    for token in Tokenizer::new(html) {
        writer.token(token);
    }
    writer.finish()
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Open { name: String, href: Option<String> },
    Close(String),
    /// `<br/>`, `<hr/>` and similar.
    Void(String),
}

struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    fn new(html: &'a str) -> Self {
        Self { rest: html }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.rest.is_empty() {
            return None;
        }

        if !self.rest.starts_with('<') {
            let end = self.rest.find('<').unwrap_or(self.rest.len());
            let (text, rest) = self.rest.split_at(end);
            self.rest = rest;
            return Some(Token::Text(text));
        }

        let Some(end) = self.rest.find('>') else {
            // Unterminated tag: the remainder is text.
            let text = self.rest;
            self.rest = "";
            return Some(Token::Text(text));
        };
        let inner = &self.rest[1..end];
        self.rest = &self.rest[end + 1..];

        if let Some(name) = inner.strip_prefix('/') {
            return Some(Token::Close(name.trim().to_ascii_lowercase()));
        }

        let self_closing = inner.ends_with('/');
        let inner = inner.trim_end_matches('/');
        let name_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
        let name = inner[..name_end].to_ascii_lowercase();

        if self_closing || matches!(name.as_str(), "br" | "hr" | "img") {
            return Some(Token::Void(name));
        }

        let href = attribute(&inner[name_end..], "href").map(|v| unescape(&v));
        Some(Token::Open { name, href })
    }
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    let start = attrs.find(&format!("{name}=\""))? + name.len() + 2;
    let len = attrs[start..].find('"')?;
    Some(attrs[start..start + len].to_string())
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

struct List {
    ordered: bool,
    counter: usize,
}

#[derive(Default)]
struct Writer {
    /// Output buffers; blockquotes render into their own buffer.
    buffers: Vec<String>,
    lists: Vec<List>,
    /// Open list items and table cells, inside which paragraphs are inline.
    inline_depth: usize,
    links: Vec<String>,
    table_header_written: bool,
    row_cells: usize,
    row_is_header: bool,
}

impl Writer {
    fn new() -> Self {
        Self {
            buffers: vec![String::new()],
            ..Self::default()
        }
    }

    fn out(&mut self) -> &mut String {
        if self.buffers.is_empty() {
            self.buffers.push(String::new());
        }
        let last = self.buffers.len() - 1;
        &mut self.buffers[last]
    }

    fn push(&mut self, text: &str) {
        self.out().push_str(text);
    }

    fn ensure_line_start(&mut self) {
        let out = self.out();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
    }

    fn end_block(&mut self) {
        if self.inline_depth == 0 {
            self.push("\n\n");
        }
    }

    fn token(&mut self, token: Token<'_>) {
        match token {
            Token::Text(text) => {
                let text = unescape(text);
                self.push(&text);
            }
            Token::Void(name) => match name.as_str() {
                "br" => self.push("\n"),
                "hr" => {
                    self.ensure_line_start();
                    self.push("---\n\n");
                }
                _ => {}
            },
            Token::Open { name, href } => self.open(&name, href),
            Token::Close(name) => self.close(&name),
        }
    }

    fn open(&mut self, name: &str, href: Option<String>) {
        match name {
            "p" => {}
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse().unwrap_or(1);
                self.ensure_line_start();
                self.push(&"#".repeat(level));
                self.push(" ");
            }
            "b" | "strong" => self.push("**"),
            "i" | "em" => self.push("*"),
            "code" => self.push("`"),
            "s" | "del" => self.push("~~"),
            "a" => {
                self.links.push(href.unwrap_or_default());
                self.push("[");
            }
            "ul" | "ol" => {
                self.ensure_line_start();
                self.lists.push(List {
                    ordered: name == "ol",
                    counter: 0,
                });
            }
            "li" => {
                self.ensure_line_start();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(list) if list.ordered => {
                        list.counter += 1;
                        format!("{}. ", list.counter)
                    }
                    _ => "- ".to_string(),
                };
                self.push(&"  ".repeat(depth));
                self.push(&marker);
                self.inline_depth += 1;
            }
            "blockquote" => self.buffers.push(String::new()),
            "table" => {
                self.ensure_line_start();
                self.table_header_written = false;
            }
            "tr" => {
                self.ensure_line_start();
                self.row_cells = 0;
                self.row_is_header = false;
                self.push("|");
            }
            "th" | "td" => {
                self.row_is_header |= name == "th";
                self.inline_depth += 1;
                self.push(" ");
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => self.end_block(),
            "b" | "strong" => self.push("**"),
            "i" | "em" => self.push("*"),
            "code" => self.push("`"),
            "s" | "del" => self.push("~~"),
            "a" => {
                let href = self.links.pop().unwrap_or_default();
                self.push(&format!("]({href})"));
            }
            "ul" | "ol" => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.end_block();
                }
            }
            "li" => self.inline_depth = self.inline_depth.saturating_sub(1),
            "blockquote" => {
                if self.buffers.len() > 1 {
                    let quoted = self.buffers.pop().unwrap_or_default();
                    let quoted: Vec<String> = quoted
                        .trim()
                        .lines()
                        .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
                        .collect();
                    self.ensure_line_start();
                    self.push(&quoted.join("\n"));
                    self.end_block();
                }
            }
            "th" | "td" => {
                self.inline_depth = self.inline_depth.saturating_sub(1);
                self.row_cells += 1;
                self.push(" |");
            }
            "tr" => {
                self.push("\n");
                if self.row_is_header && !self.table_header_written {
                    let separator = " --- |".repeat(self.row_cells);
                    self.push(&format!("|{separator}\n"));
                    self.table_header_written = true;
                }
            }
            "table" => self.push("\n"),
            _ => {}
        }
    }

    fn finish(mut self) -> String {
        // Unclosed blockquotes flatten into their parent.
        while self.buffers.len() > 1 {
            let inner = self.buffers.pop().unwrap_or_default();
            self.push(&inner);
        }
        collapse_blank_lines(self.out().trim())
    }
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }
    out
}
