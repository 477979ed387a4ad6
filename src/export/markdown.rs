//! Markdown → HTML body rendering via pulldown-cmark.
//!
//! Raw HTML embedded in the generated markdown is escaped and shown as text,
//! never passed through into the exported document.

use pulldown_cmark::{html, Event, Options, Parser};

/// Render `markdown` to an HTML fragment (no `<html>`/`<body>` wrapper).
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
