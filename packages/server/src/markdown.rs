use pulldown_cmark::{Parser, html};

/// Render commonmark source to an HTML fragment.
pub fn render_markdown(source: &str) -> String {
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, Parser::new(source));
    out
}
