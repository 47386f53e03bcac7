//! Allowlist HTML sanitizer for upstream abstracts.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

/// Elements kept with their tag; everything else is unwrapped so only
/// its text survives. JATS-namespaced inline tags show up in Crossref
/// abstracts, so their local names are included.
const ALLOWED_ELEMENTS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "dd", "div", "dl", "dt", "em", "h1", "h2", "h3", "h4",
    "h5", "h6", "i", "li", "ol", "p", "pre", "span", "strong", "sub", "sup", "u", "ul",
    "jats:p", "jats:italic", "jats:bold", "jats:sub", "jats:sup",
];

/// Subtrees dropped entirely, content included.
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "iframe", "object", "embed", "form"];

/// Attributes kept on allowed elements. Event handlers and anything
/// else are stripped; `href` survives only with an http(s) target.
const ALLOWED_ATTRIBUTES: &[&str] = &["href", "title", "lang"];

/// Strip dangerous markup from an HTML fragment, keeping benign
/// inline formatting. The output is re-serialized with text nodes
/// re-escaped.
pub fn sanitize_html(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut out = String::with_capacity(input.len());
    for child in fragment.tree.root().children() {
        write_node(child, &mut out);
    }
    out
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&escape_text(&text)),
        Node::Element(element) => {
            let name = element.name();
            if DROPPED_ELEMENTS.contains(&name) {
                return;
            }
            if ALLOWED_ELEMENTS.contains(&name) {
                out.push('<');
                out.push_str(name);
                for (attr, value) in element.attrs() {
                    if !ALLOWED_ATTRIBUTES.contains(&attr) {
                        continue;
                    }
                    if attr == "href" && !is_safe_href(value) {
                        continue;
                    }
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                for child in node.children() {
                    write_node(child, out);
                }
                if name != "br" {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            } else {
                // Unknown wrapper (html, body, custom tags): keep only
                // its content.
                for child in node.children() {
                    write_node(child, out);
                }
            }
        }
        _ => {}
    }
}

fn is_safe_href(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    v.starts_with("https://") || v.starts_with("http://")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize_html("A plain abstract."), "A plain abstract.");
    }

    #[test]
    fn script_subtrees_are_dropped() {
        let out = sanitize_html("<p>Safe</p><script>alert('x')</script>");
        assert_eq!(out, "<p>Safe</p>");
    }

    #[test]
    fn event_handlers_are_stripped() {
        let out = sanitize_html(r#"<p onclick="steal()">Text</p>"#);
        assert_eq!(out, "<p>Text</p>");
    }

    #[test]
    fn javascript_hrefs_are_stripped() {
        let out = sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#);
        assert_eq!(out, "<a>x</a>");
        let kept = sanitize_html(r#"<a href="https://example.org">x</a>"#);
        assert_eq!(kept, r#"<a href="https://example.org">x</a>"#);
    }

    #[test]
    fn unknown_wrappers_are_unwrapped() {
        let out = sanitize_html("<section><p>Kept</p></section>");
        assert_eq!(out, "<p>Kept</p>");
    }

    #[test]
    fn text_is_reescaped() {
        let out = sanitize_html("a &lt; b");
        assert_eq!(out, "a &lt; b");
    }
}
