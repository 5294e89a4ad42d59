//! HTML page rendering
//!
//! One module per page, each exposing a `render` function over the data
//! records the route handler assembled. Pages share a common layout with
//! the clear-cache button; all dynamic text goes through [`escape`].

pub mod customers;
pub mod orders;
pub mod product_orders;

pub use customers::render as render_customers;
pub use orders::render as render_orders;
pub use product_orders::render as render_product_orders;

/// Escapes text for safe interpolation into HTML
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps page content in the shared document layout
pub(crate) fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 0.4em 0.6em; text-align: left; }}
th {{ background: #f0f0f0; }}
.button {{ display: inline-block; padding: 0.4em 0.8em; background: #3366cc; color: #fff; text-decoration: none; border-radius: 3px; }}
.meta {{ color: #666; font-size: 0.9em; }}
</style>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}

/// The clear-cache button shown on every page
pub(crate) fn clear_cache_button() -> &'static str {
    r#"<a href="/clear_cache" class="button">Clear cache &amp; reload data</a>"#
}

/// The "last updated" line shown on cached listings
pub(crate) fn last_updated_line(last_updated: Option<&str>) -> String {
    format!(
        r#"<p class="meta">Data last updated: {}</p>"#,
        escape(last_updated.unwrap_or("Never"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_replaces_html_metacharacters() {
        assert_eq!(
            escape(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_leaves_plain_text_alone() {
        assert_eq!(escape("Red, Large"), "Red, Large");
    }

    #[test]
    fn test_last_updated_line_defaults_to_never() {
        assert!(last_updated_line(None).contains("Never"));
        assert!(last_updated_line(Some("2024-10-01T00:00:00Z")).contains("2024-10-01"));
    }
}
