//! Markdown link and image snippets that are safe inside pipe-table cells.
//!
//! A bare `|` inside a cell would split it, so display text escapes it as
//! `\|` and URLs percent-encode it as `%7C`.

/// Escape `|` in plain cell content so it stays inside its cell.
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Escape display text (link text or image alt text).
fn escape_text(text: &str) -> String {
    escape_cell(text).trim().to_string()
}

/// Escape a link or image target.
fn escape_url(url: &str) -> String {
    url.replace('|', "%7C").trim().to_string()
}

/// Create a Markdown link: `[text](url)`.
///
/// # Examples
///
/// ```
/// use readme_manager::link::create_link;
///
/// assert_eq!(create_link("a | b", "x|y"), "[a \\| b](x%7Cy)");
/// ```
pub fn create_link(text: &str, url: &str) -> String {
    format!("[{}]({})", escape_text(text), escape_url(url))
}

/// Create a Markdown image, optionally wrapped in a link.
///
/// Returns `![alt](image_url)`, or `[![alt](image_url)](link_url)` when a
/// non-empty `link_url` is given.
pub fn create_image_link(alt_text: &str, image_url: &str, link_url: Option<&str>) -> String {
    let image = format!("![{}]({})", escape_text(alt_text), escape_url(image_url));

    match link_url {
        Some(link) if !link.is_empty() => format!("[{}]({})", image, escape_url(link)),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_create_link_plain() {
        assert_eq!(
            create_link("Transforming Asset Servicing", "docs/asset.pdf"),
            "[Transforming Asset Servicing](docs/asset.pdf)"
        );
    }

    #[test]
    fn test_escape_cell_keeps_spacing() {
        assert_eq!(escape_cell(" x | y "), " x \\| y ");
        assert_eq!(escape_cell("plain"), "plain");
    }

    #[test]
    fn test_create_link_escapes_pipes() {
        assert_eq!(create_link("A|B", "http://x/?q=a|b"), "[A\\|B](http://x/?q=a%7Cb)");
    }

    #[test]
    fn test_create_link_trims_whitespace() {
        assert_eq!(create_link("  Title \n", " url "), "[Title](url)");
    }

    #[test]
    fn test_image_without_link() {
        assert_eq!(
            create_image_link("logo", "media/logo.png", None),
            "![logo](media/logo.png)"
        );
    }

    #[test]
    fn test_image_with_link() {
        assert_eq!(
            create_image_link("a|b", "img|1.png", Some("https://x.org/a|b")),
            "[![a\\|b](img%7C1.png)](https://x.org/a%7Cb)"
        );
    }

    #[test]
    fn test_image_with_empty_link_is_bare() {
        assert_eq!(create_image_link("logo", "l.png", Some("")), "![logo](l.png)");
    }

    proptest! {
        #[test]
        fn prop_link_matches_escaped_form(
            text in "[a-zA-Z0-9|]{0,20}",
            url in "[a-z0-9/.|]{0,20}"
        ) {
            let expected = format!(
                "[{}]({})",
                text.replace('|', "\\|"),
                url.replace('|', "%7C")
            );
            prop_assert_eq!(create_link(&text, &url), expected);
        }

        #[test]
        fn prop_url_never_contains_raw_pipe(url in ".{0,30}") {
            let link = create_link("t", &url);
            let target = &link[link.find("](").unwrap() + 2..link.len() - 1];
            prop_assert!(!target.contains('|'));
        }
    }
}
