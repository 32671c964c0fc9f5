//! Standalone HTML page export
//!
//! Wraps a [`RenderedDocument`] into a complete HTML page with:
//! - Embedded CSS for the compiled markup
//! - The table of contents as a `<nav>` above the body (optional)
//! - Theme CSS for highlighted code blocks (optional)

use crate::render_config::PageOptions;
use crate::renderer::{escape_html, render_toc_html, RenderedDocument};
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during HTML export
#[derive(Error, Debug)]
pub enum HtmlExportError {
    #[error("IO error writing {path}: {source}", path = .path.display())]
    IoError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build a complete HTML page around a rendered document
///
/// # Parameters
/// * `doc` - The rendered document
/// * `page` - Page options (fallback title, whether to include the TOC)
/// * `title` - Page title; `page.title` is used when `None`
/// * `highlight_css` - Theme CSS for highlighted code, if the body was enhanced
///
/// # Returns
/// * `String` - The page markup
pub fn to_html_page(
    doc: &RenderedDocument,
    page: &PageOptions,
    title: Option<&str>,
    highlight_css: Option<&str>,
) -> String {
    let title = title.unwrap_or(&page.title);
    let mut output = String::new();

    write_html_header(&mut output, title, highlight_css);

    output.push_str("<body>\n");
    output.push_str("<div class=\"container\">\n");

    if page.include_toc {
        output.push_str(&render_toc_html(&doc.toc));
    }

    output.push_str("<article class=\"document-body\">\n");
    output.push_str(&doc.html);
    output.push_str("</article>\n");

    output.push_str("</div>\n");
    output.push_str("</body>\n");
    output.push_str("</html>\n");

    output
}

/// Write a page built by [`to_html_page`], creating parent directories
///
/// # Returns
/// * `Ok(())` - Successfully wrote the page
/// * `Err(HtmlExportError)` - Error creating directories or writing the file
pub fn write_html_page(page_html: &str, output_path: &Path) -> Result<(), HtmlExportError> {
    let io_error = |source| HtmlExportError::IoError {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut file = fs::File::create(output_path).map_err(io_error)?;
    file.write_all(page_html.as_bytes()).map_err(io_error)?;

    Ok(())
}

/// Write HTML header with CSS styling
fn write_html_header(output: &mut String, title: &str, highlight_css: Option<&str>) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"en\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    if let Some(css) = highlight_css {
        output.push_str(css);
    }
    output.push_str("</style>\n");
    output.push_str("</head>\n");
}

const CSS_STYLES: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    line-height: 1.6;
    color: #24292f;
    margin: 0;
}

.container {
    max-width: 860px;
    margin: 0 auto;
    padding: 2rem 1.5rem;
}

.table-of-contents {
    border-left: 3px solid #d0d7de;
    padding: 0.5rem 1rem;
    margin-bottom: 2rem;
}

.toc-title {
    font-size: 1rem;
    margin: 0 0 0.5rem;
}

.toc-list {
    list-style: none;
    margin: 0;
    padding-left: 0;
}

.toc-list .toc-list {
    padding-left: 1rem;
}

.toc-link {
    color: #57606a;
    text-decoration: none;
}

.document-body h1, .document-body h2, .document-body h3,
.document-body h4, .document-body h5, .document-body h6 {
    margin: 1.5em 0 0.5em;
    line-height: 1.25;
}

.heading-anchor {
    margin-left: 0.4em;
    color: #8c959f;
    text-decoration: none;
    visibility: hidden;
}

.document-body :hover > .heading-anchor {
    visibility: visible;
}

blockquote {
    margin: 1em 0;
    padding: 0 1em;
    color: #57606a;
    border-left: 4px solid #d0d7de;
}

code {
    font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace;
    font-size: 0.9em;
}

pre {
    background: #f6f8fa;
    border-radius: 6px;
    padding: 1em;
    overflow-x: auto;
}

pre[data-copyable] {
    position: relative;
}

table {
    border-collapse: collapse;
}

th, td {
    border: 1px solid #d0d7de;
    padding: 0.3em 0.8em;
}

img {
    max-width: 100%;
}

img[data-zoomable] {
    cursor: zoom-in;
}

a {
    color: #0969da;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::render;

    const DOC: &str = "# Intro\n\nSome *text*.\n\n## Details\n";

    #[test]
    fn test_page_wraps_body_and_toc() {
        let doc = render(DOC);
        let page = to_html_page(&doc, &PageOptions::default(), Some("A <b> title"), None);

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>A &lt;b&gt; title</title>"));
        assert!(page.contains("<nav class=\"table-of-contents\">"));
        assert!(page.contains("<a href=\"#details\" class=\"toc-link\">Details</a>"));
        assert!(page.contains(&doc.html));
        assert!(page.ends_with("</html>\n"));
    }

    #[test]
    fn test_page_without_toc_uses_default_title() {
        let options = PageOptions {
            include_toc: false,
            ..PageOptions::default()
        };
        let page = to_html_page(&render(DOC), &options, None, Some(".hl-x { color: red; }"));

        assert!(page.contains("<title>Document</title>"));
        assert!(!page.contains("table-of-contents\">"));
        assert!(page.contains(".hl-x { color: red; }"));
    }

    #[test]
    fn test_stylesheet_classes_are_emitted() {
        let mut config = crate::render_config::RendererConfig::default();
        config.headings.anchor_links = true;
        let doc = crate::renderer::Renderer::new(config).render(DOC);
        let page = to_html_page(&doc, &PageOptions::default(), None, None);
        let body = &page[page.find("<body>").unwrap()..];

        let selector = regex::Regex::new(r"\.([a-z][a-z-]*)").unwrap();
        for caps in selector.captures_iter(CSS_STYLES) {
            let class = &caps[1];
            assert!(
                body.contains(&format!("class=\"{}", class)) || body.contains(&format!(" {}\"", class)),
                "unused selector .{}",
                class
            );
        }
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/page.html");

        write_html_page("<html></html>", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
