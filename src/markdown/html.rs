//! Markdown to HTML.
//!
//! Output is safe to embed directly: the only tags in it are the ones
//! pulldown-cmark generates for Markdown constructs. Raw HTML in the source is
//! emitted as escaped text and link or image destinations with a script-capable
//! scheme are replaced by `#`.

use super::options;
use pulldown_cmark::{CowStr, Event, Parser, Tag, html};

/// URL schemes allowed in link and image destinations.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Render a whole Markdown document to an HTML fragment.
pub fn render(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options()).map(sanitize_event);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Wrap a rendered fragment in a minimal self-contained page.
pub fn standalone_page(title: &str, body: &str, dark: bool) -> String {
    let (bg, fg, link) = if dark {
        ("#161b22", "#c9d1d9", "#58a6ff")
    } else {
        ("#ffffff", "#24292f", "#0969da")
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>\n\
         body {{ background: {bg}; color: {fg}; max-width: 52rem; margin: 2rem auto; \
         padding: 0 1rem; font-family: sans-serif; line-height: 1.6; }}\n\
         a {{ color: {link}; }}\n\
         pre, code {{ font-family: monospace; }}\n\
         table {{ border-collapse: collapse; }}\n\
         td, th {{ border: 1px solid {fg}; padding: .3rem .6rem; }}\n\
         </style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape_text(title),
    )
}

/// Escape text for use in element content or a quoted attribute.
pub fn escape_text(text: &str) -> String {
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

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_allowed_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Relative references and allow-listed schemes pass; anything else with a
/// scheme (`javascript:`, `data:`, `vbscript:` ...) does not.
pub fn is_allowed_url(url: &str) -> bool {
    let trimmed: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    let Some(colon) = trimmed.find(':') else {
        return true;
    };

    // A colon after the first path, query or fragment delimiter is not a scheme
    if trimmed[..colon].contains(['/', '?', '#']) {
        return true;
    }

    let scheme = trimmed[..colon].to_ascii_lowercase();
    ALLOWED_SCHEMES.contains(&scheme.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let html = render("# EC2\nDetails");
        assert!(html.contains("<h1>EC2</h1>"));
        assert!(html.contains("<p>Details</p>"));
    }

    #[test]
    fn test_deterministic() {
        let md = "## VPC\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done\n";
        assert_eq!(render(md), render(md));
        assert!(render(md).contains("<table>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render("Hello <script>alert(1)</script>\n\n<div onclick=\"x()\">hi</div>\n");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<div onclick"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_script_links_are_neutralized() {
        let html = render("[click](javascript:alert(1)) and ![img](data:image/png;base64,xx)");
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("data:image"));
        assert!(html.contains("href=\"#\""));
    }

    #[test]
    fn test_standalone_page_escapes_title() {
        let page = standalone_page("SNS & SQS <notes>", "<p>x</p>\n", true);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>SNS &amp; SQS &lt;notes&gt;</title>"));
        assert!(page.contains("<p>x</p>"));
    }

    #[test]
    fn test_allowed_urls() {
        assert!(is_allowed_url("https://aws.amazon.com/ec2/"));
        assert!(is_allowed_url("mailto:someone@example.com"));
        assert!(is_allowed_url("../GCP/VPC.md"));
        assert!(is_allowed_url("#section"));
        assert!(is_allowed_url("docs/page?x=a:b"));
        assert!(!is_allowed_url("JavaScript:alert(1)"));
        assert!(!is_allowed_url(" java\tscript:alert(1)"));
        assert!(!is_allowed_url("vbscript:msgbox"));
    }
}
