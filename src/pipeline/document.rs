//! Turns raw model output into a deliverable HTML document.
//!
//! The output always has exactly one `<head>` and one `<body>`, both closed,
//! inside a single `<html>` element. Missing elements are generated and
//! elements cut off by a truncated reply are closed.

use html_escape::encode_text;

const DOCTYPE: &str = "<!DOCTYPE html>";

pub fn finish(raw: &str, title: &str, lang: &str) -> String {
    let lower = raw.to_ascii_lowercase();

    let (open, content, content_lower) = match open_html_tag(raw, &lower) {
        Some((open, rest_start)) => (open, &raw[rest_start..], &lower[rest_start..]),
        None => (format!("<html lang=\"{lang}\">"), raw, lower.as_str()),
    };
    let end = content_lower.find("</html>").unwrap_or(content.len());
    let (content, content_lower) = (&content[..end], &content_lower[..end]);

    let body_at = find_tag(content_lower, "body");
    let head_at = find_tag(content_lower, "head").filter(|h| body_at.is_none_or(|b| *h < b));

    let (head, head_end, head_closed) = match head_at {
        Some(start) => {
            let limit = body_at.unwrap_or(content.len());
            match content_lower[start..limit].find("</head>") {
                Some(close) => {
                    let end = start + close + "</head>".len();
                    (content[start..end].to_string(), end, true)
                }
                None => (format!("{}\n</head>", content[start..limit].trim_end()), limit, false),
            }
        }
        None => (generated_head(title), 0, true),
    };

    let body = match body_at {
        Some(start) => {
            let element = match content_lower.rfind("</body>").filter(|e| *e > start) {
                Some(close) => content[start..close + "</body>".len()].to_string(),
                None => format!("{}\n</body>", content[start..].trim_end()),
            };
            // Markup a model put before <body> without a <head> belongs to the page.
            let stray = content[head_end..start].trim();
            if head_at.is_none() && stray.contains('<') {
                insert_after_open_tag(&element, stray)
            } else {
                element
            }
        }
        None if !head_closed => "<body>\n</body>".to_string(),
        None => format!("<body>\n{}\n</body>", content[head_end..].trim()),
    };

    format!("{DOCTYPE}\n{open}\n{head}\n{body}\n</html>")
}

/// Finds `<name>` or `<name ...>` case-insensitively; `<header>` never
/// matches `head`. `lower` must already be ASCII-lowercased.
fn find_tag(lower: &str, name: &str) -> Option<usize> {
    let needle = format!("<{name}");
    let mut from = 0;
    while let Some(pos) = lower[from..].find(&needle) {
        let at = from + pos;
        let next = lower[at + needle.len()..].chars().next();
        match next {
            Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => return Some(at),
            None => return Some(at),
            _ => from = at + needle.len(),
        }
    }
    None
}

/// Returns the `<html ...>` open tag and the offset just past it.
fn open_html_tag(raw: &str, lower: &str) -> Option<(String, usize)> {
    let start = find_tag(lower, "html")?;
    let close = lower[start..].find('>')?;
    let end = start + close + 1;
    Some((raw[start..end].to_string(), end))
}

fn insert_after_open_tag(element: &str, inner: &str) -> String {
    match element.find('>') {
        Some(gt) => format!("{}\n{}\n{}", &element[..=gt], inner, &element[gt + 1..]),
        None => element.to_string(),
    }
}

fn generated_head(title: &str) -> String {
    format!(
        "<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{}</title>\n</head>",
        encode_text(title)
    )
}
