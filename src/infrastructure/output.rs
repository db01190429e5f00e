use crate::domain::entities::ResponseResult;
use colored::Colorize;
use log::warn;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static INTER_TAG_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());

/// Best-effort pretty-printing of a response body. JSON and XML bodies
/// are re-indented with two spaces; anything else, and anything that
/// fails to decode, is returned unchanged. Never fails past this
/// boundary.
pub fn format_body(body: &str, content_type: Option<&str>) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return body.to_string();
    }

    let declares = |needle: &str| {
        content_type
            .map(|ct| ct.to_ascii_lowercase().contains(needle))
            .unwrap_or(false)
    };

    if declares("json") || trimmed.starts_with('{') || trimmed.starts_with('[') {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => {
                // serde_json's pretty printer indents with two spaces.
                return serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string());
            }
            Err(error) => {
                if declares("json") {
                    warn!("body declared JSON but did not decode: {error}");
                }
                if !declares("xml") && !looks_like_xml(trimmed) {
                    return body.to_string();
                }
            }
        }
    }

    if declares("xml") || looks_like_xml(trimmed) {
        return format_xml(trimmed);
    }

    body.to_string()
}

fn looks_like_xml(trimmed: &str) -> bool {
    trimmed.starts_with('<') && trimmed.ends_with('>')
}

/// Streaming indentation pass: inter-tag whitespace is collapsed, then
/// each tag goes on its own line indented by nesting depth. Depth grows
/// after an opening tag and shrinks before a closing one; prologs,
/// comments, self-closers and lines that close their own tag leave it
/// alone.
fn format_xml(xml: &str) -> String {
    let compact = INTER_TAG_WHITESPACE.replace_all(xml, "><");
    let split = compact.replace("><", ">\n<");

    let mut depth: usize = 0;
    let mut out = String::new();
    for line in split.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("</") {
            depth = depth.saturating_sub(1);
        }
        out.push_str(&"  ".repeat(depth));
        out.push_str(line);
        out.push('\n');
        if opens_scope(line) {
            depth += 1;
        }
    }
    out.trim_end().to_string()
}

fn opens_scope(line: &str) -> bool {
    line.starts_with('<')
        && !line.starts_with("</")
        && !line.starts_with("<?")
        && !line.starts_with("<!")
        && !line.ends_with("/>")
        && !line.contains("</")
}

/// Canonical response document: reconstructed status line, header
/// lines, blank line, formatted body. Headers are sorted so the output
/// is stable run to run.
pub fn render_response(result: &ResponseResult, body: &str) -> String {
    let mut out = format!("HTTP/1.1 {} {}\n", result.status_code, result.status_text);
    let mut names: Vec<&String> = result.headers.keys().collect();
    names.sort();
    for name in names {
        out.push_str(&format!("{name}: {}\n", result.headers[name]));
    }
    out.push('\n');
    out.push_str(body);
    out
}

/// Prints a rendered response to stdout: headers cyan, structured
/// bodies green, everything else plain.
pub fn print_response(rendered: &str) {
    match rendered.split_once("\n\n") {
        Some((head, body)) => {
            println!("{}", head.cyan());
            println!();
            let trimmed = body.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') || trimmed.starts_with('<') {
                println!("{}", body.green());
            } else {
                println!("{}", body.white());
            }
        }
        None => println!("{}", rendered.white()),
    }
}
