use crate::domain::entities::{ResponseResult, status_text};
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static STATUS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HTTPSTATUS:(\d{3})").unwrap());
// The four status-line shapes curl emits depending on verbosity and
// protocol version, tried in this order: verbose-prefixed with phrase,
// verbose-prefixed bare, plain with phrase, plain bare.
static STATUS_LINES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    // [ \t] rather than \s keeps the match on one line.
    [
        Regex::new(r"(?m)^<[ \t]*HTTP/[0-9.]+[ \t]+(\d{3})[ \t]+([^\r\n]+)").unwrap(),
        Regex::new(r"(?m)^<[ \t]*HTTP/[0-9.]+[ \t]+(\d{3})").unwrap(),
        Regex::new(r"(?m)^HTTP/[0-9.]+[ \t]+(\d{3})[ \t]+([^\r\n]+)").unwrap(),
        Regex::new(r"(?m)^HTTP/[0-9.]+[ \t]+(\d{3})").unwrap(),
    ]
});
static STATUS_LINE_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HTTP/[0-9.]+[ \t]+\d{3}").unwrap());
static THREE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{3}").unwrap());

/// Reconstructs a [`ResponseResult`] from raw curl output.
///
/// The output shape varies with verbosity flags, platform and HTTP
/// version, so recovery is layered: the injected `HTTPSTATUS:` marker
/// is authoritative, then protocol status lines, then a bare 3-digit
/// scan of the first line. Header/body splitting prefers the blank-line
/// boundary and degrades to a line walk when the output has none.
pub fn parse(stdout: &str, stderr: &str) -> ResponseResult {
    // Some curl verbosity modes route the response to stderr.
    let source = if !stdout.trim().is_empty() {
        stdout
    } else if STATUS_LINE_ANYWHERE.is_match(stderr) {
        debug!("stdout empty, recovering response from stderr");
        stderr
    } else {
        ""
    };
    if source.trim().is_empty() {
        // Nothing recoverable; stderr still carries curl's diagnostics.
        let mut result = ResponseResult::unknown();
        if !stderr.trim().is_empty() {
            result.error = Some(stderr.trim().to_string());
        }
        return result;
    }

    let mut status_code: u16 = 0;
    let mut phrase: Option<String> = None;

    // The marker reflects curl's own final-hop status and wins over any
    // status line, which may belong to an intermediate redirect.
    let text = if let Some(captures) = STATUS_MARKER.captures(source) {
        status_code = captures[1].parse().unwrap_or(0);
        STATUS_MARKER.replace_all(source, "").into_owned()
    } else {
        source.to_string()
    };

    if status_code == 0 {
        for pattern in STATUS_LINES.iter() {
            if let Some(captures) = pattern.captures(&text) {
                status_code = captures[1].parse().unwrap_or(0);
                phrase = captures.get(2).map(|m| m.as_str().trim().to_string());
                break;
            }
        }
    }

    if status_code == 0 {
        if let Some(first_line) = text.lines().next() {
            if let Some(digits) = THREE_DIGITS.find(first_line) {
                status_code = digits.as_str().parse().unwrap_or(0);
            }
        }
    }

    let status_text = phrase
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| status_text(status_code).to_string());

    let (head, body) = split_headers_body(&text);
    let headers = parse_headers(&head);
    let body = STATUS_MARKER.replace_all(&body, "").trim().to_string();

    ResponseResult {
        status_code,
        status_text,
        headers,
        body,
        error: None,
    }
}

/// Blank-line boundary split, CRLF first. Without one, walk the lines:
/// the status line is skipped and the first non-empty line with no
/// colon starts the body.
fn split_headers_body(text: &str) -> (String, String) {
    if let Some(index) = text.find("\r\n\r\n") {
        return (text[..index].to_string(), text[index + 4..].to_string());
    }
    if let Some(index) = text.find("\n\n") {
        return (text[..index].to_string(), text[index + 2..].to_string());
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut body_start = lines.len();
    for (index, line) in lines.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() || STATUS_LINE_ANYWHERE.is_match(line) {
            continue;
        }
        if !line.contains(':') {
            body_start = index;
            break;
        }
    }
    (
        lines[..body_start].join("\n"),
        lines[body_start..].join("\n"),
    )
}

/// First-colon split per line; status lines and colon-less lines are
/// dropped silently.
fn parse_headers(head: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for line in head.lines() {
        let line = line.trim();
        if line.is_empty() || STATUS_LINE_ANYWHERE.is_match(line) {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    headers
}
