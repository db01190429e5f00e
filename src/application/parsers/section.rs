use crate::domain::entities::RequestSection;
use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^##\s+(.+)$").unwrap());
static CURL_SUBSTRING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"curl\s+.+").unwrap());

/// Splits a multi-request document into `## <title>` delimited
/// sections. Each heading closes the previous section; the final one
/// runs to the last line. No headings means no sections, and the caller
/// treats the whole file as a single implicit request.
pub fn sections(document: &str) -> Vec<RequestSection> {
    let lines: Vec<&str> = document.lines().collect();
    let mut sections: Vec<RequestSection> = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if let Some(captures) = HEADING.captures(line) {
            if let Some(previous) = sections.last_mut() {
                previous.end_line = index - 1;
            }
            sections.push(RequestSection {
                title: captures[1].trim().to_string(),
                title_line: index,
                start_line: index,
                end_line: lines.len().saturating_sub(1),
            });
        }
    }
    sections
}

/// Non-empty, non-heading lines of the range joined with single
/// spaces, each with at most one trailing line-continuation backslash
/// removed.
pub fn fold_lines(document: &str, start_line: usize, end_line: usize) -> String {
    let lines: Vec<&str> = document.lines().collect();
    if start_line >= lines.len() {
        return String::new();
    }
    let end_line = end_line.min(lines.len() - 1);

    let mut parts: Vec<&str> = Vec::new();
    for line in &lines[start_line..=end_line] {
        if HEADING.is_match(line) {
            continue;
        }
        let line = line.trim();
        let stripped = line.strip_suffix('\\').unwrap_or(line).trim_end();
        if !stripped.is_empty() {
            parts.push(stripped);
        }
    }
    parts.join(" ")
}

/// Recovers the command text of one section: folds its lines, then
/// requires a curl command. If the folded text is not itself a curl
/// command, a curl-shaped substring is searched for instead; `None`
/// when neither yields text.
pub fn extract(document: &str, start_line: usize, end_line: usize) -> Option<String> {
    let joined = fold_lines(document, start_line, end_line);

    if joined.trim_start().starts_with("curl") {
        return Some(joined);
    }
    CURL_SUBSTRING
        .find(&joined)
        .map(|m| m.as_str().to_string())
}
