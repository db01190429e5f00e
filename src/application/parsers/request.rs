use crate::domain::entities::RequestSpec;
use crate::domain::value_objects::RequestBody;
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static TOOL_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^curl\s+").unwrap());
static URL_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'](https?://[^"']+)["']"#).unwrap());
static URL_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(https?://[^\s"']+)"#).unwrap());
static METHOD_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-X\s+([A-Za-z]+)").unwrap());
static HEADER_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:-H|--header)\s+(?:"([^"]+)"|'([^']+)')"#).unwrap()
});
// Specific data flags first so they win over -d/--data when a malformed
// command carries both.
static DATA_FLAGS: LazyLock<[DataFlag; 2]> = LazyLock::new(|| {
    [
        DataFlag::new(r"(?:--data-raw|--data-binary)"),
        DataFlag::new(r"(?:--data|-d)"),
    ]
});

struct DataFlag {
    single: Regex,
    double: Regex,
    bare: Regex,
}

impl DataFlag {
    fn new(flags: &str) -> Self {
        Self {
            single: Regex::new(&format!(r"{flags}\s+'([^']*)'")).unwrap(),
            double: Regex::new(&format!(r#"{flags}\s+"([^"]*)""#)).unwrap(),
            bare: Regex::new(&format!(r"{flags}\s+(\S+)")).unwrap(),
        }
    }

    fn value<'t>(&self, command: &'t str) -> Option<&'t str> {
        self.single
            .captures(command)
            .or_else(|| self.double.captures(command))
            .or_else(|| self.bare.captures(command))
            .map(|c| c.get(1).unwrap().as_str())
    }
}

/// Turns raw request-file text into a canonical [`RequestSpec`].
///
/// Two dialects are accepted: a JSON object with a `url` field, and a
/// curl-style command line. `None` means no request could be recovered;
/// there is no partially-valid result.
pub fn parse(text: &str) -> Option<RequestSpec> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Some(spec) = parse_structured(trimmed) {
            return Some(spec);
        }
        debug!("input is not a structured request, trying the curl dialect");
    }
    parse_curl(trimmed)
}

/// JSON object form: required `url`, optional `method` / `headers` /
/// `body`. A decode failure or a missing `url` is not fatal; the caller
/// falls through to the curl dialect.
fn parse_structured(text: &str) -> Option<RequestSpec> {
    let value: Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;
    let url = object.get("url")?.as_str()?;
    if url.is_empty() {
        return None;
    }

    let method = object
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or("GET")
        .to_uppercase();

    let mut headers = HashMap::new();
    if let Some(map) = object.get("headers").and_then(Value::as_object) {
        for (key, value) in map {
            if let Some(value) = value.as_str() {
                headers.insert(key.clone(), value.to_string());
            }
        }
    }

    let body = object
        .get("body")
        .filter(|v| !v.is_null())
        .map(|v| RequestBody::from_value(v.clone()).into_text());

    Some(RequestSpec {
        method,
        url: url.to_string(),
        headers,
        body,
    })
}

/// curl command form. Quoting is assumed to be simple and single-level;
/// nested or escaped quotes are a known limitation.
fn parse_curl(text: &str) -> Option<RequestSpec> {
    let command = WHITESPACE.replace_all(text, " ");
    let command = TOOL_PREFIX.replace(command.trim(), "");

    let url = extract_url(&command)?;

    let method = METHOD_FLAG
        .captures(&command)
        .map(|c| c[1].to_uppercase())
        .unwrap_or_else(|| "GET".to_string());

    let mut headers = HashMap::new();
    for captures in HEADER_FLAG.captures_iter(&command) {
        let raw = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        // A value with no colon is skipped, not fatal.
        if let Some((key, value)) = raw.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    let body = DATA_FLAGS
        .iter()
        .find_map(|flag| flag.value(&command))
        .map(str::to_string);

    Some(RequestSpec {
        method,
        url,
        headers,
        body,
    })
}

/// Quoted URL tokens win over bare ones when both match at the same
/// spot; otherwise the earliest match by position is taken.
fn extract_url(command: &str) -> Option<String> {
    let quoted = URL_QUOTED.captures(command);
    let bare = URL_BARE.find(command);
    match (quoted, bare) {
        (Some(q), Some(b)) => {
            let q_start = q.get(0).unwrap().start();
            if q_start <= b.start() {
                Some(q[1].to_string())
            } else {
                Some(b.as_str().to_string())
            }
        }
        (Some(q), None) => Some(q[1].to_string()),
        (None, Some(b)) => Some(b.as_str().to_string()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_form_with_url_only_defaults_to_get() {
        let spec = parse(r#"{"url": "https://api.example.com/items"}"#).unwrap();
        assert_eq!(spec.url, "https://api.example.com/items");
        assert_eq!(spec.method, "GET");
        assert!(spec.headers.is_empty());
        assert!(spec.body.is_none());
    }

    #[test]
    fn structured_form_carries_method_headers_and_text_body() {
        let text = json!({
            "url": "https://api.example.com/items",
            "method": "post",
            "headers": {"Authorization": "Bearer tok"},
            "body": "raw payload"
        })
        .to_string();
        let spec = parse(&text).unwrap();
        assert_eq!(spec.method, "POST");
        assert_eq!(spec.header("Authorization"), Some("Bearer tok"));
        assert_eq!(spec.body.as_deref(), Some("raw payload"));
    }

    #[test]
    fn structured_body_value_is_serialized_to_text() {
        let text = json!({
            "url": "https://api.example.com/items",
            "body": {"name": "widget"}
        })
        .to_string();
        let spec = parse(&text).unwrap();
        assert_eq!(spec.body.as_deref(), Some(r#"{"name":"widget"}"#));
    }

    #[test]
    fn invalid_json_falls_through_to_curl_dialect() {
        let spec = parse(r#"{ not json } curl https://example.com/x"#).unwrap();
        assert_eq!(spec.url, "https://example.com/x");
    }

    #[test]
    fn json_without_url_falls_through() {
        assert!(parse(r#"{"method": "GET"}"#).is_none());
    }

    #[test]
    fn quoted_url_without_method_defaults_to_get() {
        let spec = parse(r#"curl "https://a.b/c""#).unwrap();
        assert_eq!(spec.url, "https://a.b/c");
        assert_eq!(spec.method, "GET");
    }

    #[test]
    fn bare_url_and_explicit_method() {
        let spec = parse("curl -X delete https://a.b/items/1").unwrap();
        assert_eq!(spec.method, "DELETE");
        assert_eq!(spec.url, "https://a.b/items/1");
    }

    #[test]
    fn headers_are_split_on_first_colon() {
        let spec = parse(
            r#"curl -H "Content-Type: application/json" --header 'X-Time: 12:30' https://a.b/"#,
        )
        .unwrap();
        assert_eq!(spec.header("Content-Type"), Some("application/json"));
        assert_eq!(spec.header("X-Time"), Some("12:30"));
    }

    #[test]
    fn header_without_colon_is_skipped() {
        let spec = parse(r#"curl -H "NotAHeader" https://a.b/"#).unwrap();
        assert!(spec.headers.is_empty());
    }

    #[test]
    fn body_from_data_flag_prefers_quotes() {
        let spec = parse(r#"curl -d '{"a":1}' https://a.b/"#).unwrap();
        assert_eq!(spec.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn data_raw_wins_over_generic_data() {
        let spec = parse(r#"curl -d 'ignored' --data-raw 'kept' https://a.b/"#).unwrap();
        assert_eq!(spec.body.as_deref(), Some("kept"));
    }

    #[test]
    fn unquoted_data_token_is_accepted() {
        let spec = parse("curl --data token=abc https://a.b/").unwrap();
        assert_eq!(spec.body.as_deref(), Some("token=abc"));
    }

    #[test]
    fn leading_tool_name_is_optional() {
        let spec = parse(r#"-X POST "https://a.b/c""#).unwrap();
        assert_eq!(spec.method, "POST");
        assert_eq!(spec.url, "https://a.b/c");
    }

    #[test]
    fn command_without_url_is_a_parse_failure() {
        assert!(parse("curl -X POST -d 'x'").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn multiline_whitespace_is_collapsed() {
        let spec = parse("curl   -X POST\n\t 'https://a.b/c'").unwrap();
        assert_eq!(spec.method, "POST");
        assert_eq!(spec.url, "https://a.b/c");
    }
}
