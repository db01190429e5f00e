use crate::domain::entities::RequestSpec;

/// Marker appended to curl's stdout so the final-hop status code can be
/// recovered no matter what the response text looks like.
pub const STATUS_MARKER_FORMAT: &str = r"\nHTTPSTATUS:%{http_code}";

/// Builds the curl invocation for a [`RequestSpec`]. Pure and
/// deterministic: header inclusion (`-i`), silent with errors surfaced
/// (`-s -S`), the status marker via `-w`, and the URL as the final
/// token. The method flag is omitted for GET, curl's default.
pub fn build(spec: &RequestSpec) -> String {
    let mut command = String::from("curl -s -S -i");

    if !spec.method.eq_ignore_ascii_case("GET") {
        command.push_str(&format!(" -X {}", spec.method));
    }

    for (key, value) in &spec.headers {
        command.push_str(&format!(" -H \"{}\"", escape_double(&format!("{key}: {value}"))));
    }

    if let Some(body) = &spec.body {
        command.push_str(&format!(" -d '{}'", escape_single(body)));
    }

    command.push_str(&format!(" -w \"{STATUS_MARKER_FORMAT}\""));
    command.push_str(&format!(" \"{}\"", escape_double(&spec.url)));
    command
}

/// The shell keeps `\`, `"`, `$` and backtick active inside double
/// quotes; all four get a backslash.
fn escape_double(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}

/// Shell-safe single quoting: close, escaped quote, reopen.
fn escape_single(text: &str) -> String {
    text.replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RequestSpec;

    #[test]
    fn get_request_omits_method_flag() {
        let spec = RequestSpec::new("https://a.b/c");
        let command = build(&spec);
        assert_eq!(
            command,
            "curl -s -S -i -w \"\\nHTTPSTATUS:%{http_code}\" \"https://a.b/c\""
        );
    }

    #[test]
    fn non_get_method_is_explicit() {
        let mut spec = RequestSpec::new("https://a.b/c");
        spec.method = "POST".to_string();
        assert!(build(&spec).contains(" -X POST "));
    }

    #[test]
    fn headers_become_individual_flags() {
        let mut spec = RequestSpec::new("https://a.b/c");
        spec.headers
            .insert("Accept".to_string(), "application/json".to_string());
        assert!(build(&spec).contains(" -H \"Accept: application/json\""));
    }

    #[test]
    fn header_quotes_are_escaped() {
        let mut spec = RequestSpec::new("https://a.b/c");
        spec.headers
            .insert("X-Note".to_string(), "say \"hi\"".to_string());
        assert!(build(&spec).contains(r#" -H "X-Note: say \"hi\"""#));
    }

    #[test]
    fn shell_active_characters_are_neutralized_in_double_quotes() {
        let mut spec = RequestSpec::new("https://a.b/c?v=$HOME&b=`id`");
        spec.headers
            .insert("X-Path".to_string(), "C:\\temp".to_string());
        let command = build(&spec);
        assert!(command.ends_with(r#""https://a.b/c?v=\$HOME&b=\`id\`""#));
        assert!(command.contains(r#" -H "X-Path: C:\\temp""#));
    }

    #[test]
    fn body_single_quotes_are_shell_escaped() {
        let mut spec = RequestSpec::new("https://a.b/c");
        spec.body = Some("it's fine".to_string());
        assert!(build(&spec).contains(r" -d 'it'\''s fine'"));
    }

    #[test]
    fn url_is_the_final_token() {
        let mut spec = RequestSpec::new("https://a.b/c?q=1");
        spec.method = "PUT".to_string();
        spec.body = Some("{}".to_string());
        let command = build(&spec);
        assert!(command.ends_with("\"https://a.b/c?q=1\""));
    }
}
