use std::collections::HashMap;

/// Canonical HTTP request recovered from a request file, whichever
/// dialect it was authored in.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl RequestSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Header lookup by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Canonical HTTP response reconstructed from raw curl output.
///
/// `status_code` 0 means the output carried no recoverable status;
/// `status_text` is `"Unknown"` whenever neither the output nor the
/// lookup table resolves a phrase. `error` holds curl's stderr
/// diagnostics when no response could be recovered at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseResult {
    pub status_code: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub error: Option<String>,
}

impl ResponseResult {
    pub fn unknown() -> Self {
        Self {
            status_code: 0,
            status_text: "Unknown".to_string(),
            headers: HashMap::new(),
            body: String::new(),
            error: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// One `## <title>` heading-delimited block of a multi-request file.
/// All line numbers are 0-based and inclusive; recomputed on every
/// parse, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSection {
    pub title: String,
    pub title_line: usize,
    pub start_line: usize,
    pub end_line: usize,
}

/// Status phrase for the common codes curl runs encounter; everything
/// else resolves to `Unknown`.
pub fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_maps_common_codes() {
        assert_eq!(status_text(200), "OK");
        assert_eq!(status_text(404), "Not Found");
        assert_eq!(status_text(422), "Unprocessable Entity");
        assert_eq!(status_text(503), "Service Unavailable");
    }

    #[test]
    fn status_text_falls_back_to_unknown() {
        assert_eq!(status_text(0), "Unknown");
        assert_eq!(status_text(418), "Unknown");
        assert_eq!(status_text(301), "Unknown");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut spec = RequestSpec::new("https://example.com");
        spec.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        assert_eq!(spec.header("content-type"), Some("application/json"));
        assert_eq!(spec.header("Accept"), None);
    }
}
