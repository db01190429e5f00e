use serde_json::Value;

/// Body of a structured-form request: either plain text carried
/// verbatim, or a JSON value that gets normalized to its compact text
/// form at the parser boundary. Downstream components only ever see
/// the text shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Structured(Value),
}

impl RequestBody {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => RequestBody::Text(text),
            other => RequestBody::Structured(other),
        }
    }

    /// Canonical text form stored on the `RequestSpec`.
    pub fn into_text(self) -> String {
        match self {
            RequestBody::Text(text) => text,
            // Value serialization cannot fail for values that came out
            // of a successful parse.
            RequestBody::Structured(value) => value.to_string(),
        }
    }
}
