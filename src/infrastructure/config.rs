use serde::Deserialize;

/// Execution configuration. Defaults: ten-second timeout, responses
/// persisted next to the request file. Deserializable so a host can
/// hand one over as JSON; the CLI overrides field by field.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_save_to_file")]
    pub save_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            save_to_file: default_save_to_file(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_save_to_file() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = Config::default();
        assert_eq!(config.timeout_secs, 10);
        assert!(config.save_to_file);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: Config = serde_json::from_str(r#"{"timeout_secs": 30}"#).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.save_to_file);
    }
}
