use std::env;

/// Application configuration loaded from environment variables.
///
/// Pipeline knobs (sample size, batch size, worker counts) come from the CLI;
/// only credentials and endpoint overrides live here.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth client id sent as the `Client-Id` header.
    pub client_id: String,
    /// App access token sent as the bearer token.
    pub bearer_token: String,
    /// Base URL of the Helix-style API. Overridable for local stubs.
    pub helix_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            client_id: required_env("TWITCH_CLIENT_ID"),
            bearer_token: required_env("TWITCH_BEARER_TOKEN"),
            helix_base_url: env::var("HELIX_BASE_URL")
                .unwrap_or_else(|_| "https://api.twitch.tv/helix".to_string()),
        }
    }

    /// Log a redacted view of the config so startup issues are debuggable
    /// without leaking credentials.
    pub fn log_redacted(&self) {
        tracing::info!(
            client_id = %redact(&self.client_id),
            base_url = %self.helix_base_url,
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn redact(value: &str) -> String {
    if value.chars().count() <= 4 {
        "****".to_string()
    } else {
        let head: String = value.chars().take(4).collect();
        format!("{head}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_keeps_short_values_opaque() {
        assert_eq!(redact("abc"), "****");
        assert_eq!(redact("abcdefgh"), "abcd****");
    }
}
