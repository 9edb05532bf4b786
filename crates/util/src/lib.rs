//! Persistence, configuration loading and small helpers shared by the
//! historia crates.

pub mod config;
pub mod path_processing;
pub mod preferences;

pub use config::{ACCESS_KEY_ENV, ConfigError, load_site_config};
pub use path_processing::expand_tilde;
pub use preferences::{InMemoryStore, JsonPreferencesStore, KeyValueStore, PREFERENCES_PATH_ENV, StoreError};

use once_cell::sync::Lazy;
use regex::Regex;

static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization:\s*(?:client-id\s+|bearer\s+)?)([^\s,]+)",
        r"(?i)(client_id=)([^&\s]+)",
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for re in SECRET_PATTERNS.iter() {
        redacted = re
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}
