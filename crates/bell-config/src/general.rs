//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// IANA name of the observer timezone (e.g. "Europe/Vilnius").
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// `tracing` filter directive used when `BELL_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            log_filter: default_log_filter(),
        }
    }
}

impl GeneralConfig {
    /// Parse `timezone` against the IANA database.
    ///
    /// # Errors
    ///
    /// Returns the unparsed name if it is not a known timezone.
    pub fn tz(&self) -> Result<chrono_tz::Tz, String> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|_| self.timezone.clone())
    }
}
