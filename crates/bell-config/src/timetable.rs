//! Timetable defaults.

use serde::{Deserialize, Serialize};

fn default_weekly_day_ids() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimetableConfig {
    /// Day ids a weekly model uses when a definition does not list its own.
    /// Position 0 is Monday.
    #[serde(default = "default_weekly_day_ids")]
    pub weekly_day_ids: Vec<String>,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            weekly_day_ids: default_weekly_day_ids(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_defaults_cover_school_week() {
        let config = TimetableConfig::default();
        assert_eq!(config.weekly_day_ids.len(), 5);
        assert_eq!(config.weekly_day_ids[0], "Monday");
        assert_eq!(config.weekly_day_ids[4], "Friday");
    }
}
