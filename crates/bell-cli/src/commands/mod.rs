use anyhow::Context;
use bell_config::BellConfig;
use bell_timetable::{Tz, parse_timezone};

use crate::cli::{Commands, GlobalFlags};

pub mod meetings;
pub mod timespan;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: &Commands, config: &BellConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Timespan(args) => timespan::handle(args, config, flags),
        Commands::Meetings(args) => meetings::handle(args, config, flags),
    }
}

/// The `--timezone` flag, else `general.timezone` from config.
fn observer_timezone(flags: &GlobalFlags, config: &BellConfig) -> anyhow::Result<Tz> {
    let name = flags.timezone.as_deref().unwrap_or(&config.general.timezone);
    parse_timezone(name).with_context(|| format!("cannot use timezone '{name}'"))
}

#[cfg(test)]
mod tests {
    use bell_config::BellConfig;
    use bell_timetable::Tz;

    use super::observer_timezone;
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags(timezone: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            quiet: false,
            verbose: false,
            timezone: timezone.map(str::to_string),
        }
    }

    #[test]
    fn flag_beats_config() {
        let mut config = BellConfig::default();
        config.general.timezone = "Europe/Vilnius".to_string();
        assert_eq!(observer_timezone(&flags(None), &config).unwrap(), Tz::Europe__Vilnius);
        assert_eq!(observer_timezone(&flags(Some("UTC")), &config).unwrap(), Tz::UTC);
    }

    #[test]
    fn unknown_flag_value_fails() {
        let err = observer_timezone(&flags(Some("Moon/Base")), &BellConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "cannot use timezone 'Moon/Base'");
    }
}
