use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Per-probe toggles. An unset toggle means enabled; the default run
/// attaches both hooks.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProbeToggles {
    pub exec_trace: Option<bool>,
    pub flow_classify: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub probes: ProbeToggles,
}

impl Settings {
    /// Reads settings from the process environment, e.g.
    /// `PROBES__EXEC_TRACE=false`. A `.env` file is honored when present.
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let s = Config::builder()
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        s.try_deserialize()
    }

    pub fn exec_trace_enabled(&self) -> bool {
        self.probes.exec_trace.unwrap_or(true)
    }

    pub fn flow_classify_enabled(&self) -> bool {
        self.probes.flow_classify.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_load_settings() {
        unsafe {
            std::env::set_var("PROBES__EXEC_TRACE", "false");
            std::env::set_var("PROBES__FLOW_CLASSIFY", "true");
        }

        let settings = Settings::new().expect("Failed to load settings");

        assert_eq!(settings.probes.exec_trace, Some(false));
        assert_eq!(settings.probes.flow_classify, Some(true));
        assert!(!settings.exec_trace_enabled());
        assert!(settings.flow_classify_enabled());

        unsafe {
            std::env::remove_var("PROBES__EXEC_TRACE");
            std::env::remove_var("PROBES__FLOW_CLASSIFY");
        }
    }

    #[test]
    #[serial]
    fn test_unset_toggles_default_to_enabled() {
        unsafe {
            std::env::remove_var("PROBES__EXEC_TRACE");
            std::env::remove_var("PROBES__FLOW_CLASSIFY");
        }

        let settings = Settings::new().expect("Failed to load settings");

        assert!(settings.exec_trace_enabled());
        assert!(settings.flow_classify_enabled());
    }
}
