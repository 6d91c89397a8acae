use serde::{Deserialize, Serialize};

/// Scheduler policy, loaded from `{data_dir}/scheduler_config.json`.
/// In tests, use SchedulerConfig::default_test().
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Weeks scheduled from the first Monday of the year.
    #[serde(default = "default_weeks_per_year")]
    pub weeks_per_year:   u32,
    /// Names containing this token are refused by the roster.
    #[serde(default = "default_reserved_token")]
    pub reserved_token:   String,
    /// Permit generating schedules for years before the current one.
    #[serde(default)]
    pub allow_past_years: bool,
    /// Roster installed by the test-mode shortcut.
    #[serde(default)]
    pub demo_roster:      Vec<String>,
}

fn default_weeks_per_year() -> u32 {
    52
}

fn default_reserved_token() -> String {
    "devintest".into()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            weeks_per_year:   default_weeks_per_year(),
            reserved_token:   default_reserved_token(),
            allow_past_years: false,
            demo_roster:      demo_roster(),
        }
    }
}

impl SchedulerConfig {
    /// Load from the data/ directory. A missing file means defaults.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/scheduler_config.json");
        if !std::path::Path::new(&path).exists() {
            log::info!("config: {path} not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.demo_roster.is_empty() {
            config.demo_roster = demo_roster();
        }
        if config.weeks_per_year == 0 {
            anyhow::bail!("{path}: weeks_per_year must be at least 1");
        }
        Ok(config)
    }

    /// Config with hardcoded defaults for use in tests: past years allowed
    /// so fixed calendar years can be generated.
    pub fn default_test() -> Self {
        Self {
            allow_past_years: true,
            ..Self::default()
        }
    }
}

fn demo_roster() -> Vec<String> {
    [
        "Alice Smith", "Bob Johnson", "Carol Williams", "David Jones",
        "Eve Brown", "Frank Miller", "Grace Wilson", "Hank Moore",
        "Ivy Taylor", "Jack Anderson", "Kathy Thomas", "Leo Jackson",
        "Mona White", "Nate Harris", "Olivia Martin", "Paul Thompson",
        "Quincy Garcia", "Rachel Martinez",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
