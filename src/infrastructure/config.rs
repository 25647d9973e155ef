use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    pub server: ServerSettings,
    pub metrics_api: MetricsApiSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsApiSettings {
    pub base_url: String,
    /// Path template for plain numeric series, e.g. `/api/chain-stats/${entity}?metric=${metric}`
    pub series_path: String,
    /// Path template for ICM message counts
    pub icm_path: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChartSettings {
    /// Overrides the default series palette when non-empty
    #[serde(default)]
    pub palette: Vec<String>,
}

pub fn load_stats_config() -> anyhow::Result<StatsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/stats"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a path
pub fn prepare_path(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
