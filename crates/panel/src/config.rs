use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub database: DatabaseSettings,
    pub drafts: DraftSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    // 宿主会话令牌；缺省时面板以未登录状态运行 (只读)
    pub bearer_token: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Deserialize, Clone)]
pub struct DraftSettings {
    pub ttl_hours: i64,
    pub debounce_ms: u64,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let env_map = collect_env_vars();

        let s = config::Config::builder()
            .set_default("api.base_url", "http://127.0.0.1:3000")?
            .set_default("api.timeout_secs", 10)?
            .set_default("database.url", "sqlite://data/drafts.db")?
            .set_default("drafts.ttl_hours", storage::DRAFT_TTL_HOURS)?
            .set_default("drafts.debounce_ms", 800)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(config::File::from_str(
                &serde_json::to_string(&env_map)
                    .expect("Environment variables should serialize to JSON"),
                config::FileFormat::Json,
            ))
            .build()?;

        s.try_deserialize()
    }
}

fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("PANEL_"))
        .map(|(k, v)| {
            let new_key = k
                .trim_start_matches("PANEL_")
                .replace("__", ".")
                .to_lowercase();
            (new_key, v)
        })
        .collect()
}
