use std::collections::HashMap;
use std::env;
use std::fs;
use std::time::Duration;

use crate::clients::ticktick_client::DEFAULT_BASE_URL;
use crate::errors::BotError;
use crate::service::deadline;
use crate::service::dispatcher::DispatcherConfig;
use crate::service::task_service::TaskApiSettings;

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Raw `KEY=VALUE` pairs read from a config file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, BotError> {
        let content = fs::read_to_string(path)
            .map_err(|e| BotError::Config(format!("Config file {}: {}", path, e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, BotError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(BotError::Config(format!("Invalid config line {}: {}", idx + 1, line)));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the process environment. Blank values count as unset.
    pub fn get_or_env(&self, key: &str) -> Option<String> {
        self.get(key)
            .or_else(|| env::var(key).ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: Option<String>,
    /// Guild channel whose every message is relayed; elsewhere only DMs and mentions are.
    pub relay_channel: Option<String>,
    pub task_api: TaskApiSettings,
    pub dispatcher: DispatcherConfig,
}

impl BotConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, BotError> {
        let app = match config_path {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        Self::from_lookup(|key| app.get_or_env(key))
    }

    pub fn from_lookup<F>(get_prop: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = get_prop("TICKTICK_ACCESS_TOKEN");
        let project_id = get_prop("TICKTICK_PROJECT_ID");

        let missing: Vec<&str> = [
            ("TICKTICK_ACCESS_TOKEN", &access_token),
            ("TICKTICK_PROJECT_ID", &project_id),
        ]
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();
        let (Some(access_token), Some(project_id)) = (access_token, project_id) else {
            return Err(BotError::Config(format!(
                "Missing required config values: {}",
                missing.join(", ")
            )));
        };

        let timezone_name = get_prop("TIMEZONE").unwrap_or(DEFAULT_TIMEZONE.to_string());
        let timezone = deadline::parse_timezone(&timezone_name)?;

        let request_timeout = match get_prop("REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(BotError::Config(format!(
                        "REQUEST_TIMEOUT_SECS must be a positive integer, got {}",
                        raw
                    )));
                }
            },
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let prefix_sender = match get_prop("TASK_SENDER_PREFIX") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                BotError::Config(format!("TASK_SENDER_PREFIX must be true or false, got {}", raw))
            })?,
            None => false,
        };

        Ok(Self {
            discord_token: get_prop("DISCORD_CLIENT_SECRET"),
            relay_channel: get_prop("RELAY_CHANNEL_ID"),
            task_api: TaskApiSettings {
                base_url: get_prop("TICKTICK_BASE_URL").unwrap_or(DEFAULT_BASE_URL.to_string()),
                access_token,
                request_timeout,
            },
            dispatcher: DispatcherConfig {
                project_id,
                timezone,
                notify_target: get_prop("NOTIFY_CHANNEL_ID"),
                prefix_sender,
            },
        })
    }

    pub fn require_discord_token(&self) -> Result<&str, BotError> {
        self.discord_token
            .as_deref()
            .ok_or_else(|| BotError::Config("DISCORD_CLIENT_SECRET must be set for bot mode".to_string()))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
