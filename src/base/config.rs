//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::Res;

/// Slack caps the number of options in a single select menu.
const MAX_MENU_ITEMS: usize = 100;

/// Default port for the interaction callback server.
fn default_port() -> u16 {
    3000
}

/// Default address for the interaction callback server.
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Default path Slack posts interaction callbacks to.
fn default_interaction_path() -> String {
    "/interaction".to_string()
}

/// Default path Slack posts Events API deliveries to.
fn default_events_path() -> String {
    "/events".to_string()
}

/// Default word that must follow the bot mention.
fn default_trigger_word() -> String {
    "hey".to_string()
}

/// Default prompt shown above the menu.
fn default_menu_prompt() -> String {
    "Which beer do you want? :beer:".to_string()
}

/// Default menu items.
fn default_menu_items() -> Vec<String> {
    ["Asahi Super Dry", "Kirin Lager Beer", "Sapporo Black Label", "Suntory Malts", "Yona Yona Ale"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Default Slack Web API base URL.
fn default_slack_api_base() -> String {
    "https://slack.com/api".to_string()
}

/// Configuration for the order-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Slack bot token used for Web API calls (`ORDER_BOT_SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Token Slack includes in every interaction callback and event (`ORDER_BOT_VERIFICATION_TOKEN`).
    pub verification_token: String,
    /// The only channel the bot answers mentions in (`ORDER_BOT_CHANNEL_ID`).
    pub channel_id: String,
    /// Bot user ID (`ORDER_BOT_BOT_USER_ID`); resolved through `auth.test` when absent.
    #[serde(default)]
    pub bot_user_id: Option<String>,
    /// Port of the callback server (`ORDER_BOT_PORT`).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Address of the callback server (`ORDER_BOT_BIND_ADDRESS`).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Path Slack posts interaction callbacks to (`ORDER_BOT_INTERACTION_PATH`).
    #[serde(default = "default_interaction_path")]
    pub interaction_path: String,
    /// Path Slack posts Events API deliveries to (`ORDER_BOT_EVENTS_PATH`).
    #[serde(default = "default_events_path")]
    pub events_path: String,
    /// Word that must follow the bot mention to open the menu (`ORDER_BOT_TRIGGER_WORD`).
    #[serde(default = "default_trigger_word")]
    pub trigger_word: String,
    /// Text shown above the menu (`ORDER_BOT_MENU_PROMPT`).
    #[serde(default = "default_menu_prompt")]
    pub menu_prompt: String,
    /// Items offered in the menu select (`ORDER_BOT_MENU_ITEMS`).
    #[serde(default = "default_menu_items")]
    pub menu_items: Vec<String>,
    /// Slack Web API base URL (`ORDER_BOT_SLACK_API_BASE`).
    #[serde(default = "default_slack_api_base")]
    pub slack_api_base: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            slack_bot_token: String::new(),
            verification_token: String::new(),
            channel_id: String::new(),
            bot_user_id: None,
            port: default_port(),
            bind_address: default_bind_address(),
            interaction_path: default_interaction_path(),
            events_path: default_events_path(),
            trigger_word: default_trigger_word(),
            menu_prompt: default_menu_prompt(),
            menu_items: default_menu_items(),
            slack_api_base: default_slack_api_base(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        Self::load_with(environment(), explicit_path)
    }

    fn load_with(env: config::Environment, explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(env);

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks the loaded values for anything Slack would reject later.
    pub fn validate(&self) -> Res<()> {
        for (name, value) in [
            ("slack_bot_token", &self.slack_bot_token),
            ("verification_token", &self.verification_token),
            ("channel_id", &self.channel_id),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("Configuration value `{name}` must not be empty."));
            }
        }

        if self.menu_items.is_empty() || self.menu_items.len() > MAX_MENU_ITEMS {
            return Err(anyhow::anyhow!("Menu items must hold between 1 and {MAX_MENU_ITEMS} entries."));
        }

        if !self.interaction_path.starts_with('/') {
            return Err(anyhow::anyhow!("Interaction path must start with `/`."));
        }

        if !self.events_path.starts_with('/') {
            return Err(anyhow::anyhow!("Events path must start with `/`."));
        }

        if self.events_path == self.interaction_path || self.events_path == "/health" || self.interaction_path == "/health" {
            return Err(anyhow::anyhow!("Interaction, events, and health paths must differ."));
        }

        Ok(())
    }
}

/// `ORDER_BOT_*` variables; `ORDER_BOT_MENU_ITEMS` is a comma-separated list.
fn environment() -> config::Environment {
    config::Environment::default()
        .prefix("ORDER_BOT")
        .prefix_separator("_")
        .list_separator(",")
        .with_list_parse_key("menu_items")
        .try_parsing(true)
}
