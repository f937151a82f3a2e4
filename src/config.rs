use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub const REPLY_ENDPOINT_VAR: &str = "CHATWIDGET_REPLY_ENDPOINT";
pub const REPLY_DELAY_VAR: &str = "CHATWIDGET_REPLY_DELAY_MS";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Simulated assistant settings
    pub assistant: AssistantConfig,

    /// Appearance and embedding of the floating widget
    pub widget: WidgetConfig,

    /// UI preferences
    pub ui: UiConfig,
}

/// Where replies come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReplyBackend {
    /// Canned replies after `reply_delay_ms`
    Mock,
    /// JSON POST to a reply service
    Http { endpoint: String, timeout_secs: u64 },
}

/// Assistant configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub enable_rag: bool,
    /// Offer the "talk to a human agent" action in the widget
    pub human_handoff: bool,
    pub reply_delay_ms: u64,
    pub backend: ReplyBackend,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

/// Widget appearance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub widget_id: String,
    pub title: String,
    pub subtitle: String,
    /// Replaces the default greeting when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    pub agent_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub position: WidgetPosition,
    pub initial_open: bool,
    pub script_url: String,
    pub allowed_domains: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// UI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: "gemini-pro".to_string(),
            system_prompt: "You are a helpful assistant for our company. You should be friendly, concise, and accurate. When you don't know the answer, admit it and offer to connect the user with a human agent.".to_string(),
            temperature: 0.7,
            enable_rag: true,
            human_handoff: true,
            reply_delay_ms: 1500,
            backend: ReplyBackend::Mock,
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            widget_id: "abc123".to_string(),
            title: "Chat Support".to_string(),
            subtitle: "Ask us anything!".to_string(),
            welcome_message: None,
            agent_name: "AI Assistant".to_string(),
            primary_color: "#4f46e5".to_string(),
            secondary_color: "#ffffff".to_string(),
            position: WidgetPosition::BottomRight,
            initial_open: false,
            script_url: "https://widget.example.com/chat.js".to_string(),
            allowed_domains: vec![
                "example.com".to_string(),
                "blog.example.com".to_string(),
                "store.example.com".to_string(),
            ],
        }
    }
}

impl WidgetConfig {
    /// First message of every new conversation
    pub fn greeting(&self) -> String {
        match &self.welcome_message {
            Some(message) if !message.trim().is_empty() => message.clone(),
            _ => format!(
                "Hi there! I'm {}. How can I help you today?",
                self.agent_name
            ),
        }
    }
}

impl Config {
    /// Default home directory, `~/.chatwidget`
    pub fn default_home() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".chatwidget"))
    }

    /// Path of the config file inside a home directory
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::default_home()?.join("config.toml"))
    }

    /// Directory holding the config file; logs live beside it
    pub fn home_for(path: &Path) -> PathBuf {
        path.parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Log directory that belongs to a config file
    pub fn log_dir_for(path: &Path) -> PathBuf {
        Self::home_for(path).join("logs")
    }

    /// Load configuration from a file, falling back to defaults when it does not exist.
    /// Environment overrides are applied on top.
    pub fn load_from(path: &Path) -> Result<Self> {
        let home = Self::home_for(path);
        fs::create_dir_all(&home).context("Failed to create chatwidget directory")?;

        let mut config = if path.exists() {
            let content = fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Config::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = var(REPLY_ENDPOINT_VAR) {
            if !endpoint.trim().is_empty() {
                self.assistant.backend = ReplyBackend::Http {
                    endpoint,
                    timeout_secs: match &self.assistant.backend {
                        ReplyBackend::Http { timeout_secs, .. } => *timeout_secs,
                        ReplyBackend::Mock => 30,
                    },
                };
            }
        }

        if let Some(delay) = var(REPLY_DELAY_VAR) {
            match delay.trim().parse() {
                Ok(ms) => self.assistant.reply_delay_ms = ms,
                Err(_) => tracing::warn!(value = %delay, "ignoring invalid {}", REPLY_DELAY_VAR),
            }
        }
    }
}
