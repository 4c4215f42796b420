use std::path::{Path, PathBuf};
use std::time::Duration;

use chatline_transport::{DEFAULT_CHAT_PATH, DEFAULT_HEALTH_PATH, DEFAULT_LEAD_PATH, Endpoints};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_SUPPORT_EMAIL: &str = "support@example.com";
pub const DEFAULT_SUPPORT_PHONE: &str = "+1 555 0100";
pub const DEFAULT_LEAD_PROMPT_DELAY_MS: u64 = 1_000;
pub const SETTINGS_DIRECTORY_NAME: &str = "chatline";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const ENV_PREFIX: &str = "CHATLINE_";
/// Overrides the settings file location.
pub const CONFIG_PATH_ENV: &str = "CHATLINE_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSettings {
    #[serde(default = "default_chat_path")]
    pub chat: String,
    #[serde(default = "default_lead_path")]
    pub lead: String,
    #[serde(default = "default_health_path")]
    pub health: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            chat: default_chat_path(),
            lead: default_lead_path(),
            health: default_health_path(),
        }
    }
}

impl EndpointSettings {
    fn normalized(self) -> Self {
        Self {
            chat: normalize_path(self.chat, DEFAULT_CHAT_PATH),
            lead: normalize_path(self.lead, DEFAULT_LEAD_PATH),
            health: normalize_path(self.health, DEFAULT_HEALTH_PATH),
        }
    }
}

/// Fallback contact channels shown when an automated flow fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSettings {
    #[serde(default = "default_support_email")]
    pub email: String,
    #[serde(default = "default_support_phone")]
    pub phone: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            email: default_support_email(),
            phone: default_support_phone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub endpoints: EndpointSettings,
    #[serde(default)]
    pub contacts: ContactSettings,
    #[serde(default = "default_lead_prompt_delay_ms")]
    pub lead_prompt_delay_ms: u64,
    #[serde(default = "default_quick_actions")]
    pub quick_actions: Vec<String>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoints: EndpointSettings::default(),
            contacts: ContactSettings::default(),
            lead_prompt_delay_ms: DEFAULT_LEAD_PROMPT_DELAY_MS,
            quick_actions: default_quick_actions(),
        }
    }
}

impl WidgetSettings {
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".chatline"))
            .join(SETTINGS_FILE_NAME)
    }

    /// Resolves the settings file from the environment or the platform config directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path)
    }

    pub fn load() -> SettingsResult<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Defaults, then the JSON file at `path` if present, then `CHATLINE_*` variables.
    ///
    /// Nested keys use a double underscore, e.g. `CHATLINE_CONTACTS__PHONE`.
    pub fn load_from(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults and environment", path);
        }

        let settings = Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract::<Self>()
            .context(ExtractSnafu {
                stage: "extract-widget-settings",
                path: path.to_path_buf(),
            })?;

        Ok(settings.normalized())
    }

    pub fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            self.base_url = default_base_url();
        }
        self.endpoints = self.endpoints.normalized();

        self.contacts.email = non_blank_or(self.contacts.email, DEFAULT_SUPPORT_EMAIL);
        self.contacts.phone = non_blank_or(self.contacts.phone, DEFAULT_SUPPORT_PHONE);

        // Blank quick actions would render as empty buttons.
        self.quick_actions = self
            .quick_actions
            .into_iter()
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
            .collect();

        self
    }

    pub fn to_endpoints(&self) -> Endpoints {
        Endpoints::new(self.base_url.clone()).with_paths(
            self.endpoints.chat.clone(),
            self.endpoints.lead.clone(),
            self.endpoints.health.clone(),
        )
    }

    pub fn lead_prompt_delay(&self) -> Duration {
        Duration::from_millis(self.lead_prompt_delay_ms)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to read widget settings from {path:?} on `{stage}`: {source}"))]
    Extract {
        stage: &'static str,
        path: PathBuf,
        source: figment::Error,
    },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

fn normalize_path(path: String, default: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        default.to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn non_blank_or(value: String, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_chat_path() -> String {
    DEFAULT_CHAT_PATH.to_string()
}

fn default_lead_path() -> String {
    DEFAULT_LEAD_PATH.to_string()
}

fn default_health_path() -> String {
    DEFAULT_HEALTH_PATH.to_string()
}

fn default_support_email() -> String {
    DEFAULT_SUPPORT_EMAIL.to_string()
}

fn default_support_phone() -> String {
    DEFAULT_SUPPORT_PHONE.to_string()
}

fn default_lead_prompt_delay_ms() -> u64 {
    DEFAULT_LEAD_PROMPT_DELAY_MS
}

fn default_quick_actions() -> Vec<String> {
    vec![
        "What services do you offer?".to_string(),
        "How can I track my shipment?".to_string(),
        "I need a quote".to_string(),
    ]
}
