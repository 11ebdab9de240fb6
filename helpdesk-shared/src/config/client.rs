use serde::{Deserialize, Serialize};
use std::{env, fmt, fs, path::PathBuf, str::FromStr, time::Duration};
use url::Url;

/// Backend the client talks to when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";

/// First bot message shown when a chat session starts.
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your IT Support Assistant. Please type 'Hi' to start the conversation.";

/// Output format for log lines.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, ANSI-colored lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected 'text' or 'json'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// The main configuration structure for the helpdesk client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the helpdesk server; API paths are resolved against it.
    pub base_url: Url,

    /// Logging level
    pub log_level: String,

    /// Logging output format
    pub log_format: LogFormat,

    /// Seconds a notification banner stays visible
    pub notification_timeout_secs: u64,

    /// Bot message rendered when a chat session starts
    pub greeting: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Raw `name=value` cookie(s) used to seed the session store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Config {
    /// Generates a default configuration.
    ///
    /// # Panics
    /// Never in practice: [`DEFAULT_BASE_URL`] is a valid absolute URL.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            notification_timeout_secs: 5,
            greeting: DEFAULT_GREETING.to_string(),
            user_agent: "helpdesk-cli".to_string(),
            session_cookie: None,
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to the configuration file.
    /// * `base_url_override` - Optional server URL taking precedence over everything else.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, an environment
    /// variable holds an invalid value, or the resolved configuration fails
    /// [`Config::validate`].
    pub fn load_config(
        config_path: Option<PathBuf>,
        base_url_override: Option<&str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let defaults = Self::with_defaults();
        let mut config = defaults.clone();

        if let Some(path) = config_path {
            let content = fs::read_to_string(&path)?;
            config = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => serde_yml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                _ => return Err("Unsupported configuration format. Use 'yaml' or 'json'.".into()),
            };
        }

        // Environment only fills values the file left at their defaults
        if config.base_url == defaults.base_url {
            if let Ok(base_url) = env::var("HELPDESK_BASE_URL") {
                config.base_url = Url::parse(&base_url)
                    .map_err(|err| format!("Invalid HELPDESK_BASE_URL value: {err}"))?;
            }
        }
        if config.log_level == defaults.log_level {
            if let Ok(log_level) = env::var("HELPDESK_LOG_LEVEL") {
                config.log_level = log_level;
            }
        }
        if config.log_format == defaults.log_format {
            if let Ok(log_format) = env::var("HELPDESK_LOG_FORMAT") {
                config.log_format = log_format.parse()?;
            }
        }
        if config.notification_timeout_secs == defaults.notification_timeout_secs {
            if let Ok(timeout) = env::var("HELPDESK_NOTIFICATION_TIMEOUT_SECS") {
                config.notification_timeout_secs = timeout.parse().map_err(|_| {
                    "Invalid HELPDESK_NOTIFICATION_TIMEOUT_SECS value: must be a whole number of seconds"
                })?;
            }
        }
        if config.session_cookie.is_none() {
            config.session_cookie = env::var("HELPDESK_SESSION_COOKIE").ok();
        }

        if let Some(base_url) = base_url_override {
            config.base_url = Url::parse(base_url)?;
        }

        config.validate().map_err(|errors| errors.join("; "))?;
        Ok(config)
    }

    /// How long a notification banner stays up before it is removed.
    #[must_use]
    pub const fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    /// Validate the complete configuration.
    ///
    /// # Errors
    /// Returns every problem found, one message per entry.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !matches!(self.base_url.scheme(), "http" | "https") {
            errors.push(format!(
                "Invalid base URL scheme '{}'. Use http or https.",
                self.base_url.scheme()
            ));
        }

        if !matches!(
            self.log_level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            errors.push(format!("Invalid log level '{}'.", self.log_level));
        }

        if self.notification_timeout_secs == 0 {
            errors.push("Notification timeout must be greater than 0.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
