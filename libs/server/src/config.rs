use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};
use folio_ui::NavOptions;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "~/.folio/folio.toml";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Default)]
pub struct FolioCliFlags {
    pub bind: Option<String>,
    pub db_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FolioConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub mail: MailSettings,
    pub nav: NavOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub bind: String,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MailSettings {
    /// Sender address put on relayed messages.
    pub from: String,
    pub recipient: String,
    /// HTTP relay endpoint. Without one, messages are only logged.
    pub relay_url: Option<String>,
    pub relay_token: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl FolioConfig {
    pub fn load(config_path: Option<&Path>, cli: &FolioCliFlags) -> Result<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);

        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(|error| {
                anyhow!("failed to read folio config {}: {error}", path.display())
            })?;
            Self::from_toml(&text).map_err(|error| {
                anyhow!("failed to parse folio config {}: {error}", path.display())
            })?
        } else {
            FolioConfig::default()
        };

        config.apply_env_overrides();
        config.apply_cli_overrides(cli);
        config.normalize_paths();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let persisted: PersistedFolioConfig = toml::from_str(text)?;
        Ok(persisted.into_runtime())
    }

    pub fn save(&self, config_path: Option<&Path>) -> Result<()> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                anyhow!("failed to create config dir {}: {error}", parent.display())
            })?;
        }

        let persisted = PersistedFolioConfig::from_runtime(self);
        let text = toml::to_string_pretty(&persisted)
            .map_err(|error| anyhow!("failed to serialize folio config: {error}"))?;

        std::fs::write(&path, text).map_err(|error| {
            anyhow!("failed to write folio config {}: {error}", path.display())
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.nav.breakpoint_px == 0 {
            return Err(anyhow!("nav.breakpoint_px must be greater than zero"));
        }

        if let Some(url) = &self.mail.relay_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!("mail.relay_url must be an http(s) URL, got '{url}'"));
            }
            if self.mail.recipient.trim().is_empty() {
                return Err(anyhow!("mail.relay_url requires a non-empty mail.recipient"));
            }
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|error| anyhow!("invalid bind address '{}': {error}", self.server.bind))
    }

    pub fn relay_configured(&self) -> bool {
        self.mail.relay_url.is_some()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").filter(|value| !value.trim().is_empty()) {
            let host = self
                .server
                .bind
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            self.server.bind = format!("{host}:{}", port.trim());
        }

        if let Some(bind) = lookup("FOLIO_BIND") {
            self.server.bind = bind;
        }
        if let Some(path) = lookup("FOLIO_DB_PATH") {
            self.store.db_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("FOLIO_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(path);
        }
        if let Some(user) = lookup("EMAIL_USER") {
            self.mail.from = user;
        }
        if let Some(recipient) = lookup("CONTACT_RECIPIENT") {
            self.mail.recipient = recipient;
        }
        if let Some(url) = lookup("EMAIL_RELAY_URL").filter(|value| !value.trim().is_empty()) {
            self.mail.relay_url = Some(url);
        }
        if let Some(token) = lookup("EMAIL_RELAY_TOKEN").filter(|value| !value.trim().is_empty()) {
            self.mail.relay_token = Some(token);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &FolioCliFlags) {
        if let Some(bind) = &cli.bind {
            self.server.bind = bind.clone();
        }
        if let Some(path) = &cli.db_path {
            self.store.db_path = path.clone();
        }
        if let Some(path) = &cli.static_dir {
            self.server.static_dir = path.clone();
        }
    }

    fn normalize_paths(&mut self) {
        self.store.db_path = expand_tilde_path(&self.store.db_path);
        self.server.static_dir = expand_tilde_path(&self.server.static_dir);
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedFolioConfig {
    #[serde(default)]
    server: PersistedServerSettings,
    #[serde(default)]
    store: PersistedStoreSettings,
    #[serde(default)]
    mail: PersistedMailSettings,
    #[serde(default)]
    nav: PersistedNavSettings,
}

impl PersistedFolioConfig {
    fn into_runtime(self) -> FolioConfig {
        let defaults = NavOptions::default();

        FolioConfig {
            server: ServerSettings {
                bind: self.server.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
                static_dir: self
                    .server
                    .static_dir
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("public")),
            },
            store: StoreSettings {
                db_path: self
                    .store
                    .db_path
                    .map(PathBuf::from)
                    .unwrap_or_else(default_db_path),
            },
            mail: MailSettings {
                from: self.mail.from.unwrap_or_default(),
                recipient: self.mail.recipient.unwrap_or_default(),
                relay_url: self.mail.relay_url,
                relay_token: self.mail.relay_token,
            },
            nav: NavOptions {
                breakpoint_px: self.nav.breakpoint_px.unwrap_or(defaults.breakpoint_px),
                outside_click_closes_menu: self
                    .nav
                    .outside_click_closes_menu
                    .unwrap_or(defaults.outside_click_closes_menu),
            },
        }
    }

    fn from_runtime(config: &FolioConfig) -> Self {
        Self {
            server: PersistedServerSettings {
                bind: Some(config.server.bind.clone()),
                static_dir: Some(config.server.static_dir.to_string_lossy().to_string()),
            },
            store: PersistedStoreSettings {
                db_path: Some(config.store.db_path.to_string_lossy().to_string()),
            },
            mail: PersistedMailSettings {
                from: Some(config.mail.from.clone()),
                recipient: Some(config.mail.recipient.clone()),
                relay_url: config.mail.relay_url.clone(),
                relay_token: config.mail.relay_token.clone(),
            },
            nav: PersistedNavSettings {
                breakpoint_px: Some(config.nav.breakpoint_px),
                outside_click_closes_menu: Some(config.nav.outside_click_closes_menu),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedServerSettings {
    #[serde(default)]
    bind: Option<String>,
    #[serde(default)]
    static_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedStoreSettings {
    #[serde(default)]
    db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedMailSettings {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    relay_url: Option<String>,
    #[serde(default)]
    relay_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedNavSettings {
    #[serde(default)]
    breakpoint_px: Option<u32>,
    #[serde(default)]
    outside_click_closes_menu: Option<bool>,
}

fn default_db_path() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        return home.join(".folio").join("folio.db");
    }
    PathBuf::from(".folio/folio.db")
}

pub fn default_config_path() -> PathBuf {
    expand_tilde_path(&PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn expand_tilde_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(stripped) = path_str.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }

    if path_str == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }

    path.to_path_buf()
}
