use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Headers and timeouts applied to every outbound request (search pages and images).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Value of the `Referer` header.
    pub referer: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Optional whole-transfer timeout in seconds (None = no limit).
    pub transfer_timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Fedora; Linux x86_64; rv:60.0) Gecko/20100101 Firefox/60.0"
                .to_string(),
            referer: "https://www.bing.com/".to_string(),
            connect_timeout_secs: 30,
            transfer_timeout_secs: None,
        }
    }
}

/// Search backend endpoint parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the image search page.
    pub endpoint: String,
    /// Value of the `FORM` query parameter.
    pub form: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.bing.com/images/search".to_string(),
            form: "HDRSC2".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/imgrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgrabConfig {
    /// Number of download workers.
    pub workers: usize,
    /// Capacity of the candidate queue between the dispatcher and the workers.
    pub queue_capacity: usize,
    pub http: HttpConfig,
    pub search: SearchConfig,
}

impl Default for ImgrabConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            queue_capacity: 5,
            http: HttpConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ImgrabConfig = toml::from_str(&data)?;
    Ok(cfg)
}
