use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Settings resolved once at startup and read-only afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of this API, published in the documentation
    pub version: String,
    /// Version of the tool the working directory is managed with
    pub terraform_version: String,
    pub terraform_exec_path: PathBuf,
    /// Working directory holding the configuration and state. Empty means
    /// the process' current directory.
    pub workdir: PathBuf,
    pub debug_mode: bool,
    pub host: String,
    pub port: u16,
    pub swagger_url: String,
    pub trusted_proxy: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "latest".to_string(),
            terraform_version: "1.3.4".to_string(),
            terraform_exec_path: PathBuf::from("terraform"),
            workdir: PathBuf::new(),
            debug_mode: false,
            host: "0.0.0.0".to_string(),
            port: 8080,
            swagger_url: "swagger".to_string(),
            trusted_proxy: String::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and
    /// `TERRAFORM_API_*` environment variables, in that order.
    /// Call [`AppConfig::resolve`] on the result once logging is set up.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        // Add environment variables with prefix "TERRAFORM_API_"
        config = config.add_source(
            config::Environment::with_prefix("TERRAFORM_API")
                .prefix_separator("_"),
        );

        let app_config: AppConfig = config.build()?.try_deserialize()?;
        Ok(app_config)
    }

    /// Replace an unusable working directory with the current one and check
    /// the trusted proxy address
    pub fn resolve(mut self) -> anyhow::Result<Self> {
        let current = std::env::current_dir()?;
        self.workdir = resolve_working_directory(&self.workdir, &current);
        self.trusted_proxy_addr()?;
        Ok(self)
    }

    pub fn trusted_proxy_addr(&self) -> anyhow::Result<Option<IpAddr>> {
        let proxy = self.trusted_proxy.trim();
        if proxy.is_empty() {
            return Ok(None);
        }
        proxy
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("setting trusted proxy {:?}: {}", proxy, e))
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn resolve_working_directory(configured: &Path, current: &Path) -> PathBuf {
    if configured.as_os_str().is_empty() {
        return current.to_path_buf();
    }

    match std::fs::metadata(configured) {
        Ok(meta) if meta.is_dir() => configured.to_path_buf(),
        Ok(_) => {
            log::error!("{:?} is not a directory", configured);
            current.to_path_buf()
        }
        Err(e) => {
            log::error!("failed to open directory {}, error: {}", configured.display(), e);
            current.to_path_buf()
        }
    }
}
