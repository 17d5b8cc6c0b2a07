use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration, read from `CARLOT_*` environment variables on top of the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Directory uploaded images are written to.
    pub media_root: PathBuf,
    /// URL prefix uploaded images are served under. Always ends with `/`.
    pub media_url: String,
    pub max_upload_bytes: usize,
    pub db_max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:carlot.sqlite".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            media_root: PathBuf::from("media"),
            media_url: "/media/".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            db_max_connections: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, figment::Error> {
        Self::figment().extract().map(Self::normalized)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("CARLOT_"))
    }

    fn normalized(mut self) -> Self {
        // uploads cannot be mounted at the root
        if self.media_url.trim_matches('/').is_empty() {
            self.media_url = Config::default().media_url;
        }
        if !self.media_url.starts_with('/') {
            self.media_url.insert(0, '/');
        }
        if !self.media_url.ends_with('/') {
            self.media_url.push('/');
        }
        self
    }

    /// Public URL of a stored upload, given its path relative to `media_root`.
    pub fn media_url_for(&self, relative: &str) -> String {
        format!("{}{}", self.media_url, relative.trim_start_matches('/'))
    }

    /// Mount point for the static file service (no trailing slash).
    pub fn media_mount(&self) -> &str {
        self.media_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CARLOT_LISTEN_ADDR", "127.0.0.1:9000");
            jail.set_env("CARLOT_MEDIA_URL", "uploads");
            let cfg = Config::from_env()?;
            assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
            assert_eq!(cfg.media_url, "/uploads/");
            assert_eq!(cfg.database_url, "sqlite:carlot.sqlite");
            Ok(())
        });
    }

    #[test]
    fn media_urls() {
        let cfg = Config::default();
        assert_eq!(cfg.media_url_for("cars/a.jpg"), "/media/cars/a.jpg");
        assert_eq!(cfg.media_mount(), "/media");
    }
}
