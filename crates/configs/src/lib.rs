use std::io;
use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_DATA_FILE: &str = "data/attendance_data.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file() }
    }
}

fn default_data_file() -> PathBuf { PathBuf::from(DEFAULT_DATA_FILE) }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file first; only when it does not exist, build from
    /// `SERVER_HOST` / `SERVER_PORT` / `DATA_FILE` / `TOKIO_WORKER_THREADS`.
    /// A file that exists but cannot be read, parsed or validated is an error.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => parse(&content).map_err(|e| anyhow!("invalid config {path}: {e}"))?,
            // 仅当配置文件不存在时回退到环境变量
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::from_env(),
            Err(e) => return Err(anyhow!("cannot read config {path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8081);
        let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());
        let data_file = std::env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_file());
        Self {
            server: ServerConfig { host, port, worker_threads },
            storage: StorageConfig { data_file },
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize();
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.data_file.as_os_str().is_empty() {
            self.data_file = default_data_file();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.data_file, PathBuf::from(DEFAULT_DATA_FILE));
    }

    #[test]
    fn parses_server_and_storage() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [storage]
            data_file = "/var/lib/attendance/records.json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.storage.data_file, PathBuf::from("/var/lib/attendance/records.json"));
    }

    #[test]
    fn normalize_fills_blank_values() {
        let mut cfg = AppConfig {
            server: ServerConfig { host: "  ".into(), port: 8080, worker_threads: Some(0) },
            storage: StorageConfig { data_file: PathBuf::new() },
        };
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.data_file, PathBuf::from(DEFAULT_DATA_FILE));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn temp_config(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("attendance_config_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn existing_config_with_zero_port_is_an_error() {
        let path = temp_config("[server]\nhost = \"0.0.0.0\"\nport = 0\n\n[storage]\ndata_file = \"/srv/att.json\"\n");
        let result = AppConfig::load_or_env_from(path.to_str().unwrap());
        assert!(result.is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unparsable_config_is_an_error() {
        let path = temp_config("[server\nport = \"x\"");
        assert!(AppConfig::load_or_env_from(path.to_str().unwrap()).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn existing_config_is_used_as_is() {
        let path = temp_config("[server]\nhost = \"0.0.0.0\"\nport = 9001\n\n[storage]\ndata_file = \"/srv/att.json\"\n");
        let cfg = AppConfig::load_or_env_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9001");
        assert_eq!(cfg.storage.data_file, PathBuf::from("/srv/att.json"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_config_falls_back_to_env() {
        let path = std::env::temp_dir().join(format!("attendance_missing_{}.toml", uuid::Uuid::new_v4()));
        assert!(AppConfig::load_or_env_from(path.to_str().unwrap()).is_ok());
    }
}
