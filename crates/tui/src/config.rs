use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use smart_analyst_backend::{Timeouts, DEFAULT_BASE_URL};
use smart_analyst_core::ResponseOrdering;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const BACKEND_URL_ENV: &str = "SMART_ANALYST_BACKEND_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub downloads: DownloadsConfig,
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadsConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub ordering: ResponseOrdering,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: None,
        }
    }
}

impl BackendConfig {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: (self.connect_timeout_secs > 0)
                .then(|| Duration::from_secs(self.connect_timeout_secs)),
            request: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl DownloadsConfig {
    /// Configured directory, else `~/Downloads/smart-analyst`, else `./downloads`.
    pub fn resolve_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.dir {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|d| d.join("smart-analyst")))
            .unwrap_or_else(|| PathBuf::from("downloads"))
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(path = %path.display(), "Using default config: {e}");
                Self::default()
            }
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend.base_url = url.trim().to_string();
            }
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "smart-analyst", "smart-analyst")
}

pub fn config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config/default.toml"))
}

pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.workflow.ordering, ResponseOrdering::LastArrival);

        let timeouts = config.backend.timeouts();
        assert_eq!(timeouts.connect, Some(Duration::from_secs(5)));
        assert_eq!(timeouts.request, None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [backend]
            base_url = "http://analyst.internal:8080"
            request_timeout_secs = 90

            [workflow]
            ordering = "latest_issued"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://analyst.internal:8080");
        assert_eq!(config.backend.connect_timeout_secs, 5);
        assert_eq!(
            config.backend.timeouts().request,
            Some(Duration::from_secs(90))
        );
        assert_eq!(config.workflow.ordering, ResponseOrdering::LatestIssued);
        assert!(config.downloads.dir.is_none());
    }

    #[test]
    fn zero_connect_timeout_disables_it() {
        let config: Config = toml::from_str("[backend]\nconnect_timeout_secs = 0\n").unwrap();
        assert_eq!(config.backend.timeouts().connect, None);
    }

    #[test]
    fn missing_or_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::load_or_default(&dir.path().join("nope.toml"));
        assert_eq!(missing.backend.base_url, DEFAULT_BASE_URL);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[workflow]\nordering = \"sideways\"\n").unwrap();
        let config = Config::load_or_default(&bad);
        assert_eq!(config.workflow.ordering, ResponseOrdering::LastArrival);
    }

    #[test]
    fn configured_download_dir_wins() {
        let downloads = DownloadsConfig {
            dir: Some(PathBuf::from("/tmp/reports")),
        };
        assert_eq!(downloads.resolve_dir(), PathBuf::from("/tmp/reports"));
    }
}
