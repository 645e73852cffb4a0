use crate::error::{MediScanError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 擬似推論時間を上書きする環境変数
pub const DELAY_ENV: &str = "MEDISCAN_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis_delay_ms: u64,
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis_delay_ms: 2000,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MediScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("mediscan").join("config.json"))
    }

    /// 実効の待ち時間（環境変数を優先）
    pub fn effective_delay_ms(&self) -> u64 {
        Self::delay_override(std::env::var(DELAY_ENV).ok().as_deref())
            .unwrap_or(self.analysis_delay_ms)
    }

    fn delay_override(value: Option<&str>) -> Option<u64> {
        let value = value?.trim();
        match value.parse() {
            Ok(ms) => Some(ms),
            Err(_) => {
                tracing::warn!("{}={} を数値として読めないため無視します", DELAY_ENV, value);
                None
            }
        }
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) -> Result<()> {
        self.analysis_delay_ms = delay_ms;
        self.save()
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.output_dir = Some(dir);
        self.save()
    }
}
