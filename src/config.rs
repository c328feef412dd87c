use crate::error::{Result, ValidatorError};
use serde::{Deserialize, Serialize};
use sku_validator_common::ValidationOptions;
use std::path::{Path, PathBuf};

/// マスタの指定を上書きする環境変数
pub const MASTER_ENV: &str = "SKU_VALIDATOR_MASTER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// マスタの場所（ファイルパスまたはURL）
    pub master: Option<String>,
    /// マスタ取得のタイムアウト
    pub timeout_seconds: u64,
    /// 並列照合をデフォルトにする
    pub parallel: bool,
    /// 照合・判定オプション
    pub validation: ValidationOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            master: None,
            timeout_seconds: 30,
            parallel: false,
            validation: ValidationOptions::default(),
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
            .ok_or_else(|| ValidatorError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sku-validator").join("config.json"))
    }

    /// マスタの場所を決める（引数 > 環境変数 > 設定ファイル）
    pub fn master_source(&self, cli_master: Option<&str>) -> Result<String> {
        if let Some(master) = cli_master {
            return Ok(master.to_string());
        }

        if let Ok(master) = std::env::var(MASTER_ENV) {
            if !master.trim().is_empty() {
                return Ok(master);
            }
        }

        self.master.clone().ok_or(ValidatorError::MissingMaster)
    }

    pub fn set_master(&mut self, master: String) -> Result<()> {
        self.master = Some(master);
        self.save()
    }
}
