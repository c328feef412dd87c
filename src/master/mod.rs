//! マスタカタログの読み込み
//!
//! ローカルファイル（CSV/Excel）または URL（Googleスプレッドシート共有リンク等）から
//! マスタ表を取得し、照合用の [`CatalogIndex`] を構築する。

pub mod cache;
pub mod sheets;

pub use cache::MasterCache;

use crate::error::{Result, ValidatorError};
use crate::reader;
use sku_validator_common::{CatalogIndex, Table, ValidationOptions};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// マスタの取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MasterSource {
    File(PathBuf),
    Url(String),
}

impl MasterSource {
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            MasterSource::Url(trimmed.to_string())
        } else {
            MasterSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for MasterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasterSource::File(path) => write!(f, "{}", path.display()),
            MasterSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// 表をどこから得たか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterOrigin {
    File,
    Downloaded,
    Cache,
}

impl fmt::Display for MasterOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasterOrigin::File => write!(f, "ファイル"),
            MasterOrigin::Downloaded => write!(f, "ダウンロード"),
            MasterOrigin::Cache => write!(f, "キャッシュ"),
        }
    }
}

/// 読み込み設定
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// ダウンロードのタイムアウト
    pub timeout: Duration,
    /// キャッシュ済みならダウンロードしない
    pub use_cache: bool,
    /// キャッシュディレクトリ（None ならキャッシュしない）
    pub cache_dir: Option<PathBuf>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            use_cache: false,
            cache_dir: None,
        }
    }
}

/// 読み込んだマスタ表
#[derive(Debug, Clone)]
pub struct LoadedMaster {
    pub table: Table,
    pub origin: MasterOrigin,
}

/// マスタ表を取得する
pub async fn load_master_table(source: &MasterSource, options: &LoadOptions) -> Result<LoadedMaster> {
    match source {
        MasterSource::File(path) => {
            if !path.exists() {
                return Err(ValidatorError::MasterUnavailable(format!(
                    "ファイルが見つかりません: {}",
                    path.display()
                )));
            }
            let table = reader::read_table(path)?;
            Ok(LoadedMaster {
                table,
                origin: MasterOrigin::File,
            })
        }
        MasterSource::Url(url) => load_remote(url, options).await,
    }
}

async fn load_remote(url: &str, options: &LoadOptions) -> Result<LoadedMaster> {
    let export_url = sheets::csv_export_url(url);
    let mut cache = options.cache_dir.as_deref().map(MasterCache::open);

    if options.use_cache {
        if let Some(body) = cache.as_ref().and_then(|c| c.get(&export_url)) {
            tracing::debug!(url = %export_url, bytes = body.len(), "master loaded from cache");
            return Ok(LoadedMaster {
                table: parse_csv_body(&body)?,
                origin: MasterOrigin::Cache,
            });
        }
    }

    tracing::debug!(url = %export_url, "downloading master");
    let body = download(&export_url, options.timeout).await?;
    let table = parse_csv_body(&body)?;

    if let Some(cache) = cache.as_mut() {
        if let Err(err) = cache.store(&export_url, &body) {
            tracing::warn!(%err, "failed to store master cache");
        }
    }

    Ok(LoadedMaster {
        table,
        origin: MasterOrigin::Downloaded,
    })
}

async fn download(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.bytes().await?;
    Ok(body.to_vec())
}

/// ダウンロードしたCSVを解析する
///
/// 非公開シートはログインページ（HTML）が返るので検出してエラーにする。
pub fn parse_csv_body(body: &[u8]) -> Result<Table> {
    let head = String::from_utf8_lossy(&body[..body.len().min(256)]).to_ascii_lowercase();
    let head = head.trim_start_matches('\u{feff}').trim_start();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        return Err(ValidatorError::MasterUnavailable(
            "CSVではなくHTMLが返されました。シートの共有設定を確認してください".into(),
        ));
    }

    reader::read_csv(body).map_err(|e| ValidatorError::InvalidMaster(e.to_string()))
}

/// マスタ表から照合用カタログを構築する
pub fn build_catalog(table: &Table, options: &ValidationOptions) -> Result<CatalogIndex> {
    CatalogIndex::from_table(table, options).map_err(|e| match e {
        sku_validator_common::Error::MissingColumn { column, .. } => {
            ValidatorError::InvalidMaster(format!("列 '{}' がありません", column))
        }
        other => ValidatorError::Common(other),
    })
}
