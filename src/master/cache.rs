//! マスタ取得キャッシュ
//!
//! ダウンロードしたマスタCSVをURLのSHA-256をキーにして保存する。
//! キャッシュを使うかどうかは呼び出し側（`--cached`）が決める。

use crate::error::{Result, ValidatorError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const INDEX_FILE_NAME: &str = "master-cache.json";

/// キャッシュ索引
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterCache {
    /// バージョン（互換性チェック用）
    version: u32,
    /// URLハッシュ → エントリ
    entries: HashMap<String, CacheEntry>,
    #[serde(skip)]
    dir: PathBuf,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// 取得元URL
    pub url: String,
    /// 取得日時（RFC 3339）
    pub fetched_at: String,
    /// バイト数
    pub size: u64,
}

impl MasterCache {
    const CURRENT_VERSION: u32 = 1;

    /// 既定のキャッシュディレクトリ
    pub fn default_dir() -> Result<PathBuf> {
        let base = dirs::cache_dir()
            .ok_or_else(|| ValidatorError::Config("キャッシュディレクトリが見つかりません".into()))?;
        Ok(base.join("sku-validator"))
    }

    /// 索引を読み込む（存在しない・破損している場合は空）
    pub fn open(dir: &Path) -> Self {
        let empty = Self::empty(dir);
        let index_path = dir.join(INDEX_FILE_NAME);
        if !index_path.exists() {
            return empty;
        }

        let file = match File::open(&index_path) {
            Ok(f) => f,
            Err(_) => return empty,
        };

        match serde_json::from_reader::<_, MasterCache>(BufReader::new(file)) {
            Ok(mut cache) => {
                if cache.version != Self::CURRENT_VERSION {
                    tracing::warn!(found = cache.version, "master cache version mismatch, ignoring");
                    return empty;
                }
                cache.dir = dir.to_path_buf();
                cache
            }
            Err(err) => {
                tracing::warn!(%err, "master cache index is corrupted, ignoring");
                empty
            }
        }
    }

    fn empty(dir: &Path) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
            dir: dir.to_path_buf(),
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE_NAME)
    }

    /// URLのキャッシュキー（SHA-256の16進表記）
    pub fn key_for(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }

    fn body_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", key))
    }

    pub fn entry(&self, url: &str) -> Option<&CacheEntry> {
        self.entries.get(&Self::key_for(url))
    }

    /// キャッシュ済みの本文を返す
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        let key = Self::key_for(url);
        if !self.entries.contains_key(&key) {
            return None;
        }
        std::fs::read(self.body_path(&key)).ok()
    }

    /// 本文を保存して索引を更新する
    pub fn store(&mut self, url: &str, body: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let key = Self::key_for(url);
        std::fs::write(self.body_path(&key), body)?;
        self.entries.insert(
            key,
            CacheEntry {
                url: url.to_string(),
                fetched_at: chrono::Local::now().to_rfc3339(),
                size: body.len() as u64,
            },
        );
        self.save()
    }

    fn save(&self) -> Result<()> {
        let file = File::create(self.index_path())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.values()
    }

    /// キャッシュ件数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キャッシュディレクトリごと削除する（存在しなければ false）
    pub fn clear(dir: &Path) -> Result<bool> {
        if !dir.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(dir)?;
        Ok(true)
    }
}
