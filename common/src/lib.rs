//! SKU Validator Common Library
//!
//! マスタカタログとの照合エンジン（SKU正規化・商品名のあいまい照合・判定）。
//! ファイルやネットワークの入出力は持たない。

pub mod catalog;
pub mod classify;
pub mod error;
pub mod matcher;
pub mod options;
pub mod reconcile;
pub mod sku;
pub mod table;
pub mod types;

pub use catalog::{CatalogEntry, CatalogIndex, MatchOutcome};
pub use classify::{classify, sku_verdict, status_for_score};
pub use error::{Error, Result};
pub use matcher::{best_match, token_set_ratio, NameMatch, TokenSet};
pub use options::ValidationOptions;
pub use reconcile::{reconcile, reconcile_table, validate_record, NoopObserver, ProgressObserver, Reconciler};
pub use sku::{normalize_sku, normalize_sku_opt};
pub use table::{InputColumns, Table};
pub use types::{InputRecord, MatchStatus, RunSummary, SkuVerdict, ValidationResult};
