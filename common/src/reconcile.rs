//! 照合ドライバ
//!
//! 入力レコードを順に照合・判定して結果列を組み立てる。
//! 各レコードの処理は独立しているので、並列化しても結果の順序と件数は入力と同じ。

use crate::catalog::CatalogIndex;
use crate::classify::classify;
use crate::error::{Error, Result};
use crate::options::ValidationOptions;
use crate::table::Table;
use crate::types::{InputRecord, ValidationResult};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// 進捗の通知先
///
/// 照合処理は通知結果に依存しない。ワーカースレッドから呼ばれるため軽量であること。
pub trait ProgressObserver: Sync {
    /// マスタの件数が確定した
    fn on_catalog_loaded(&self, _count: usize) {}

    /// `completed` 件目の処理が終わった
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// 何もしない通知先
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// 1レコードを照合・判定する
pub fn validate_record(
    catalog: &CatalogIndex,
    record: &InputRecord,
    options: &ValidationOptions,
) -> ValidationResult {
    let outcome = catalog.best_match(&record.raw_name);
    let (match_status, verdict) = classify(&record.raw_sku, outcome.as_ref(), options);

    ValidationResult {
        raw_name: record.raw_name.clone(),
        raw_sku: record.raw_sku.clone(),
        matched_name: outcome.map(|o| o.matched_name.to_string()),
        master_sku: outcome.map(|o| o.matched_sku.to_string()),
        score: outcome.map_or(0, |o| o.score),
        match_status,
        verdict,
    }
}

/// 全レコードを順番に照合する
pub fn reconcile(
    catalog: &CatalogIndex,
    records: &[InputRecord],
    options: &ValidationOptions,
) -> Vec<ValidationResult> {
    records
        .iter()
        .map(|record| validate_record(catalog, record, options))
        .collect()
}

/// 入力表の列を解決してから照合する
pub fn reconcile_table(
    catalog: &CatalogIndex,
    table: &Table,
    options: &ValidationOptions,
) -> Vec<ValidationResult> {
    let records = table.input_records(options);
    reconcile(catalog, &records, options)
}

/// 進捗通知・並列化・キャンセルに対応した照合
pub struct Reconciler<'a> {
    catalog: &'a CatalogIndex,
    options: &'a ValidationOptions,
    observer: &'a dyn ProgressObserver,
    parallel: bool,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Reconciler<'a> {
    pub fn new(catalog: &'a CatalogIndex, options: &'a ValidationOptions) -> Self {
        Self {
            catalog,
            options,
            observer: &NoopObserver,
            parallel: false,
            cancel: None,
        }
    }

    pub fn observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// フラグが立つとレコード間で中断する
    pub fn cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// 照合を実行する
    ///
    /// キャンセルされた場合は途中結果を返さず `Error::Cancelled` を返す。
    pub fn run(&self, records: &[InputRecord]) -> Result<Vec<ValidationResult>> {
        let total = records.len();
        let completed = AtomicUsize::new(0);

        self.observer.on_catalog_loaded(self.catalog.len());
        tracing::debug!(total, catalog = self.catalog.len(), parallel = self.parallel, "reconcile start");

        let process = |record: &InputRecord| -> Option<ValidationResult> {
            if self.is_cancelled() {
                return None;
            }
            let result = validate_record(self.catalog, record, self.options);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            self.observer.on_progress(done, total);
            Some(result)
        };

        let results: Option<Vec<ValidationResult>> = if self.parallel {
            records.par_iter().map(process).collect()
        } else {
            records.iter().map(process).collect()
        };

        results.ok_or_else(|| Error::Cancelled {
            completed: completed.load(Ordering::Relaxed),
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchStatus, SkuVerdict};
    use std::sync::Mutex;

    fn catalog() -> CatalogIndex {
        CatalogIndex::new(
            vec![("Batman Pop #01", "SKU-001"), ("Superman Pop #02", "SKU-002")],
            false,
        )
    }

    #[derive(Default)]
    struct Recorder {
        catalog_count: Mutex<Option<usize>>,
        calls: AtomicUsize,
        last_total: AtomicUsize,
    }

    impl ProgressObserver for Recorder {
        fn on_catalog_loaded(&self, count: usize) {
            *self.catalog_count.lock().unwrap() = Some(count);
        }

        fn on_progress(&self, _completed: usize, total: usize) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_total.store(total, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_batman_scenario() {
        let records = vec![
            InputRecord::new("BATMAN POP 01", "sku-001"),
            InputRecord::new("Flash Pop", ""),
        ];
        let results = reconcile(&catalog(), &records, &ValidationOptions::default());
        assert_eq!(results.len(), 2);

        let first = &results[0];
        assert_eq!(first.matched_name.as_deref(), Some("Batman Pop #01"));
        assert_eq!(first.score, 96);
        assert_eq!(first.match_status, MatchStatus::High);
        assert_eq!(first.verdict, SkuVerdict::Matches);

        let second = &results[1];
        assert_eq!(second.raw_name, "Flash Pop");
        assert!(second.score < 80);
        assert_eq!(second.verdict, SkuVerdict::Missing);
    }

    #[test]
    fn test_order_and_length_preserved() {
        let records: Vec<InputRecord> = (0..50)
            .map(|i| InputRecord::new(format!("item {}", i), format!("S{}", i)))
            .collect();
        let results = reconcile(&catalog(), &records, &ValidationOptions::default());
        assert_eq!(results.len(), records.len());
        for (record, result) in records.iter().zip(&results) {
            assert_eq!(record.raw_name, result.raw_name);
            assert_eq!(record.raw_sku, result.raw_sku);
        }
    }

    #[test]
    fn test_empty_catalog_yields_not_found() {
        let empty = CatalogIndex::new(Vec::<(String, String)>::new(), false);
        let records = vec![InputRecord::new("Batman", "SKU-001"), InputRecord::default()];
        let results = reconcile(&empty, &records, &ValidationOptions::default());
        assert_eq!(results.len(), 2);
        for result in results {
            assert_eq!(result.score, 0);
            assert_eq!(result.match_status, MatchStatus::NotFound);
            assert_eq!(result.verdict, SkuVerdict::NotFound);
            assert!(result.matched_name.is_none());
        }
    }

    #[test]
    fn test_empty_input() {
        let results = Reconciler::new(&catalog(), &ValidationOptions::default())
            .run(&[])
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let catalog = catalog();
        let options = ValidationOptions::default();
        let records: Vec<InputRecord> = (0..200)
            .map(|i| match i % 4 {
                0 => InputRecord::new("batman pop", "SKU-001"),
                1 => InputRecord::new("Superman #02", "sku002"),
                2 => InputRecord::new(format!("unknown {}", i), ""),
                _ => InputRecord::new("", "SKU-003"),
            })
            .collect();

        let sequential = reconcile(&catalog, &records, &options);
        let parallel = Reconciler::new(&catalog, &options)
            .parallel(true)
            .run(&records)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_observer_is_notified() {
        let catalog = catalog();
        let options = ValidationOptions::default();
        let recorder = Recorder::default();
        let records = vec![InputRecord::new("a", "1"); 7];

        let results = Reconciler::new(&catalog, &options)
            .observer(&recorder)
            .parallel(true)
            .run(&records)
            .unwrap();

        assert_eq!(results.len(), 7);
        assert_eq!(*recorder.catalog_count.lock().unwrap(), Some(2));
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 7);
        assert_eq!(recorder.last_total.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_cancelled_run() {
        let catalog = catalog();
        let options = ValidationOptions::default();
        let flag = AtomicBool::new(true);
        let records = vec![InputRecord::new("batman", "x"); 3];

        let err = Reconciler::new(&catalog, &options)
            .cancel_flag(&flag)
            .run(&records)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled { completed: 0, total: 3 }));
    }

    #[test]
    fn test_reconcile_table_resolves_columns() {
        let table = Table::new(
            vec!["Nama Produk".into(), "SKU".into()],
            vec![vec!["Superman Pop #02".into(), "SKU-002.0".into()]],
        );
        let results = reconcile_table(&catalog(), &table, &ValidationOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].match_status, MatchStatus::Perfect);
        assert_eq!(results[0].verdict, SkuVerdict::Matches);
    }
}
