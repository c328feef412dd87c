//! 照合の実行（キャンセル・タイムアウト対応）
//!
//! 照合自体は同期処理なのでブロッキングタスクで動かし、
//! Ctrl-C とタイムアウトはキャンセルフラグ経由で伝える。

use crate::error::{Result, ValidatorError};
use crate::progress::TerminalProgress;
use sku_validator_common::{CatalogIndex, InputRecord, Reconciler, ValidationOptions, ValidationResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Ctrl-C の扱い
///
/// コマンド全体で一度だけ監視を開始する。照合中はキャンセルフラグを立てて
/// レコード間で止め、それ以外の区間ではその場でプロセスを終了する。
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    cancel: Arc<AtomicBool>,
    armed: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// シグナル監視タスクを起動する
    pub fn install(&self) -> tokio::task::JoinHandle<()> {
        let interrupt = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if !interrupt.handle_signal() {
                    eprintln!("\n中断しました");
                    std::process::exit(130);
                }
            }
        })
    }

    /// Ctrl-C を受けたときの処理（照合中なら true）
    pub fn handle_signal(&self) -> bool {
        if self.armed.load(Ordering::SeqCst) {
            self.cancel.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }
}

/// 実行設定
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub parallel: bool,
    /// 全体のタイムアウト
    pub timeout: Option<Duration>,
    /// プログレスバーを表示する
    pub show_progress: bool,
    /// Ctrl-C の監視（None ならシグナルを扱わない）
    pub interrupt: Option<Interrupt>,
}

pub async fn run_reconciliation(
    catalog: Arc<CatalogIndex>,
    records: Vec<InputRecord>,
    options: ValidationOptions,
    run: RunOptions,
) -> Result<Vec<ValidationResult>> {
    let cancel = run
        .interrupt
        .as_ref()
        .map(Interrupt::cancel_flag)
        .unwrap_or_default();
    let timed_out = Arc::new(AtomicBool::new(false));

    if let Some(interrupt) = &run.interrupt {
        interrupt.arm();
    }

    let deadline = run.timeout.map(|timeout| {
        let cancel = Arc::clone(&cancel);
        let timed_out = Arc::clone(&timed_out);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            timed_out.store(true, Ordering::SeqCst);
            cancel.store(true, Ordering::SeqCst);
        })
    });

    let worker = {
        let cancel = Arc::clone(&cancel);
        let parallel = run.parallel;
        let show_progress = run.show_progress;
        tokio::task::spawn_blocking(move || {
            let progress = if show_progress {
                TerminalProgress::new(records.len())
            } else {
                TerminalProgress::hidden()
            };
            let result = Reconciler::new(&catalog, &options)
                .observer(&progress)
                .parallel(parallel)
                .cancel_flag(&cancel)
                .run(&records);
            progress.finish();
            result
        })
    };

    let joined = worker.await;
    if let Some(interrupt) = &run.interrupt {
        interrupt.disarm();
    }
    if let Some(deadline) = deadline {
        deadline.abort();
    }

    let outcome = joined.map_err(|e| ValidatorError::Interrupted(format!("照合タスクが異常終了しました: {}", e)))?;

    match outcome {
        Ok(results) => Ok(results),
        Err(sku_validator_common::Error::Cancelled { completed, total }) => {
            let reason = if timed_out.load(Ordering::SeqCst) {
                "タイムアウト"
            } else {
                "ユーザー操作"
            };
            Err(ValidatorError::Interrupted(format!(
                "{}（{}/{}件処理済み）",
                reason, completed, total
            )))
        }
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_reconciliation_completes() {
        let catalog = Arc::new(CatalogIndex::new(vec![("Batman Pop #01", "SKU-001")], false));
        let records = vec![
            InputRecord::new("Batman Pop #01", "sku-001"),
            InputRecord::new("Unknown", ""),
        ];

        let results = run_reconciliation(catalog, records, ValidationOptions::default(), RunOptions::default())
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, 100);
    }

    #[test]
    fn test_signal_outside_reconciliation_is_not_absorbed() {
        let interrupt = Interrupt::new();
        assert!(!interrupt.handle_signal());
        assert!(!interrupt.cancel_flag().load(Ordering::SeqCst));

        interrupt.arm();
        assert!(interrupt.handle_signal());
        assert!(interrupt.cancel_flag().load(Ordering::SeqCst));

        interrupt.disarm();
        assert!(!interrupt.handle_signal());
    }

    #[tokio::test]
    async fn test_interrupt_cancels_run_and_disarms() {
        let catalog = Arc::new(CatalogIndex::new(vec![("Batman Pop #01", "SKU-001")], false));
        let records = vec![InputRecord::new("Batman Pop #01", "sku-001")];

        // 照合開始前に受けたシグナルを再現
        let interrupt = Interrupt::new();
        interrupt.arm();
        interrupt.handle_signal();

        let run = RunOptions {
            interrupt: Some(interrupt.clone()),
            ..Default::default()
        };
        let result = run_reconciliation(catalog, records, ValidationOptions::default(), run).await;
        match result {
            Err(ValidatorError::Interrupted(reason)) => assert!(reason.contains("ユーザー操作"), "{}", reason),
            other => panic!("unexpected: {:?}", other.map(|r| r.len())),
        }

        // 照合が終われば Ctrl-C はプロセス終了側に戻る
        assert!(!interrupt.handle_signal());
    }

    #[tokio::test]
    async fn test_zero_timeout_interrupts_large_run() {
        let names: Vec<(String, String)> = (0..2000)
            .map(|i| (format!("Product number {} edition", i), format!("SKU-{}", i)))
            .collect();
        let catalog = Arc::new(CatalogIndex::new(names, false));
        let records: Vec<InputRecord> = (0..20000)
            .map(|i| InputRecord::new(format!("product {} limited", i), ""))
            .collect();

        let run = RunOptions {
            timeout: Some(Duration::from_millis(1)),
            ..Default::default()
        };
        let result = run_reconciliation(catalog, records, ValidationOptions::default(), run).await;
        assert!(matches!(result, Err(ValidatorError::Interrupted(_))));
    }
}
