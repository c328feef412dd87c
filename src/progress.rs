//! 端末の進捗表示

use indicatif::{ProgressBar, ProgressStyle};
use sku_validator_common::ProgressObserver;

/// indicatifのプログレスバーで照合の進捗を表示する
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "  {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }

    /// 非表示
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for TerminalProgress {
    fn on_catalog_loaded(&self, count: usize) {
        self.bar.set_message(format!("マスタ {}件", count));
    }

    fn on_progress(&self, _completed: usize, _total: usize) {
        // 並列時は完了順が前後するので位置ではなく増分で進める
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_counts() {
        let progress = TerminalProgress::hidden();
        for i in 1..=3 {
            progress.on_progress(i, 3);
        }
        assert_eq!(progress.position(), 3);
        progress.finish();
    }
}
