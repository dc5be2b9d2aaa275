// 進捗監視の具象実装

use crate::core::{ProgressMode, ProgressReporter, ProgressState};
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
    interval: usize,
}

impl Default for ConsoleProgressReporter {
    fn default() -> Self {
        Self {
            quiet: false,
            interval: 10,
        }
    }
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    /// 何件ごとに進捗を出力するか（最後の1件は常に出力）
    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = interval.max(1);
        self
    }

    fn should_print(&self, settled: usize, total: usize) -> bool {
        !self.quiet && (settled % self.interval == 0 || settled == total)
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_items: usize, mode: ProgressMode) {
        if !self.quiet {
            println!("🚀 Starting {total_items} items ({mode})...");
        }
    }

    async fn report_progress(&self, state: &ProgressState) {
        let settled = state.items_settled();
        if self.should_print(settled, state.items_count()) {
            println!(
                "📊 Progress: {settled}/{} (started {:.1}%, completed {:.1}%)",
                state.items_count(),
                state.percent_started(),
                state.percent_completed()
            );
        }
    }

    async fn report_error(&self, index: usize, error: &str) {
        if !self.quiet {
            eprintln!("❌ Error in item #{index}: {error}");
        }
    }

    async fn report_completed(&self, total_done: usize, total_errors: usize) {
        if !self.quiet {
            println!("✅ Completed! Done: {total_done}, Errors: {total_errors}");
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_items: usize, _mode: ProgressMode) {
        // 何もしない
    }

    async fn report_progress(&self, _state: &ProgressState) {
        // 何もしない
    }

    async fn report_error(&self, _index: usize, _error: &str) {
        // 何もしない
    }

    async fn report_completed(&self, _total_done: usize, _total_errors: usize) {
        // 何もしない
    }
}
