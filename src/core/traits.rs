// 進捗処理システムのトレイト定義
// 全ての抽象化インターフェースを定義

use super::state::ProgressState;
use super::types::{ProgressMode, ProgressOptions};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// 進捗処理の設定を抽象化するトレイト
#[automock]
pub trait ProgressConfig: Send + Sync {
    /// バッチモードの初期バッチサイズ
    fn batch_size(&self) -> usize;

    /// 全件成功から `on_finish` 呼び出しまでの待ち時間
    fn finish_delay(&self) -> Duration;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

// ProgressConfig for Box<dyn ProgressConfig>
impl ProgressConfig for Box<dyn ProgressConfig> {
    fn batch_size(&self) -> usize {
        self.as_ref().batch_size()
    }

    fn finish_delay(&self) -> Duration {
        self.as_ref().finish_delay()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 実行開始時の報告
    async fn report_started(&self, total_items: usize, mode: ProgressMode);

    /// アイテム終了ごとの報告
    async fn report_progress(&self, state: &ProgressState);

    /// アイテム失敗時の報告
    async fn report_error(&self, index: usize, error: &str);

    /// 実行完了時の報告
    async fn report_completed(&self, total_done: usize, total_errors: usize);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_items: usize, mode: ProgressMode) {
        self.as_ref().report_started(total_items, mode).await
    }

    async fn report_progress(&self, state: &ProgressState) {
        self.as_ref().report_progress(state).await
    }

    async fn report_error(&self, index: usize, error: &str) {
        self.as_ref().report_error(index, error).await
    }

    async fn report_completed(&self, total_done: usize, total_errors: usize) {
        self.as_ref().report_completed(total_done, total_errors).await
    }
}

/// ホスト側が実装するアクション群
///
/// `action_items` のみ必須。その他のフックは何もしないデフォルト実装を持つ。
#[async_trait]
pub trait ProgressActions: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// 処理対象のアイテム一覧
    fn action_items(&self) -> Vec<Self::Item>;

    /// アイテム1件分の非同期処理
    async fn run_action(
        &self,
        _item: &Self::Item,
        _options: &ProgressOptions,
        _index: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn on_item_success(&self, _item: &Self::Item, _mode: ProgressMode, _index: usize) {}

    fn on_item_error(
        &self,
        _error: &anyhow::Error,
        _mode: ProgressMode,
        _item: &Self::Item,
        _index: usize,
    ) {
    }

    fn on_finish(&self) {}

    fn on_finish_with_errors(&self) {}
}
