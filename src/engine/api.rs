// 高レベル公開API
// ProgressTrackerを簡単に使用できるようにするための便利な関数

use super::ProgressTracker;
use crate::{
    core::{
        ProgressActions, ProgressConfig, ProgressOptions, ProgressReporter, ProgressResult,
        ProgressState,
    },
    services::{ConsoleProgressReporter, DefaultProgressConfig, NoOpProgressReporter},
};

/// 実行を開始し、全アイテムが終了するまで待つ
///
/// SIMULTANEOUSモードでも完了後の状態を返す。
pub async fn run_to_settlement<A, C, R>(
    tracker: &ProgressTracker<A, C, R>,
    options: ProgressOptions,
) -> ProgressResult<ProgressState>
where
    A: ProgressActions,
    C: ProgressConfig + 'static,
    R: ProgressReporter + 'static,
{
    tracker.start(options).await?;
    Ok(tracker.wait_until_settled().await)
}

/// デフォルト設定 + コンソール出力のトラッカーを作成
pub fn create_default_tracker<A>(
    actions: A,
) -> ProgressTracker<A, DefaultProgressConfig, ConsoleProgressReporter>
where
    A: ProgressActions,
{
    ProgressTracker::new(
        actions,
        DefaultProgressConfig::default(),
        ConsoleProgressReporter::new(),
    )
}

/// 静音版（テストやバックグラウンド処理用）
pub fn create_quiet_tracker<A>(
    actions: A,
) -> ProgressTracker<A, DefaultProgressConfig, NoOpProgressReporter>
where
    A: ProgressActions,
{
    ProgressTracker::new(
        actions,
        DefaultProgressConfig::default(),
        NoOpProgressReporter::new(),
    )
}
