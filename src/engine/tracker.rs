// ProgressTracker - 進捗カウンターを所有し、アイテムを各実行方式で処理する

use super::partition::{chunk, shuffled};
use crate::core::{
    Completion, ProgressActions, ProgressConfig, ProgressError, ProgressMode, ProgressOptions,
    ProgressReporter, ProgressResult, ProgressState,
};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

/// 非同期アクション群の進捗トラッカー
///
/// 内部状態は `Arc` で共有されるため、`clone` したハンドルは同じカウンターを参照する。
/// カウンターは `watch` チャンネルに保持され、更新のたびに購読者へ通知される。
pub struct ProgressTracker<A, C, R> {
    inner: Arc<TrackerInner<A, C, R>>,
}

struct TrackerInner<A, C, R> {
    actions: A,
    config: C,
    reporter: R,
    state: watch::Sender<ProgressState>,
}

impl<A, C, R> Clone for ProgressTracker<A, C, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, C, R> ProgressTracker<A, C, R>
where
    A: ProgressActions,
    C: ProgressConfig + 'static,
    R: ProgressReporter + 'static,
{
    /// 新しいトラッカーを作成
    ///
    /// バッチサイズの初期値は設定から取得する。
    pub fn new(actions: A, config: C, reporter: R) -> Self {
        let (state, _) = watch::channel(ProgressState::new(config.batch_size()));
        Self {
            inner: Arc::new(TrackerInner {
                actions,
                config,
                reporter,
                state,
            }),
        }
    }

    /// ホストの `action_items` を対象に実行を開始
    pub async fn start(&self, options: ProgressOptions) -> ProgressResult<ProgressState> {
        let items = self.inner.actions.action_items();
        self.start_with_items(items, options).await
    }

    /// 指定したアイテム列で実行を開始
    ///
    /// 全アイテムの投入が終わった時点の状態を返す。
    /// SIMULTANEOUSモードでは投入と完了が切り離されているため、
    /// 完了を待つには [`wait_until_settled`](Self::wait_until_settled) を使う。
    pub async fn start_with_items(
        &self,
        items: Vec<A::Item>,
        options: ProgressOptions,
    ) -> ProgressResult<ProgressState> {
        let batch_size = self.batch_size();
        if batch_size == 0 {
            return Err(ProgressError::configuration(
                "バッチサイズは1以上である必要があります",
            ));
        }

        let items = if options.shuffle {
            shuffled(&items)
        } else {
            items
        };
        let mode = options.progress_mode;
        let total = items.len();

        let mut generation = 0;
        self.inner
            .state
            .send_modify(|state| generation = state.begin_run(total));

        if self.inner.reporting() {
            self.inner.reporter.report_started(total, mode).await;
        }

        let options = Arc::new(options);
        match mode {
            ProgressMode::Sequential => {
                self.inner
                    .run_sequential(items, &options, generation)
                    .await
            }
            ProgressMode::Simultaneous => self.inner.run_simultaneous(items, options, generation),
            ProgressMode::Batch => {
                self.inner
                    .run_batch(items, batch_size, &options, generation)
                    .await
            }
        }

        Ok(self.snapshot())
    }

    /// カウンターを初期状態に戻す
    ///
    /// 実行中のアイテムは止まらないが、以降その結果はカウントされない。
    pub fn reset_progress(&self) {
        self.inner.state.send_modify(ProgressState::reset);
    }

    /// バッチサイズを更新（0は無視）
    pub fn set_batch_size(&self, batch_size: usize) -> bool {
        self.inner
            .state
            .send_if_modified(|state| state.set_batch_size(batch_size))
    }

    /// 文字列からバッチサイズを更新。正の整数以外は無視する
    pub fn set_batch_size_from_str(&self, value: &str) -> bool {
        match value.trim().parse::<usize>() {
            Ok(batch_size) => self.set_batch_size(batch_size),
            Err(_) => false,
        }
    }

    /// JSON値からバッチサイズを更新。正の整数以外は無視する
    pub fn set_batch_size_from_value(&self, value: &Value) -> bool {
        let batch_size = value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|n| n.fract() == 0.0 && *n >= 1.0 && *n <= usize::MAX as f64)
                .map(|n| n as u64)
        });

        match batch_size.and_then(|n| usize::try_from(n).ok()) {
            Some(batch_size) => self.set_batch_size(batch_size),
            None => false,
        }
    }

    /// 現在の状態のコピー
    pub fn snapshot(&self) -> ProgressState {
        self.inner.snapshot()
    }

    pub fn percent_started(&self) -> f64 {
        self.snapshot().percent_started()
    }

    pub fn percent_completed(&self) -> f64 {
        self.snapshot().percent_completed()
    }

    pub fn batch_size(&self) -> usize {
        self.snapshot().batch_size()
    }

    pub fn is_progress_units(&self) -> bool {
        self.snapshot().is_progress_units()
    }

    /// カウンター更新の購読
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.inner.state.subscribe()
    }

    /// 現在の実行の全アイテムが終了する（またはリセットされる）まで待つ
    pub async fn wait_until_settled(&self) -> ProgressState {
        let mut receiver = self.subscribe();
        let settled = receiver
            .wait_for(|state| !state.is_progress_units() || state.is_settled())
            .await
            .map(|state| *state);
        settled.unwrap_or_else(|_| self.snapshot())
    }

    /// アクションへの参照を取得
    pub fn actions(&self) -> &A {
        &self.inner.actions
    }

    /// 設定への参照を取得（読み取り専用アクセス）
    pub fn config(&self) -> &C {
        &self.inner.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.inner.reporter
    }
}

impl<A, C, R> TrackerInner<A, C, R>
where
    A: ProgressActions,
    C: ProgressConfig + 'static,
    R: ProgressReporter + 'static,
{
    fn snapshot(&self) -> ProgressState {
        *self.state.borrow()
    }

    fn reporting(&self) -> bool {
        self.config.enable_progress_reporting()
    }

    /// 指定世代が現在の実行である場合のみ状態を更新する
    fn update<T>(&self, generation: u64, f: impl FnOnce(&mut ProgressState) -> T) -> Option<T> {
        let mut outcome = None;
        self.state.send_if_modified(|state| {
            if state.generation() != generation {
                return false;
            }
            outcome = Some(f(state));
            true
        });
        outcome
    }

    async fn run_sequential(
        self: &Arc<Self>,
        items: Vec<A::Item>,
        options: &ProgressOptions,
        generation: u64,
    ) {
        let total = items.len();
        self.update(generation, |state| state.set_items_to_progress(total));

        for (index, item) in items.into_iter().enumerate() {
            self.process_item(item, options, index, ProgressMode::Sequential, generation)
                .await;
        }
    }

    fn run_simultaneous(
        self: &Arc<Self>,
        items: Vec<A::Item>,
        options: Arc<ProgressOptions>,
        generation: u64,
    ) {
        let total = items.len();
        self.update(generation, |state| state.set_items_to_progress(total));

        for (index, item) in items.into_iter().enumerate() {
            let inner = Arc::clone(self);
            let options = Arc::clone(&options);
            tokio::spawn(async move {
                inner
                    .process_item(item, &options, index, ProgressMode::Simultaneous, generation)
                    .await;
            });
        }
    }

    async fn run_batch(
        self: &Arc<Self>,
        items: Vec<A::Item>,
        batch_size: usize,
        options: &ProgressOptions,
        generation: u64,
    ) {
        for batch in chunk(&items, batch_size) {
            let len = batch.len();
            self.update(generation, |state| state.add_items_to_progress(len));

            // バッチ内は同時実行し、全件の終了を待ってから次のバッチへ
            // インデックスはバッチ内の位置
            let pending = batch.into_iter().enumerate().map(|(index, item)| {
                self.process_item(item, options, index, ProgressMode::Batch, generation)
            });
            join_all(pending).await;
        }
    }

    /// アイテム1件の処理
    async fn process_item(
        self: &Arc<Self>,
        item: A::Item,
        options: &ProgressOptions,
        index: usize,
        mode: ProgressMode,
        generation: u64,
    ) {
        self.update(generation, ProgressState::mark_started);

        match self.actions.run_action(&item, options, index).await {
            Ok(()) => {
                let completion = self.update(generation, ProgressState::mark_done);
                self.actions.on_item_success(&item, mode, index);
                self.after_settled(completion, generation).await;
            }
            Err(error) => {
                let completion = self.update(generation, ProgressState::mark_failed);
                self.actions.on_item_error(&error, mode, &item, index);
                if self.reporting() {
                    self.reporter.report_error(index, &format!("{error:#}")).await;
                }
                self.after_settled(completion, generation).await;
            }
        }
    }

    /// カウンター更新後の完了判定
    async fn after_settled(self: &Arc<Self>, completion: Option<Completion>, generation: u64) {
        // リセット済みの実行に属する結果
        let Some(completion) = completion else {
            return;
        };

        let state = self.snapshot();
        if self.reporting() {
            self.reporter.report_progress(&state).await;
        }

        if completion.is_none() {
            return;
        }

        if completion.finished_with_errors {
            self.actions.on_finish_with_errors();
            if self.reporting() {
                self.reporter
                    .report_completed(state.items_done(), state.items_done_with_error())
                    .await;
            }
        }

        if completion.finished {
            self.schedule_finish(generation);
        }
    }

    /// 100%表示のための待ち時間の後、完了フックを呼んでリセットする
    fn schedule_finish(self: &Arc<Self>, generation: u64) {
        let inner = Arc::clone(self);
        let delay = self.config.finish_delay();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let state = inner.snapshot();
            if state.generation() != generation {
                return;
            }

            inner.actions.on_finish();
            inner.update(generation, ProgressState::reset);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{MockProgressConfig, MockProgressReporter};
    use crate::services::{DefaultProgressConfig, NoOpProgressReporter};
    use mockall::predicate::*;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Letters {
        seen: Mutex<Vec<(usize, char)>>,
    }

    #[async_trait::async_trait]
    impl ProgressActions for Letters {
        type Item = char;

        fn action_items(&self) -> Vec<char> {
            vec!['a', 'b', 'c', 'd', 'e']
        }

        async fn run_action(
            &self,
            item: &char,
            _options: &ProgressOptions,
            index: usize,
        ) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push((index, *item));
            if *item == 'c' {
                anyhow::bail!("bad letter");
            }
            Ok(())
        }
    }

    fn quiet_tracker() -> ProgressTracker<Letters, DefaultProgressConfig, NoOpProgressReporter> {
        ProgressTracker::new(
            Letters::default(),
            DefaultProgressConfig::default().with_finish_delay(Duration::from_millis(1)),
            NoOpProgressReporter::new(),
        )
    }

    #[test]
    fn test_percentages_before_any_run() {
        let tracker = quiet_tracker();

        assert_eq!(tracker.percent_started(), 0.0);
        assert_eq!(tracker.percent_completed(), 0.0);
        assert!(!tracker.is_progress_units());
        assert_eq!(tracker.batch_size(), 25);
    }

    #[test]
    fn test_set_batch_size_validation() {
        let tracker = quiet_tracker();

        assert!(!tracker.set_batch_size_from_str("abc"));
        assert!(!tracker.set_batch_size_from_str("-3"));
        assert!(!tracker.set_batch_size(0));
        assert_eq!(tracker.batch_size(), 25);

        assert!(tracker.set_batch_size(10));
        assert_eq!(tracker.batch_size(), 10);
        assert!(tracker.set_batch_size_from_str(" 12 "));
        assert_eq!(tracker.batch_size(), 12);
    }

    #[test]
    fn test_set_batch_size_from_value() {
        let tracker = quiet_tracker();

        assert!(!tracker.set_batch_size_from_value(&json!("abc")));
        assert!(!tracker.set_batch_size_from_value(&json!(2.5)));
        assert!(!tracker.set_batch_size_from_value(&json!(-1)));
        assert!(!tracker.set_batch_size_from_value(&json!(null)));
        assert_eq!(tracker.batch_size(), 25);

        assert!(tracker.set_batch_size_from_value(&json!(8)));
        assert_eq!(tracker.batch_size(), 8);
        assert!(tracker.set_batch_size_from_value(&json!(6.0)));
        assert_eq!(tracker.batch_size(), 6);
    }

    #[test]
    fn test_reset_progress_twice() {
        let tracker = quiet_tracker();
        tracker.set_batch_size(3);

        tracker.reset_progress();
        let once = tracker.snapshot();
        tracker.reset_progress();
        let twice = tracker.snapshot();

        assert_eq!(once.items_count(), twice.items_count());
        assert_eq!(once.items_started(), twice.items_started());
        assert_eq!(once.is_progress_units(), twice.is_progress_units());
        assert_eq!(twice.batch_size(), 3);
    }

    #[tokio::test]
    async fn test_start_uses_action_items() {
        let tracker = quiet_tracker();

        let state = tracker.start(ProgressOptions::default()).await.unwrap();

        // エラーを含むためリセットされない
        assert_eq!(state.items_count(), 5);
        assert_eq!(state.items_done(), 4);
        assert_eq!(state.items_done_with_error(), 1);
        assert!(state.is_progress_units());

        let seen = tracker.actions().seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(0, 'a'), (1, 'b'), (2, 'c'), (3, 'd'), (4, 'e')]);
    }

    #[tokio::test]
    async fn test_start_rejects_zero_batch_size() {
        let mut mock_config = MockProgressConfig::new();
        mock_config.expect_batch_size().return_const(0usize);
        mock_config
            .expect_finish_delay()
            .return_const(Duration::ZERO);
        mock_config.expect_enable_progress_reporting().return_const(false);

        let tracker = ProgressTracker::new(Letters::default(), mock_config, NoOpProgressReporter::new());
        let result = tracker.start(ProgressOptions::default()).await;

        assert!(matches!(result, Err(ProgressError::ConfigurationError { .. })));
        assert!(tracker.actions().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_with_no_items() {
        let tracker = quiet_tracker();

        let state = tracker
            .start_with_items(vec![], ProgressOptions::default().with_mode(ProgressMode::Batch))
            .await
            .unwrap();

        assert_eq!(state.items_count(), 0);
        assert!(state.is_settled());
        assert_eq!(tracker.percent_completed(), 0.0);
    }

    #[tokio::test]
    async fn test_reporter_receives_lifecycle() {
        let mut mock_reporter = MockProgressReporter::new();
        mock_reporter
            .expect_report_started()
            .with(eq(5), eq(ProgressMode::Sequential))
            .times(1)
            .returning(|_, _| ());
        mock_reporter
            .expect_report_progress()
            .times(5)
            .returning(|_| ());
        mock_reporter
            .expect_report_error()
            .with(eq(2), eq("bad letter"))
            .times(1)
            .returning(|_, _| ());
        mock_reporter
            .expect_report_completed()
            .with(eq(4), eq(1))
            .times(1)
            .returning(|_, _| ());

        let tracker = ProgressTracker::new(
            Letters::default(),
            DefaultProgressConfig::default(),
            mock_reporter,
        );
        tracker.start(ProgressOptions::default()).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reporter_completed_once_for_successful_run() {
        let mut mock_reporter = MockProgressReporter::new();
        mock_reporter
            .expect_report_started()
            .with(eq(2), eq(ProgressMode::Batch))
            .times(1)
            .returning(|_, _| ());
        mock_reporter
            .expect_report_progress()
            .times(2)
            .returning(|_| ());
        mock_reporter
            .expect_report_completed()
            .with(eq(2), eq(0))
            .times(1)
            .returning(|_, _| ());

        let tracker = ProgressTracker::new(
            Letters::default(),
            DefaultProgressConfig::default(),
            mock_reporter,
        );
        tracker
            .start_with_items(vec!['a', 'b'], ProgressOptions::default().with_mode(ProgressMode::Batch))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!tracker.is_progress_units());
    }

    #[tokio::test]
    async fn test_batch_index_is_position_in_chunk() {
        let tracker = quiet_tracker();
        tracker.set_batch_size(2);

        tracker
            .start(ProgressOptions::default().with_mode(ProgressMode::Batch))
            .await
            .unwrap();

        let seen = tracker.actions().seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(0, 'a'), (1, 'b'), (0, 'c'), (1, 'd'), (0, 'e')]);
    }

    #[tokio::test]
    async fn test_reporting_disabled() {
        // 期待値を設定しないモックは呼ばれるとパニックする
        let mock_reporter = MockProgressReporter::new();
        let tracker = ProgressTracker::new(
            Letters::default(),
            DefaultProgressConfig::default().with_progress_reporting(false),
            mock_reporter,
        );

        let state = tracker.start(ProgressOptions::default()).await.unwrap();
        assert_eq!(state.items_settled(), 5);
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let tracker = quiet_tracker();
        let handle = tracker.clone();

        tracker.set_batch_size(4);
        assert_eq!(handle.batch_size(), 4);
    }
}
