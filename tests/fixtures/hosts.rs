// テスト用のホスト実装
// 全てのフック呼び出しをイベントとして記録する

#![allow(dead_code)]

use async_trait::async_trait;
use progress_action::{ProgressActions, ProgressMode, ProgressOptions, ProgressState};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::sync::watch;

/// 記録されるフックイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Started { index: usize, item: u32 },
    Success { index: usize, item: u32, mode: ProgressMode },
    Error { index: usize, item: u32, mode: ProgressMode, message: String },
    Finish,
    FinishWithErrors,
}

/// イベントを記録するホスト
///
/// `observer` にトラッカーの購読を設定すると、各アクション開始時の
/// `(item, items_to_progress)` を記録する。
#[derive(Clone, Default)]
pub struct RecordingHost {
    pub items: Vec<u32>,
    pub failing: HashSet<u32>,
    pub delays: HashMap<u32, Duration>,
    pub events: Arc<Mutex<Vec<HostEvent>>>,
    pub to_progress_at_start: Arc<Mutex<Vec<(usize, usize)>>>,
    pub options_seen: Arc<Mutex<Vec<ProgressOptions>>>,
    pub observer: Arc<OnceLock<watch::Receiver<ProgressState>>>,
}

impl RecordingHost {
    pub fn new(count: u32) -> Self {
        Self {
            items: (0..count).collect(),
            ..Self::default()
        }
    }

    pub fn failing(mut self, items: &[u32]) -> Self {
        self.failing.extend(items.iter().copied());
        self
    }

    pub fn delay(mut self, item: u32, delay: Duration) -> Self {
        self.delays.insert(item, delay);
        self
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&HostEvent) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }

    pub fn success_indices(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Success { index, .. } => Some(index),
                _ => None,
            })
            .collect()
    }

    /// 条件を満たすまで待つ（最大1秒）
    pub async fn wait_until(&self, condition: impl Fn(&Self) -> bool) -> bool {
        for _ in 0..1000 {
            if condition(self) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        false
    }

    /// 条件を満たすイベントが記録されるまで待つ
    pub async fn wait_for_event(&self, predicate: impl Fn(&HostEvent) -> bool) -> bool {
        self.wait_until(|host| host.events().iter().any(&predicate))
            .await
    }

    /// 開始順の `(item, index)`
    pub fn started(&self) -> Vec<(u32, usize)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Started { index, item } => Some((item, index)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ProgressActions for RecordingHost {
    type Item = u32;

    fn action_items(&self) -> Vec<u32> {
        self.items.clone()
    }

    async fn run_action(
        &self,
        item: &u32,
        options: &ProgressOptions,
        index: usize,
    ) -> anyhow::Result<()> {
        self.record(HostEvent::Started { index, item: *item });
        self.options_seen.lock().unwrap().push(options.clone());
        if let Some(receiver) = self.observer.get() {
            let to_progress = receiver.borrow().items_to_progress();
            self.to_progress_at_start
                .lock()
                .unwrap()
                .push((*item as usize, to_progress));
        }

        if let Some(delay) = self.delays.get(item) {
            tokio::time::sleep(*delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        if self.failing.contains(item) {
            anyhow::bail!("item {item} failed");
        }
        Ok(())
    }

    fn on_item_success(&self, item: &u32, mode: ProgressMode, index: usize) {
        self.record(HostEvent::Success {
            index,
            item: *item,
            mode,
        });
    }

    fn on_item_error(&self, error: &anyhow::Error, mode: ProgressMode, item: &u32, index: usize) {
        self.record(HostEvent::Error {
            index,
            item: *item,
            mode,
            message: error.to_string(),
        });
    }

    fn on_finish(&self) {
        self.record(HostEvent::Finish);
    }

    fn on_finish_with_errors(&self) {
        self.record(HostEvent::FinishWithErrors);
    }
}
