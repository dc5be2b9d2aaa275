// 進捗カウンターと完了判定

use serde::Serialize;

/// バッチサイズの初期値
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// 完了判定の結果
///
/// カウンター更新のたびに両方の判定を行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    /// 全件成功（遅延後に `on_finish` → リセット）
    pub finished: bool,
    /// 成功・失敗を問わず全件終了（即座に `on_finish_with_errors`、この判定自体はリセットしない）
    pub finished_with_errors: bool,
}

impl Completion {
    pub fn is_none(&self) -> bool {
        !self.finished && !self.finished_with_errors
    }
}

/// トラッカーが所有する進捗状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    is_progress_units: bool,
    items_to_progress: usize,
    items_started: usize,
    items_done: usize,
    items_done_with_error: usize,
    items_count: usize,
    batch_size: usize,
    #[serde(skip)]
    generation: u64,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl ProgressState {
    pub fn new(batch_size: usize) -> Self {
        Self {
            is_progress_units: false,
            items_to_progress: 0,
            items_started: 0,
            items_done: 0,
            items_done_with_error: 0,
            items_count: 0,
            batch_size,
            generation: 0,
        }
    }

    pub fn is_progress_units(&self) -> bool {
        self.is_progress_units
    }

    pub fn items_to_progress(&self) -> usize {
        self.items_to_progress
    }

    pub fn items_started(&self) -> usize {
        self.items_started
    }

    pub fn items_done(&self) -> usize {
        self.items_done
    }

    pub fn items_done_with_error(&self) -> usize {
        self.items_done_with_error
    }

    pub fn items_count(&self) -> usize {
        self.items_count
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// リセットのたびに進む実行世代
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 開始済みアイテムの割合 (%)
    pub fn percent_started(&self) -> f64 {
        percent(self.items_started, self.items_count)
    }

    /// 成功したアイテムの割合 (%)
    pub fn percent_completed(&self) -> f64 {
        percent(self.items_done, self.items_count)
    }

    /// 終了済み（成功 + エラー）のアイテム数
    pub fn items_settled(&self) -> usize {
        self.items_done + self.items_done_with_error
    }

    pub fn is_settled(&self) -> bool {
        self.items_settled() == self.items_count
    }

    /// カウンターを初期値に戻す。`batch_size` は保持する
    pub fn reset(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::new(self.batch_size)
        };
    }

    /// 新しい実行を開始し、その世代を返す
    pub fn begin_run(&mut self, items_count: usize) -> u64 {
        self.reset();
        self.items_count = items_count;
        self.is_progress_units = true;
        self.generation
    }

    /// `0` は受け付けない
    pub fn set_batch_size(&mut self, batch_size: usize) -> bool {
        if batch_size == 0 {
            return false;
        }
        self.batch_size = batch_size;
        true
    }

    pub fn set_items_to_progress(&mut self, value: usize) {
        self.items_to_progress = value;
    }

    pub fn add_items_to_progress(&mut self, value: usize) {
        self.items_to_progress += value;
    }

    pub fn mark_started(&mut self) {
        self.items_started += 1;
    }

    pub fn mark_done(&mut self) -> Completion {
        self.items_done += 1;
        self.check_completion()
    }

    pub fn mark_failed(&mut self) -> Completion {
        self.items_done_with_error += 1;
        self.check_completion()
    }

    /// 両方の完了判定を実行
    pub fn check_completion(&self) -> Completion {
        Completion {
            finished: self.check_finished(),
            finished_with_errors: self.check_finished_with_errors(),
        }
    }

    fn check_finished(&self) -> bool {
        self.items_done > 0 && self.items_done == self.items_count
    }

    // 全件成功でも成立する。check_finished とは排他ではない
    fn check_finished_with_errors(&self) -> bool {
        self.items_settled() > 0 && self.is_settled()
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 100.0) / total as f64
}
