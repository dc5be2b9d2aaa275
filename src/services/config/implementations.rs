// 設定管理の具象実装

use crate::core::{ProgressConfig, DEFAULT_BATCH_SIZE};
use std::time::Duration;

/// 全件成功後、100%表示を見せてから完了フックを呼ぶまでの待ち時間
pub const DEFAULT_FINISH_DELAY: Duration = Duration::from_millis(300);

pub const ENV_BATCH_SIZE: &str = "PROGRESS_BATCH_SIZE";
pub const ENV_FINISH_DELAY_MS: &str = "PROGRESS_FINISH_DELAY_MS";
pub const ENV_REPORTING: &str = "PROGRESS_REPORTING";

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultProgressConfig {
    batch_size: usize,
    finish_delay: Duration,
    enable_progress: bool,
}

impl DefaultProgressConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_finish_delay(mut self, finish_delay: Duration) -> Self {
        self.finish_delay = finish_delay;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    /// 環境変数から設定を読み込む
    ///
    /// 解釈できない値は無視してデフォルト値を使う。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(batch_size) = lookup(ENV_BATCH_SIZE)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|v| *v > 0)
        {
            config.batch_size = batch_size;
        }

        if let Some(delay_ms) = lookup(ENV_FINISH_DELAY_MS).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.finish_delay = Duration::from_millis(delay_ms);
        }

        if let Some(enable) = lookup(ENV_REPORTING).and_then(|v| parse_flag(&v)) {
            config.enable_progress = enable;
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for DefaultProgressConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            finish_delay: DEFAULT_FINISH_DELAY,
            enable_progress: true,
        }
    }
}

impl ProgressConfig for DefaultProgressConfig {
    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn finish_delay(&self) -> Duration {
        self.finish_delay
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}
