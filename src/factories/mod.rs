//! ファクトリーモジュール - JSONパラメータからコンポーネントを構築
//!
//! 実装名とパラメータの組 (`ComponentConfig`) から
//! `Box<dyn ProgressConfig>` / `Box<dyn ProgressReporter>` を生成する。

pub mod progress_config_factory;
pub mod progress_reporter_factory;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use progress_config_factory::ProgressConfigFactory;
pub use progress_reporter_factory::ProgressReporterFactory;

/// 各コンポーネントの設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub implementation: String,
    pub parameters: serde_json::Value,
}

impl ComponentConfig {
    pub fn new(implementation: &str, parameters: serde_json::Value) -> Self {
        Self {
            implementation: implementation.to_string(),
            parameters,
        }
    }
}

/// 実装名で切り替えるコンポーネントファクトリー
pub trait ComponentFactory<T> {
    fn create(&self, config: &ComponentConfig) -> Result<T>;

    fn available_implementations(&self) -> Vec<String>;

    fn get_description(&self, implementation: &str) -> Option<String>;
}
