//! ProgressConfigFactory - 進捗設定の Factory Pattern 実装

use super::{ComponentConfig, ComponentFactory};
use crate::core::ProgressConfig;
use crate::services::DefaultProgressConfig;
use anyhow::Result;
use std::time::Duration;

pub struct ProgressConfigFactory;

impl ProgressConfigFactory {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProgressConfigFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentFactory<Box<dyn ProgressConfig>> for ProgressConfigFactory {
    fn create(&self, config: &ComponentConfig) -> Result<Box<dyn ProgressConfig>> {
        let mut progress_config = match config.implementation.as_str() {
            "default" => DefaultProgressConfig::default(),
            "env" => DefaultProgressConfig::from_env(),
            _ => anyhow::bail!(
                "未サポートのProgressConfig実装: {}. 利用可能: default, env",
                config.implementation
            ),
        };

        if let Some(batch_size) = config.parameters.get("batch_size").and_then(|v| v.as_u64()) {
            if batch_size == 0 {
                anyhow::bail!("バッチサイズは1以上である必要があります");
            }
            progress_config = progress_config.with_batch_size(batch_size as usize);
        }

        if let Some(delay_ms) = config
            .parameters
            .get("finish_delay_ms")
            .and_then(|v| v.as_u64())
        {
            progress_config = progress_config.with_finish_delay(Duration::from_millis(delay_ms));
        }

        if let Some(enable) = config
            .parameters
            .get("enable_progress")
            .and_then(|v| v.as_bool())
        {
            progress_config = progress_config.with_progress_reporting(enable);
        }

        Ok(Box::new(progress_config))
    }

    fn available_implementations(&self) -> Vec<String> {
        vec!["default".to_string(), "env".to_string()]
    }

    fn get_description(&self, implementation: &str) -> Option<String> {
        match implementation {
            "default" => Some("デフォルトの進捗設定 (バッチサイズ25, 完了待ち300ms)".to_string()),
            "env" => Some("環境変数 PROGRESS_* から読み込む進捗設定".to_string()),
            _ => None,
        }
    }
}
