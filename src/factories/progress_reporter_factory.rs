//! ProgressReporterFactory - 進捗報告の Factory Pattern 実装

use super::{ComponentConfig, ComponentFactory};
use crate::core::ProgressReporter;
use crate::services::{ConsoleProgressReporter, NoOpProgressReporter};
use anyhow::Result;

pub struct ProgressReporterFactory;

impl ProgressReporterFactory {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProgressReporterFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentFactory<Box<dyn ProgressReporter>> for ProgressReporterFactory {
    fn create(&self, config: &ComponentConfig) -> Result<Box<dyn ProgressReporter>> {
        match config.implementation.as_str() {
            "console" => {
                let quiet = config
                    .parameters
                    .get("quiet")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);

                let mut reporter = if quiet {
                    ConsoleProgressReporter::quiet()
                } else {
                    ConsoleProgressReporter::new()
                };

                if let Some(interval) = config.parameters.get("interval").and_then(|v| v.as_u64()) {
                    reporter = reporter.with_interval(interval as usize);
                }

                Ok(Box::new(reporter))
            }
            "noop" => Ok(Box::new(NoOpProgressReporter::new())),
            _ => anyhow::bail!(
                "未サポートのProgressReporter実装: {}. 利用可能: console, noop",
                config.implementation
            ),
        }
    }

    fn available_implementations(&self) -> Vec<String> {
        vec!["console".to_string(), "noop".to_string()]
    }

    fn get_description(&self, implementation: &str) -> Option<String> {
        match implementation {
            "console" => Some("コンソール出力による進捗報告".to_string()),
            "noop" => Some("何もしない進捗報告 (テスト・ベンチマーク用)".to_string()),
            _ => None,
        }
    }
}
