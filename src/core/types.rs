// 進捗処理に関連するデータ型定義

use super::error::{ProgressError, ProgressResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// アイテムの実行方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressMode {
    /// 1件ずつ順番に実行
    #[default]
    Sequential,
    /// 全件を待たずに同時実行
    Simultaneous,
    /// バッチサイズごとに分割し、バッチ単位で順番に実行
    Batch,
}

impl ProgressMode {
    pub const ALL: [ProgressMode; 3] = [Self::Sequential, Self::Simultaneous, Self::Batch];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "SEQUENTIAL",
            Self::Simultaneous => "SIMULTANEOUS",
            Self::Batch => "BATCH",
        }
    }

    /// 未知の値・空文字列は `Sequential` に正規化する
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for ProgressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressMode {
    type Err = ProgressError;

    fn from_str(value: &str) -> ProgressResult<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SEQUENTIAL" | "SEQUENTIAL_REQUESTS" => Ok(Self::Sequential),
            "SIMULTANEOUS" | "SIMULTANEOUS_REQUESTS" => Ok(Self::Simultaneous),
            "BATCH" | "BATCH_REQUESTS" => Ok(Self::Batch),
            other => Err(ProgressError::validation(
                "progressMode",
                format!("未知のモード: {other:?}"),
            )),
        }
    }
}

const MODE_KEY: &str = "progressMode";
const SHUFFLE_KEYS: [&str; 2] = ["shuffle", "patchAsRandom"];

/// `start` に渡す実行オプション
///
/// `params` には認識しないキーがそのまま保持され、`run_action` に渡される。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressOptions {
    pub progress_mode: ProgressMode,
    pub shuffle: bool,
    pub params: Map<String, Value>,
}

impl ProgressOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ProgressMode) -> Self {
        self.progress_mode = mode;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// JSON値からオプションを構築
    ///
    /// オブジェクト以外の入力はデフォルト値になる。
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let progress_mode = map
            .get(MODE_KEY)
            .and_then(Value::as_str)
            .map(ProgressMode::parse_or_default)
            .unwrap_or_default();

        let shuffle = SHUFFLE_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .map(is_truthy)
            .unwrap_or(false);

        let params = map
            .iter()
            .filter(|(key, _)| key.as_str() != MODE_KEY && !SHUFFLE_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            progress_mode,
            shuffle,
            params,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}
