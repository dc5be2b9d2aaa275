// 設定管理機能
// バッチサイズ、完了待ち時間、進捗報告の有無

pub mod implementations;

// 公開API
pub use implementations::{DefaultProgressConfig, DEFAULT_FINISH_DELAY};
