// エンジン層 - 実行方式の切り替えとオーケストレーション
// コア層のトレイトとサービス層の実装を組み合わせて高レベルな処理を提供

pub mod api;
pub mod partition;
pub mod tracker;

// 公開API - 主要エンジンクラス
pub use api::{create_default_tracker, create_quiet_tracker, run_to_settlement};
pub use partition::{chunk, shuffled, shuffled_with};
pub use tracker::ProgressTracker;
