// テストユーティリティとホスト実装
// フック呼び出しを記録するProgressActions実装

pub mod hosts;

// 公開API
pub use hosts::*;
