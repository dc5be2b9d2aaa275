use crate::core::ProgressMode;

/// 受け付けるモード名の一覧
pub fn mode_names() -> Vec<(ProgressMode, [String; 2])> {
    ProgressMode::ALL
        .iter()
        .map(|mode| (*mode, [mode.as_str().to_string(), format!("{}_REQUESTS", mode.as_str())]))
        .collect()
}

pub fn execute_modes() {
    println!("Available modes (case-insensitive, unknown values fall back to {}):", ProgressMode::default());
    for (mode, names) in mode_names() {
        println!("  - {mode}: {}", names.join(", "));
    }
}
