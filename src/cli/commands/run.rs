use crate::core::{ProgressActions, ProgressMode, ProgressOptions, ProgressState};
use crate::engine::{run_to_settlement, ProgressTracker};
use crate::factories::{
    ComponentConfig, ComponentFactory, ProgressConfigFactory, ProgressReporterFactory,
};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

/// Configuration struct for run command to reduce argument count
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub items: usize,
    pub mode: String,
    pub batch_size: Option<usize>,
    pub shuffle: bool,
    pub fail_every: Option<usize>,
    pub delay_ms: u64,
    pub finish_delay_ms: u64,
    pub quiet: bool,
    pub json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            items: 20,
            mode: ProgressMode::default().to_string(),
            batch_size: None,
            shuffle: false,
            fail_every: None,
            delay_ms: 20,
            finish_delay_ms: 300,
            quiet: false,
            json: false,
        }
    }
}

/// 実行結果のサマリー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub mode: ProgressMode,
    pub items: usize,
    pub done: usize,
    pub errors: usize,
    pub percent_completed: f64,
    pub finished: bool,
    pub finished_with_errors: bool,
}

impl RunSummary {
    fn from_state(mode: ProgressMode, state: &ProgressState) -> Self {
        let completion = state.check_completion();
        Self {
            mode,
            items: state.items_count(),
            done: state.items_done(),
            errors: state.items_done_with_error(),
            percent_completed: state.percent_completed(),
            finished: completion.finished,
            finished_with_errors: completion.finished_with_errors,
        }
    }
}

/// 擬似的な非同期アクション
///
/// アイテム `i` は `delay * (i % 3 + 1)` だけ待機し、`fail_every` 件ごとに失敗する。
pub struct SimulatedActions {
    items: usize,
    fail_every: Option<usize>,
    delay: Duration,
    verbose: bool,
}

impl SimulatedActions {
    pub fn new(items: usize, fail_every: Option<usize>, delay: Duration) -> Self {
        Self {
            items,
            fail_every,
            delay,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn should_fail(&self, item: usize) -> bool {
        self.fail_every
            .is_some_and(|every| every > 0 && (item + 1) % every == 0)
    }
}

#[async_trait]
impl ProgressActions for SimulatedActions {
    type Item = usize;

    fn action_items(&self) -> Vec<usize> {
        (0..self.items).collect()
    }

    async fn run_action(&self, item: &usize, _options: &ProgressOptions, _index: usize) -> Result<()> {
        let factor = (*item % 3 + 1) as u32;
        tokio::time::sleep(self.delay * factor).await;

        if self.should_fail(*item) {
            anyhow::bail!("simulated failure for item {item}");
        }
        Ok(())
    }

    fn on_finish(&self) {
        if self.verbose {
            println!("🏁 All items finished");
        }
    }

    fn on_finish_with_errors(&self) {
        if self.verbose {
            println!("📋 All items settled");
        }
    }
}

/// runコマンドの実行
pub async fn execute_run(config: RunConfig) -> Result<RunSummary> {
    let mode = match config.mode.parse::<ProgressMode>() {
        Ok(mode) => mode,
        Err(error) => {
            if !config.quiet {
                eprintln!("⚠️  {error}. Falling back to {}", ProgressMode::default());
            }
            ProgressMode::default()
        }
    };

    // 環境変数の設定をベースに、コマンドライン引数で上書き
    let mut parameters = json!({
        "finish_delay_ms": config.finish_delay_ms,
        "enable_progress": !config.quiet,
    });
    if let Some(batch_size) = config.batch_size {
        parameters["batch_size"] = json!(batch_size);
    }
    let progress_config =
        ProgressConfigFactory::new().create(&ComponentConfig::new("env", parameters))?;

    let reporter_kind = if config.quiet { "noop" } else { "console" };
    let reporter = ProgressReporterFactory::new().create(&ComponentConfig::new(
        reporter_kind,
        json!({ "interval": (config.items / 10).max(1) }),
    ))?;

    let actions = SimulatedActions::new(
        config.items,
        config.fail_every,
        Duration::from_millis(config.delay_ms),
    )
    .verbose(!config.quiet);

    let tracker = ProgressTracker::new(actions, progress_config, reporter);

    if !config.quiet {
        println!("⚙️  設定:");
        println!("   - モード: {mode}");
        println!("   - アイテム数: {}", config.items);
        println!("   - バッチサイズ: {}", tracker.batch_size());
        println!("   - シャッフル: {}", config.shuffle);
    }

    let options = ProgressOptions::new()
        .with_mode(mode)
        .with_shuffle(config.shuffle);
    let settled = run_to_settlement(&tracker, options).await?;
    let summary = RunSummary::from_state(mode, &settled);

    // 全件成功の場合は完了フックとリセットを待つ
    if summary.finished {
        let mut receiver = tracker.subscribe();
        if let Err(error) = receiver.wait_for(|state| !state.is_progress_units()).await {
            anyhow::bail!("完了待ちに失敗しました: {error}");
        };
    }

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !config.quiet {
        println!("\n📊 処理結果:");
        println!("   - 対象アイテム数: {}", summary.items);
        println!("   - 成功数: {}", summary.done);
        println!("   - エラー数: {}", summary.errors);
        println!("   - 完了率: {:.1}%", summary.percent_completed);
    }

    Ok(summary)
}
