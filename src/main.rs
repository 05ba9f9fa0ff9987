use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use vowel_lab::config::EngineConfig;
use vowel_lab::controller::{Action, Controller};
use vowel_lab::error::{ErrorCode, LayoutError, QuizError};
use vowel_lab::geometry::Point;
use vowel_lab::item::Item;
use vowel_lab::quiz::{Arrangement, QuizSession, Section, SectionId};


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON in {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_READ",
            Self::Parse { .. } => "E_PARSE",
            Self::Encode(_) => "E_ENCODE",
            Self::Layout(e) => e.error_code(),
            Self::Quiz(e) => e.error_code(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "vowel-lab", about = "Vowel lesson layout and quiz engine")]
struct Cli {
    /// Per-axis tolerance for placement quizzes. Overrides VOWEL_PLACEMENT_TOLERANCE.
    #[arg(long, global = true)]
    tolerance: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a quiz: submit every section's arrangement and print the result.
    Score(ScoreArgs),
    /// Replay scripted pointer gestures against a layout and print the final snapshot.
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// JSON array of sections.
    #[arg(long)]
    quiz: PathBuf,
    /// JSON object mapping section id to arrangement.
    #[arg(long)]
    answers: PathBuf,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// JSON array of items.
    #[arg(long)]
    items: PathBuf,
    /// JSON array of gesture steps.
    #[arg(long)]
    gestures: PathBuf,
    /// Replay in view mode (drags and resizes are ignored).
    #[arg(long)]
    view_only: bool,
}

/// One scripted input event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Down(Point),
    Move(Point),
    Up(Point),
    Cancel,
    Add(String),
    Remove(String),
    Style { id: String, patch: serde_json::Value },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = resolve_config(cli.tolerance);

    let outcome = match cli.command {
        Command::Score(args) => run_score(&args, &config),
        Command::Replay(args) => run_replay(&args, config),
    };
    match outcome {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, code = e.error_code(), "command failed");
            eprintln!("error [{}]: {e}", e.error_code());
            ExitCode::FAILURE
        }
    }
}

/// Environment config with the command-line override applied. Only a
/// finite, positive `--tolerance` replaces the environment value.
fn resolve_config(tolerance: Option<f64>) -> EngineConfig {
    let mut config = EngineConfig::from_env();
    if let Some(tolerance) = tolerance.filter(|t| t.is_finite() && *t > 0.0) {
        config.placement_tolerance = tolerance;
    }
    config
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Parse { path: path.to_path_buf(), source })
}

fn run_score(args: &ScoreArgs, config: &EngineConfig) -> Result<String, CliError> {
    let sections: Vec<Section> = read_json(&args.quiz)?;
    let answers: BTreeMap<SectionId, Arrangement> = read_json(&args.answers)?;

    let mut quiz = QuizSession::new(sections, config)?;
    quiz.start();
    for (section_id, arrangement) in &answers {
        quiz.submit_section(section_id, arrangement)?;
    }
    let result = quiz.complete()?;
    tracing::info!(percent = result.percent(), "quiz scored");
    Ok(serde_json::to_string_pretty(&result)?)
}

fn run_replay(args: &ReplayArgs, config: EngineConfig) -> Result<String, CliError> {
    let items: Vec<Item> = read_json(&args.items)?;
    let steps: Vec<Step> = read_json(&args.gestures)?;

    let mut controller = Controller::new(config);
    controller.load_items(items)?;
    controller.set_editable(!args.view_only);

    let mut commits = 0usize;
    for step in steps {
        let actions = match step {
            Step::Down(pt) => controller.pointer_down(pt),
            Step::Move(pt) => controller.pointer_move(pt),
            Step::Up(pt) => controller.pointer_up(pt)?,
            Step::Cancel => controller.pointer_cancel(),
            Step::Add(tag) => controller.add_item(&tag)?,
            Step::Remove(id) => controller.remove_item(&id),
            Step::Style { id, patch } => controller.update_style(&id, &patch)?,
        };
        for action in &actions {
            match action {
                Action::PositionsChanged(snapshot) => {
                    commits += 1;
                    tracing::info!(items = snapshot.len(), "positions changed");
                }
                Action::ItemClicked { id } => tracing::info!(%id, "item clicked"),
                Action::ItemsChanged(_) | Action::SelectionCleared | Action::RenderNeeded => {}
            }
        }
    }
    tracing::info!(commits, "replay finished");
    Ok(serde_json::to_string_pretty(&controller.store().snapshot())?)
}
