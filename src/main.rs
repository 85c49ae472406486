//! `dex-engine` - Load a DEX model and rank alternatives against it.
//!
//! Configuration comes from `DEX_ENGINE__*` environment variables. Without
//! `DEX_ENGINE__MODEL__ALTERNATIVES_PATH` the tool prints the model's inputs
//! and evaluation schedule; with it, it prints the ranking as JSON. Setting
//! `DEX_ENGINE__MODEL__SUGGEST_FOR` to an alternative id adds the improved
//! options found for that alternative.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use dex_engine::adapters::FileModelSource;
use dex_engine::config::{ConfigError, EngineConfig, SearchConfig, ValidationError};
use dex_engine::domain::analysis::{
    ranked, score_alternatives, skipped, Alternative, ImprovedOption, OptionGenerator,
    RankedAlternative, SkippedAlternative,
};
use dex_engine::ports::DefinitionError;
use dex_engine::telemetry::{self, TelemetryError};
use dex_engine::{Assignment, DexError, DexModel, ModelLoader};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Model(#[from] DexError),

    #[error("Cannot read alternatives from {path}: {message}")]
    Alternatives { path: String, message: String },

    #[error("No alternative named '{0}' to suggest options for")]
    UnknownAlternative(String),

    #[error("Cannot write output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ModelSummary<'a> {
    name: Option<&'a str>,
    method: String,
    inputs: Vec<InputSummary<'a>>,
    schedule: Vec<LevelSummary<'a>>,
}

#[derive(Serialize)]
struct InputSummary<'a> {
    attribute: &'a str,
    values: Vec<&'a str>,
}

#[derive(Serialize)]
struct LevelSummary<'a> {
    level: usize,
    functions: Vec<&'a str>,
}

#[derive(Serialize)]
struct RankingReport<'a> {
    model: Option<&'a str>,
    method: String,
    ranking: Vec<RankedAlternative>,
    skipped: Vec<SkippedAlternative>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<Suggestions>,
}

#[derive(Serialize)]
struct Suggestions {
    alternative: String,
    options: Vec<ImprovedOption>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dex-engine: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let config = EngineConfig::load()?;
    config.validate()?;
    telemetry::init(&config.logging)?;

    let source = FileModelSource::new(config.model.require_path()?)?;
    let model = ModelLoader::from_config(&config.quantification).load(&source)?;

    let output = match &config.model.alternatives_path {
        Some(path) => {
            let alternatives = read_alternatives(path)?;
            info!(count = alternatives.len(), "ranking alternatives");
            let scores = score_alternatives(&model, &alternatives);
            let suggestions = match &config.model.suggest_for {
                Some(id) => Some(suggest(&model, &config.search, &alternatives, id)?),
                None => None,
            };
            serde_json::to_string_pretty(&RankingReport {
                model: model.name(),
                method: model.method().to_string(),
                ranking: ranked(&scores),
                skipped: skipped(&scores),
                suggestions,
            })?
        }
        None => serde_json::to_string_pretty(&summarize(&model))?,
    };

    println!("{}", output);
    Ok(())
}

/// Reads `{"<id>": {"<attribute>": value, ...}, ...}`.
fn read_alternatives(path: &Path) -> Result<Vec<Alternative>, AppError> {
    let failure = |message: String| AppError::Alternatives {
        path: path.display().to_string(),
        message,
    };
    let document = fs::read_to_string(path).map_err(|e| failure(e.to_string()))?;
    let rows: BTreeMap<String, Assignment> =
        serde_json::from_str(&document).map_err(|e| failure(e.to_string()))?;
    Ok(rows
        .into_iter()
        .map(|(id, inputs)| Alternative::new(id, inputs))
        .collect())
}

fn suggest(
    model: &DexModel,
    search: &SearchConfig,
    alternatives: &[Alternative],
    id: &str,
) -> Result<Suggestions, AppError> {
    let alternative = alternatives
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| AppError::UnknownAlternative(id.to_string()))?;
    let options = OptionGenerator::from_config(model, search).suggest(&alternative.inputs, &[])?;
    info!(alternative = %id, options = options.len(), "options suggested");
    Ok(Suggestions {
        alternative: id.to_string(),
        options,
    })
}

fn summarize(model: &DexModel) -> ModelSummary<'_> {
    ModelSummary {
        name: model.name(),
        method: model.method().to_string(),
        inputs: model
            .input_attributes()
            .map(|a| InputSummary {
                attribute: a.name(),
                values: a.scale().value_names().collect(),
            })
            .collect(),
        schedule: model
            .functions_by_level()
            .into_iter()
            .map(|(level, functions)| LevelSummary {
                level,
                functions: functions.into_iter().map(|f| f.name()).collect(),
            })
            .collect(),
    }
}
