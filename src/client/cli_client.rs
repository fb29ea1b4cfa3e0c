use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Parser;
use log::info;
use serde::Serialize;

use crate::client::config::ClientConfig;
use crate::client::models::upload::{UploadFile, UploadPanel, UploadSource};
use crate::client::services::analyzer::IngredientAnalyzer;
use crate::client::services::file_loader;

/// Score an ingredient-list photo from the command line.
#[derive(Debug, Parser)]
#[command(name = "health-score-cli", version, about)]
pub struct CliArgs {
    /// Image of the ingredient list
    pub image: PathBuf,
    /// Analyzer backend: placeholder or http (overrides ANALYZER_BACKEND)
    #[arg(long)]
    pub backend: Option<String>,
    /// Analysis endpoint URL (overrides ANALYZER_ENDPOINT)
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds for the http backend
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(backend) = &self.backend {
            config.analyzer_backend = backend.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.analyzer_endpoint = Some(endpoint.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config.analyzer_timeout = std::time::Duration::from_secs(secs);
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScoreReport {
    pub file: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub score: u8,
    pub label: String,
    pub ingredients: Vec<String>,
}

fn rejection<M>(panel: &UploadPanel<M>) -> String {
    panel
        .error()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "upload rejected".to_string())
}

/// Loads `path` the way the window does: screened from metadata first, read only if it passes.
pub async fn load_checked(path: PathBuf) -> anyhow::Result<UploadFile> {
    let candidate = file_loader::inspect(path).await?;
    {
        let mut panel = UploadPanel::new(|accepted: UploadFile| accepted);
        if !panel.screen(&candidate, UploadSource::Picker, false) {
            bail!(rejection(&panel));
        }
    }
    Ok(file_loader::load_upload(candidate).await?)
}

/// Runs a file through the same validation as the GUI, then analyses it.
pub async fn score_file(file: UploadFile, analyzer: &dyn IngredientAnalyzer) -> anyhow::Result<ScoreReport> {
    let accepted = {
        let mut panel = UploadPanel::new(|accepted: UploadFile| accepted);
        match panel.select_file(file, false) {
            Some(accepted) => accepted,
            None => bail!(rejection(&panel)),
        }
    };

    let result = analyzer
        .analyze(accepted.shared_bytes(), accepted.mime_type())
        .await
        .map_err(|e| anyhow!("Analysis failed: {}", e))?;
    let card = result.card();

    Ok(ScoreReport {
        file: accepted.name().to_string(),
        mime_type: accepted.mime_type().to_string(),
        size_bytes: accepted.size(),
        score: card.score.value(),
        label: card.label().to_string(),
        ingredients: card.ingredients.to_vec(),
    })
}

pub fn render_text(report: &ScoreReport) -> String {
    let mut out = format!(
        "{} ({}, {} bytes)\nHealth Score: {}% - {}\nIngredients ({}):\n",
        report.file,
        report.mime_type,
        report.size_bytes,
        report.score,
        report.label,
        report.ingredients.len()
    );
    for ingredient in &report.ingredients {
        out.push_str("  - ");
        out.push_str(ingredient);
        out.push('\n');
    }
    out
}

pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env();
    args.apply(&mut config);
    crate::utils::logger::AppLogger::init(&config.log_level);

    let analyzer = config.build_analyzer()?;
    let file = load_checked(args.image.clone()).await?;
    info!("scoring {} with the {} analyzer", file.name(), analyzer.name());

    let report = score_file(file, analyzer.as_ref()).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}
