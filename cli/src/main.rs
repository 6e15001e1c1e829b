mod api;
mod config;
mod file_store;
mod render;

use api::ApiClient;
use clap::{Parser, Subcommand};
use config::{ClientConfig, ConfigError};
use file_store::FileStore;
use render::{BundleView, HistoryView, TrainingInfoView};
use shared::{ClientError, SessionAssembler, SessionId};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "textclf", version, about = "Compare three text classifiers and keep a history of runs")]
struct Cli {
    /// Backend base URL, overrides TEXTCLF_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the history file, overrides TEXTCLF_HISTORY_DIR
    #[arg(long, global = true)]
    history_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a piece of text
    Predict { text: String },
    /// Classify the contents of a .txt, .csv, .json or .pdf file
    Upload { file: PathBuf },
    /// List past runs, newest first
    History,
    /// Show a past run again
    Show { id: SessionId },
    /// Delete one past run
    Delete { id: SessionId },
    /// Delete every past run
    Clear,
    /// Show how the models were trained
    TrainingInfo,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Please enter some text.")]
    EmptyText,
    #[error("No session {0} in history.")]
    UnknownSession(SessionId),
}

impl CliError {
    fn user_message(&self) -> String {
        match self {
            CliError::Client(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:?}", e);
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::load()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(dir) = cli.history_dir {
        config.history_dir = dir;
    }
    log::debug!("Using backend {} and history in {}", config.api_url, config.history_dir.display());

    let mut assembler = SessionAssembler::open(FileStore::new(&config.history_dir));

    match cli.command {
        Command::Predict { text } => {
            let text = text.trim();
            if text.is_empty() {
                return Err(CliError::EmptyText);
            }
            let api = ApiClient::new(&config)?;
            let response = api.predict(text).await?;
            let bundle = assembler.submit(&response, Some(text))?;
            print!("{}", BundleView(&bundle));
            warn_if_memory_only(&assembler);
        }
        Command::Upload { file } => {
            let contents = tokio::fs::read(&file).await.map_err(|source| CliError::Io {
                path: file.clone(),
                source,
            })?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.txt".to_string());
            let api = ApiClient::new(&config)?;
            let response = api.upload(file_name, contents).await?;
            let bundle = assembler.submit(&response, None)?;
            print!("{}", BundleView(&bundle));
            warn_if_memory_only(&assembler);
        }
        Command::History => {
            let rows = assembler.history_rows();
            let view = HistoryView {
                sessions: assembler.history().list(),
                rows: &rows,
            };
            print!("{}", view);
        }
        Command::Show { id } => {
            let bundle = assembler.replay(id).ok_or(CliError::UnknownSession(id))?;
            print!("{}", BundleView(&bundle));
        }
        Command::Delete { id } => {
            if assembler.history_mut().remove(id)? {
                println!("Deleted session {}.", id);
            } else {
                println!("No session {} in history; nothing deleted.", id);
            }
        }
        Command::Clear => {
            assembler.history_mut().clear()?;
            println!("History cleared.");
        }
        Command::TrainingInfo => {
            let api = ApiClient::new(&config)?;
            let info = api.training_info().await?;
            print!("{}", TrainingInfoView(&info));
        }
    }

    Ok(())
}

fn warn_if_memory_only(assembler: &SessionAssembler<FileStore>) {
    if !assembler.history().is_persistent() {
        eprintln!(
            "Warning: {}",
            ClientError::StorageUnavailable(String::new()).user_message()
        );
    }
}
