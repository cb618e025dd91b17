use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

use doc_analyzer::agents::DocumentAnalyst;
use doc_analyzer::documents::UploadedFile;
use doc_analyzer::prompts::{AnalysisMode, SummaryLength};
use doc_analyzer::session::SessionState;
use doc_analyzer::utils::{format_timestamp, init_fallback_logger, init_logger};
use doc_analyzer::{config::Config, create_router, AppState};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Parser)]
#[command(name = "doc-analyzer")]
#[command(about = "Upload a document and ask questions or get AI-powered analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Analyze a local PDF or TXT file once and print the result
    Analyze {
        path: PathBuf,
        /// qa, summary, key_points or report
        #[arg(long, default_value = "report")]
        mode: AnalysisMode,
        /// Required for qa
        #[arg(long)]
        question: Option<String>,
        /// short, medium or long (summary only)
        #[arg(long)]
        length: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_fallback_logger();
            error!(error = %e, "Configuration Error");
            eprintln!("Configuration Error: {}", e);
            eprintln!("Please set up your .env file with GROQ_API_KEY");
            std::process::exit(2);
        }
    };

    let _log_guard = init_logger(&config.app);
    info!(app = %config.app.name, llm = ?config.llm, "Configuration loaded");

    match cli.command.unwrap_or(Command::Serve { host: None, port: None }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Analyze {
            path,
            mode,
            question,
            length,
        } => analyze(config, path, mode, question, length).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let idle_minutes = config.app.session_idle_minutes;
    let state = AppState::new(config);

    if idle_minutes > 0 {
        let idle_for = Duration::from_secs(idle_minutes.saturating_mul(60));
        state.sessions.spawn_sweeper(idle_for, SWEEP_INTERVAL);
        info!(idle_minutes, "Idle session sweeper started");
    }

    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn analyze(
    config: Config,
    path: PathBuf,
    mode: AnalysisMode,
    question: Option<String>,
    length: Option<String>,
) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let analyst = DocumentAnalyst::from_config(&config);
    let mut session = SessionState::new();
    let document = analyst
        .load_document(&mut session, UploadedFile::new(filename, bytes))
        .await?;

    eprintln!(
        "[{}] {} of {} ({} characters)",
        format_timestamp(),
        mode.label(),
        document.filename(),
        document.char_count()
    );

    let length = SummaryLength::from(length.as_deref());
    let output = match mode {
        AnalysisMode::QuestionAnswering => {
            let question = question.unwrap_or_default();
            analyst.ask(&mut session, &question, mode, &length).await?
        }
        AnalysisMode::Summary => analyst.summarize(&mut session, &length).await?,
        AnalysisMode::KeyPoints => analyst.key_points(&mut session).await?,
        AnalysisMode::FullReport => analyst.report(&mut session).await?,
    };

    println!("{}", output);
    Ok(())
}
