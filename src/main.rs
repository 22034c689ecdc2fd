use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meeting_scribe::http::{create_router, AppState};
use meeting_scribe::logging;
use meeting_scribe::session::SessionCoordinator;
use meeting_scribe::Config;
use reqwest::StatusCode;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "meeting-scribe",
    version,
    about = "Meeting transcription and protocol generation"
)]
struct Cli {
    /// Path to config file (extension optional)
    #[arg(short, long, default_value = "config/meeting-scribe")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the recording daemon
    Serve,

    /// Start a new recording session
    Start {
        /// Meeting title
        #[arg(short, long)]
        title: Option<String>,

        /// Participant name (repeatable)
        #[arg(short, long = "participant")]
        participants: Vec<String>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// End the active session and write the summary
    End,

    /// Capture a screenshot into the active session
    Screenshot,

    /// Show the current session status
    Status,

    /// List saved meetings, most recent first
    List,

    /// Search saved meetings by title, participant, tag, or content
    Search {
        query: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // A missing config file means defaults; a broken one is an error.
    let config = Config::load_or_default(&cli.config)?;
    let _guard = logging::init(&config, matches!(cli.command, Command::Serve));

    match cli.command {
        Command::Serve => {
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Start {
            title,
            participants,
            tags,
        } => {
            let body = serde_json::json!({
                "title": title,
                "participants": participants,
                "tags": tags,
            });
            send_command(&config, Verb::Post, "/session/start", None, Some(body)).await
        }
        Command::End => send_command(&config, Verb::Post, "/session/end", None, None).await,
        Command::Screenshot => {
            send_command(&config, Verb::Post, "/session/screenshot", None, None).await
        }
        Command::Status => send_command(&config, Verb::Get, "/session/status", None, None).await,
        Command::List => send_command(&config, Verb::Get, "/meetings", None, None).await,
        Command::Search { query } => {
            send_command(
                &config,
                Verb::Get,
                "/meetings/search",
                Some(("q", query.as_str())),
                None,
            )
            .await
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("meeting-scribe v{}", env!("CARGO_PKG_VERSION"));

    if config.audio.enabled {
        config.validate_azure()?;
    } else {
        info!("Audio capture disabled in config");
    }

    let coordinator = Arc::new(SessionCoordinator::new(config.clone()));
    let state = AppState::new(coordinator);
    let router = create_router(state);

    let addr = format!("{}:{}", config.http.bind, config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Control API listening on {}", addr);
    info!("Meetings directory: {}", config.paths.meetings);

    axum::serve(listener, router)
        .await
        .context("HTTP server error")?;

    Ok(())
}

enum Verb {
    Get,
    Post,
}

/// Send one control command to the daemon. Exit code 0 on success, 2 on
/// invalid session state, 1 otherwise.
async fn send_command(
    config: &Config,
    verb: Verb,
    path: &str,
    query: Option<(&str, &str)>,
    body: Option<serde_json::Value>,
) -> Result<ExitCode> {
    let url = format!("http://{}:{}{}", config.http.bind, config.http.port, path);
    let client = reqwest::Client::new();

    let mut request = match verb {
        Verb::Get => client.get(&url),
        Verb::Post => client.post(&url).json(&body.unwrap_or_else(|| serde_json::json!({}))),
    };
    if let Some((key, value)) = query {
        request = request.query(&[(key, value)]);
    }

    let response = request.send().await.with_context(|| {
        format!(
            "Could not reach the daemon at {}. Is it running? Start it with `meeting-scribe serve`",
            url
        )
    })?;

    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if status.is_success() {
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => println!("{}", text),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(text);
    eprintln!("Error: {}", message);

    if status == StatusCode::CONFLICT {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::from(1))
    }
}
