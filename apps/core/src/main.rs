// Intentbot Entry Point
// Terminal front-end around the intent-classification core.

mod actors;
mod brain;
mod config;
mod error;
mod fs_manager;
mod logging;
mod models;
mod preflight;
mod search;

#[cfg(test)]
mod tests;

use actors::SessionHandle;
use anyhow::bail;
use brain::dialogue::INFERENCE_APOLOGY;
use brain::{
    ChatbotArtifacts, DialogueOrchestrator, ObservedCommand, RandomSource, RngSource, SystemClock,
};
use chrono::Local;
use config::AppConfig;
use error::AppError;
use search::SystemBrowser;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Duration;
use tracing::{error, info, warn};

const HELP_TEXT: &str = "\
Special commands:
  exit, quit, bye   end the conversation
  search <query>    open a web search
  time              show the current time

Session commands:
  /clear            clear the conversation
  /save             save the conversation to a file
  /help             show this message";

/// What the front-end does with a line before it reaches the session.
enum FrontEndAction<'a> {
    Skip,
    Clear,
    Save,
    Help,
    Say(&'a str),
}

/// Blank lines are skipped; anything else reaches the session exactly as typed.
fn classify_line(line: &str) -> FrontEndAction<'_> {
    match line.trim() {
        "" => FrontEndAction::Skip,
        "/clear" => FrontEndAction::Clear,
        "/save" => FrontEndAction::Save,
        "/help" => FrontEndAction::Help,
        _ => FrontEndAction::Say(line),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    logging::init_tracing(config.log_format)?;

    let report = preflight::run_preflight_checks(&config);
    if !report.ready_to_start {
        for check in report.failed_checks() {
            error!("{}: {}", check.name, check.message);
        }
        bail!("{}", report.summary);
    }

    // Fail fast: nothing is served until every artifact loads and agrees.
    let artifacts = Arc::new(ChatbotArtifacts::load(&config)?);

    let rng: Box<dyn RandomSource> = match config.rng_seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_entropy()),
    };
    let orchestrator = DialogueOrchestrator::new(artifacts, rng, Box::new(SystemClock));
    let session = SessionHandle::spawn(orchestrator, Duration::from_millis(config.turn_timeout_ms));
    let browser = SystemBrowser::new(config.search_url.clone());

    info!(session = %session.session_id(), "Ready");
    println!("Intentbot is ready. Type /help for commands.");

    let result = run_repl(&session, &browser, &config).await;
    let _ = session.shutdown().await;
    result?;
    Ok(())
}

async fn run_repl(
    session: &SessionHandle,
    browser: &SystemBrowser,
    config: &AppConfig,
) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let utterance = match classify_line(&line) {
            FrontEndAction::Skip => continue,
            FrontEndAction::Help => {
                println!("{}", HELP_TEXT);
                continue;
            }
            FrontEndAction::Clear => {
                let dropped = session.clear_history().await?;
                println!("Conversation cleared ({} turns).", dropped);
                continue;
            }
            FrontEndAction::Save => {
                match save_transcript(session, config).await {
                    Ok(path) => println!("Chat history has been saved to {}", path.display()),
                    Err(e) => {
                        error!("Failed to save chat history: {}", e);
                        println!("Could not save the chat history.");
                    }
                }
                continue;
            }
            FrontEndAction::Say(utterance) => utterance.to_string(),
        };

        let reply = match session.respond(utterance).await {
            Ok(reply) => reply,
            Err(e) if !e.is_fatal() => {
                warn!("Turn failed: {}", e);
                println!("Bot: {}\n", INFERENCE_APOLOGY);
                continue;
            }
            Err(e) => return Err(e),
        };

        println!("Bot: {}\n", reply.text);

        match reply.command {
            ObservedCommand::Search { query } => {
                if let Err(e) = browser.open_search(&query) {
                    warn!("Could not open web search: {}", e);
                }
            }
            ObservedCommand::Farewell => break,
            ObservedCommand::Time | ObservedCommand::None => {}
        }
    }

    Ok(())
}

async fn save_transcript(
    session: &SessionHandle,
    config: &AppConfig,
) -> Result<std::path::PathBuf, AppError> {
    let history = session.history().await?;
    let dir = config.transcripts_dir();
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(format!(
        "chat_history_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    tokio::fs::write(&path, history.transcript()).await?;
    info!(turns = history.len(), "Transcript saved to {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod front_end_tests {
    use super::*;

    fn said(line: &str) -> Option<&str> {
        match classify_line(line) {
            FrontEndAction::Say(text) => Some(text),
            _ => None,
        }
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert!(matches!(classify_line(""), FrontEndAction::Skip));
        assert!(matches!(classify_line("  \t "), FrontEndAction::Skip));
    }

    #[test]
    fn test_session_commands() {
        assert!(matches!(classify_line("/clear"), FrontEndAction::Clear));
        assert!(matches!(classify_line("/save"), FrontEndAction::Save));
        assert!(matches!(classify_line(" /help "), FrontEndAction::Help));
    }

    #[test]
    fn test_utterances_are_passed_untrimmed() {
        assert_eq!(said("bye "), Some("bye "));
        assert_eq!(said("search flu "), Some("search flu "));
        assert_eq!(said(" hello"), Some(" hello"));
    }
}
