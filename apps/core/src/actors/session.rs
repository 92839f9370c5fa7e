use crate::actors::messages::{AppError, SessionMessage};
use crate::brain::{DialogueOrchestrator, Reply};
use crate::models::{ConversationHistory, ConversationTurn};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{info, instrument, warn};

/// A handle to the session actor.
///
/// The actor owns the orchestrator and the conversation history, and handles
/// one message at a time on a dedicated blocking thread, so turns never overlap.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    session_id: String,
    turn_timeout: Duration,
}

impl SessionHandle {
    /// Spawns the actor. Must be called from within a Tokio runtime.
    pub fn spawn(orchestrator: DialogueOrchestrator, turn_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let session_id = uuid::Uuid::new_v4().to_string();
        let runner = SessionRunner {
            receiver,
            orchestrator,
            history: ConversationHistory::new(),
            session_id: session_id.clone(),
        };
        tokio::task::spawn_blocking(move || runner.run());
        Self {
            sender,
            session_id,
            turn_timeout,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Sends one utterance and waits for the reply, at most `turn_timeout`.
    ///
    /// A turn that times out is not recorded in the history.
    #[instrument(skip(self, utterance), fields(session = %self.session_id))]
    pub async fn respond(&self, utterance: String) -> Result<Reply, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SessionMessage::ProcessUtterance {
            utterance,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.turn_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))
    }

    pub async fn history(&self) -> Result<ConversationHistory, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(SessionMessage::History { responder: send })
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        recv.await.map_err(|e| AppError::Actor(e.to_string()))
    }

    /// Clears the history and returns how many turns were dropped.
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub async fn clear_history(&self) -> Result<usize, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(SessionMessage::ClearHistory { responder: send })
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        recv.await.map_err(|e| AppError::Actor(e.to_string()))
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SessionMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))
    }
}

// --- Actor Runner ---
struct SessionRunner {
    receiver: mpsc::Receiver<SessionMessage>,
    orchestrator: DialogueOrchestrator,
    history: ConversationHistory,
    session_id: String,
}

impl SessionRunner {
    fn run(mut self) {
        info!(session = %self.session_id, "Session started");
        while let Some(msg) = self.receiver.blocking_recv() {
            if !self.handle_message(msg) {
                break;
            }
        }
        info!(session = %self.session_id, turns = self.history.len(), "Session stopped");
    }

    /// Returns `false` once the actor should stop.
    fn handle_message(&mut self, msg: SessionMessage) -> bool {
        match msg {
            SessionMessage::ProcessUtterance {
                utterance,
                responder,
            } => {
                let reply = self.orchestrator.respond(&utterance);
                let text = reply.text.clone();
                // Only turns the caller actually received are recorded.
                match responder.send(reply) {
                    Ok(()) => self.history.push(ConversationTurn::new(utterance, text)),
                    Err(_) => warn!(
                        session = %self.session_id,
                        "Caller gave up on the turn; not recording it"
                    ),
                }
            }
            SessionMessage::History { responder } => {
                let _ = responder.send(self.history.clone());
            }
            SessionMessage::ClearHistory { responder } => {
                let dropped = self.history.len();
                self.history.clear();
                info!(session = %self.session_id, dropped, "History cleared");
                let _ = responder.send(dropped);
            }
            SessionMessage::Shutdown => {
                info!(session = %self.session_id, "Session shutting down...");
                return false;
            }
        }
        true
    }
}
