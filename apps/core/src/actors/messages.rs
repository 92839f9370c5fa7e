use crate::brain::Reply;
use crate::models::ConversationHistory;
use tokio::sync::oneshot;

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the session actor.
#[derive(Debug)]
pub enum SessionMessage {
    /// Answer one user utterance and record the turn.
    ProcessUtterance {
        utterance: String,
        /// A channel to send the reply back.
        responder: oneshot::Sender<Reply>,
    },
    /// A request for a snapshot of the conversation so far.
    History {
        responder: oneshot::Sender<ConversationHistory>,
    },
    /// Reset the conversation; replies with the number of turns dropped.
    ClearHistory { responder: oneshot::Sender<usize> },
    /// A command to stop the actor loop.
    Shutdown,
}
