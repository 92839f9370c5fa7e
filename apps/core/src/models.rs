use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One exchange: what the user typed and what the bot answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user: String,
    pub bot: String,
    /// Local time the reply was produced.
    pub at: DateTime<Local>,
}

impl ConversationTurn {
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
            at: Local::now(),
        }
    }
}

/// Append-only turn log of one session; only an explicit reset clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[allow(dead_code)]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Plain-text rendering, one `You:`/`Bot:` pair per turn, blank line between turns.
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("You: {}\nBot: {}\n\n", t.user, t.bot))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_append_and_clear() {
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn::new("hi", "Hello!"));
        history.push(ConversationTurn::new("bye", "Goodbye! Have a great day!"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].user, "hi");

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_transcript_format() {
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn::new("hi", "Hello!"));
        history.push(ConversationTurn::new("time", "The current time is 10:00:00."));
        assert_eq!(
            history.transcript(),
            "You: hi\nBot: Hello!\n\nYou: time\nBot: The current time is 10:00:00.\n\n"
        );
    }
}
