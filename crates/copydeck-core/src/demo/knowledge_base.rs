//! Knowledge-base chat session
//!
//! The demo ingests three documents, greets the visitor and then answers
//! questions one at a time. Answers come from the chat endpoint; the session
//! only tracks phase, transcript and whether an answer is pending.

use serde::{Deserialize, Serialize};

/// Documents shown during ingestion
pub const DOCUMENT_COUNT: u8 = 3;

/// First AI message once ingestion is done
pub const GREETING: &str = "Czego chciałbyś dowiedzieć się o drukarce?";

/// Shown when the chat endpoint answers with a non-OK status
pub const CONNECTION_FAILED: &str = "Przepraszam, nie udało mi się połączyć z bazą wiedzy.";

/// Shown when the chat endpoint could not be reached at all
pub const COMMUNICATION_ERROR: &str = "Błąd komunikacji z AI.";

/// Suggested questions offered as one-click chips
pub const PREDEFINED_QUESTIONS: [&str; 3] = [
    "Jak jest pełna nazwa drukarki?",
    "Jaki tusz obsługuje drukarka?",
    "Ile waży drukarka?",
];

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing shown yet
    #[default]
    Init,
    /// Documents are being ingested
    Ingesting,
    /// Greeting shown, waiting for the first question
    Ready,
    /// At least one question asked
    Chatting,
}

/// Transcript speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Visitor
    User,
    /// Assistant
    Ai,
}

/// One transcript line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker
    pub role: ChatRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    fn ai(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Why an answer did not arrive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFailure {
    /// Endpoint answered with a non-OK status
    BadStatus,
    /// Endpoint unreachable
    Transport,
}

/// Knowledge-base demo state
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseSession {
    phase: Phase,
    ingested: u8,
    messages: Vec<ChatMessage>,
    awaiting_answer: bool,
}

impl KnowledgeBaseSession {
    /// Create session in `Init`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the ingestion animation
    pub fn start_ingesting(&mut self) {
        if self.phase == Phase::Init {
            self.phase = Phase::Ingesting;
        }
    }

    /// One more document ingested
    ///
    /// Returns the greeting when the last document lands; the caller speaks it.
    pub fn document_ingested(&mut self) -> Option<&str> {
        if self.phase != Phase::Ingesting {
            return None;
        }
        self.ingested = (self.ingested + 1).min(DOCUMENT_COUNT);
        if self.ingested < DOCUMENT_COUNT {
            return None;
        }
        self.phase = Phase::Ready;
        self.messages = vec![ChatMessage::ai(GREETING)];
        Some(GREETING)
    }

    /// Ask a question
    ///
    /// Returns the query to send, or `None` when the question is
    /// blank, the session is not ready, or an answer is still pending.
    pub fn ask(&mut self, query: &str) -> Option<String> {
        if query.trim().is_empty() || self.awaiting_answer {
            return None;
        }
        if !matches!(self.phase, Phase::Ready | Phase::Chatting) {
            return None;
        }
        self.phase = Phase::Chatting;
        self.messages.push(ChatMessage::user(query));
        self.awaiting_answer = true;
        Some(query.to_owned())
    }

    /// Record the outcome of the pending question
    ///
    /// Returns the text to speak on success.
    pub fn receive_answer(&mut self, answer: Result<String, AnswerFailure>) -> Option<String> {
        if !self.awaiting_answer {
            return None;
        }
        self.awaiting_answer = false;
        match answer {
            Ok(text) => {
                self.messages.push(ChatMessage::ai(text.clone()));
                Some(text)
            }
            Err(AnswerFailure::BadStatus) => {
                self.messages.push(ChatMessage::ai(CONNECTION_FAILED));
                None
            }
            Err(AnswerFailure::Transport) => {
                self.messages.push(ChatMessage::ai(COMMUNICATION_ERROR));
                None
            }
        }
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Documents ingested so far
    #[inline]
    #[must_use]
    pub fn ingested(&self) -> u8 {
        self.ingested
    }

    /// Transcript
    #[inline]
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether an answer is pending
    #[inline]
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.awaiting_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_session() -> KnowledgeBaseSession {
        let mut session = KnowledgeBaseSession::new();
        session.start_ingesting();
        for _ in 0..DOCUMENT_COUNT {
            session.document_ingested();
        }
        session
    }

    #[test]
    fn ingestion_ends_with_greeting() {
        let mut session = KnowledgeBaseSession::new();
        session.start_ingesting();
        assert_eq!(session.document_ingested(), None);
        assert_eq!(session.document_ingested(), None);
        assert_eq!(session.document_ingested(), Some(GREETING));
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn cannot_ask_before_ready() {
        let mut session = KnowledgeBaseSession::new();
        assert!(session.ask("Ile waży drukarka?").is_none());
    }

    #[test]
    fn blank_question_is_rejected() {
        let mut session = ready_session();
        assert!(session.ask("   ").is_none());
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn one_question_at_a_time() {
        let mut session = ready_session();
        assert!(session.ask(PREDEFINED_QUESTIONS[2]).is_some());
        assert!(session.is_typing());
        assert!(session.ask(PREDEFINED_QUESTIONS[0]).is_none());

        let spoken = session.receive_answer(Ok("4500 kg.".into()));
        assert_eq!(spoken.as_deref(), Some("4500 kg."));
        assert!(!session.is_typing());
        assert_eq!(session.phase(), Phase::Chatting);
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn failures_append_fixed_messages() {
        let mut session = ready_session();
        session.ask("a");
        session.receive_answer(Err(AnswerFailure::BadStatus));
        session.ask("b");
        session.receive_answer(Err(AnswerFailure::Transport));

        let last_two: Vec<&str> = session
            .messages()
            .iter()
            .rev()
            .take(3)
            .filter(|m| m.role == ChatRole::Ai)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(last_two, vec![COMMUNICATION_ERROR, CONNECTION_FAILED]);
    }

    #[test]
    fn stray_answer_is_ignored() {
        let mut session = ready_session();
        assert!(session.receive_answer(Ok("late".into())).is_none());
        assert_eq!(session.messages().len(), 1);
    }
}
