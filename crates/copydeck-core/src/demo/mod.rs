//! Interactive demo state machines
//!
//! Timers and media playback stay with the caller; these types only decide
//! what state the demo is in after each input.

pub mod knowledge_base;
pub mod walkthrough;

pub use knowledge_base::{AnswerFailure, ChatMessage, ChatRole, KnowledgeBaseSession, Phase};
pub use walkthrough::{Clip, ClickOutcome, TargetZone, WalkthroughDemo, FEEDBACK_DURATION};
