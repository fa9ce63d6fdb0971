use serde::{Deserialize, Serialize};

/// Stable identifier of a loaded AI message (its position in the load order)
pub type AiMessageId = usize;

/// Session identifier, used for log correlation only
pub type SessionId = String;

/// A genuine chat line taken from a streamer's chat log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealMessage {
    pub timestamp: String,
    pub author: String,
    /// Link to the VOD position the line was posted at
    pub external_link: String,
    pub text: String,
}

/// A generated line. Two entries with identical text are still distinct messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiMessage {
    pub id: AiMessageId,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    AwaitingSelection,
    Answered,
    Exhausted,
}

/// One of the two display positions of a round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Left,
    Right,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::Left => Slot::Right,
            Slot::Right => Slot::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Slot::Left => 0,
            Slot::Right => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Slot::Left),
            1 => Some(Slot::Right),
            _ => None,
        }
    }
}

/// What a display slot carries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotContent {
    pub is_real: bool,
    pub text: String,
}

/// Details about the genuine message, shown once the round is answered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reveal {
    pub correct: bool,
    pub author: String,
    pub timestamp: String,
    pub link: String,
    pub full_real_text: String,
    /// Set only after a wrong answer, so the reveal can quote what was actually said
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_text: Option<String>,
}

/// Snapshot of a session for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundView {
    pub phase: RoundPhase,
    pub round_no: u32,
    /// Left slot first. Empty once the pool is exhausted.
    pub slots: Vec<SlotContent>,
    pub streak: u32,
    pub best_streak: u32,
    /// AI messages not yet shown, the current one included
    pub remaining: usize,
    /// AI messages already retired
    pub used: usize,
    pub reveal: Option<Reveal>,
}
