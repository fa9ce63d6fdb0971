use crate::types::*;
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Pick the slot believed to hold the real message (0 = left, 1 = right)
    Select {
        slot: usize,
    },
    NextRound,
    ResetGame,
}

/// A display slot as sent to clients. `is_real` stays hidden until the round is answered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireSlot {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_real: Option<bool>,
}

impl WireSlot {
    pub fn hidden(slot: &SlotContent) -> Self {
        Self {
            text: slot.text.clone(),
            is_real: None,
        }
    }

    pub fn revealed(slot: &SlotContent) -> Self {
        Self {
            text: slot.text.clone(),
            is_real: Some(slot.is_real),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        streamer: String,
        instruction: String,
        server_now: String,
    },
    Round {
        round_no: u32,
        slots: Vec<WireSlot>,
        streak: u32,
        best_streak: u32,
        remaining: usize,
    },
    Answered {
        correct: bool,
        streak: u32,
        best_streak: u32,
        slots: Vec<WireSlot>,
        reveal: Reveal,
    },
    /// No AI messages left; only a reset starts a new round
    Exhausted {
        streak: u32,
        best_streak: u32,
        used: usize,
    },
    /// Data for the streamer could not be loaded
    LoadFailed {
        streamer: String,
        /// Paths relative to the data root where the files are expected
        expected: Vec<String>,
        msg: String,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    /// Message describing the session's current view
    pub fn from_view(view: &RoundView) -> Self {
        match view.phase {
            RoundPhase::AwaitingSelection => ServerMessage::Round {
                round_no: view.round_no,
                slots: view.slots.iter().map(WireSlot::hidden).collect(),
                streak: view.streak,
                best_streak: view.best_streak,
                remaining: view.remaining,
            },
            RoundPhase::Answered => match &view.reveal {
                Some(reveal) => ServerMessage::Answered {
                    correct: reveal.correct,
                    streak: view.streak,
                    best_streak: view.best_streak,
                    slots: view.slots.iter().map(WireSlot::revealed).collect(),
                    reveal: reveal.clone(),
                },
                None => ServerMessage::error("NO_ROUND", "No round to reveal"),
            },
            RoundPhase::Exhausted => ServerMessage::Exhausted {
                streak: view.streak,
                best_streak: view.best_streak,
                used: view.used,
            },
        }
    }

    pub fn error(code: &str, msg: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.to_string(),
            msg: msg.into(),
        }
    }

    /// Greeting sent once the streamer's data is ready
    pub fn welcome(streamer: &str) -> Self {
        ServerMessage::Welcome {
            protocol: PROTOCOL_VERSION.to_string(),
            streamer: streamer.to_string(),
            instruction: format!("Can you find the {} chatter?", streamer),
            server_now: chrono::Utc::now().to_rfc3339(),
        }
    }
}
