//! Round lifecycle for a single player.
//!
//! `GameSession` is a plain owned value: commands mutate it, queries read it,
//! and nothing here knows about sockets or rendering.

pub mod sampler;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use crate::loader::Corpus;
use crate::types::*;

pub use sampler::{select_pair, text_len, Pair, MAX_DRAWS};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Cannot advance: the current round has not been answered")]
    NotAnswered,

    #[error("Invalid slot index {0}")]
    InvalidSlot(usize),
}

/// The pair currently on display
#[derive(Debug, Clone)]
struct Round {
    real: usize,
    ai: AiMessage,
    real_slot: Slot,
    reveal: Option<Reveal>,
}

pub struct GameSession {
    real: Arc<[RealMessage]>,
    /// Messages that can still be drawn
    active: Vec<AiMessage>,
    /// Messages already shown, held back until reset
    used: Vec<AiMessage>,
    round: Option<Round>,
    phase: RoundPhase,
    round_no: u32,
    streak: u32,
    best_streak: u32,
    rng: StdRng,
}

impl GameSession {
    /// Create a session from a loaded corpus and start the first round
    pub fn new(corpus: &Corpus) -> Self {
        Self::with_rng(corpus, StdRng::from_os_rng())
    }

    /// Deterministic variant for tests and replays
    pub fn with_seed(corpus: &Corpus, seed: u64) -> Self {
        Self::with_rng(corpus, StdRng::seed_from_u64(seed))
    }

    fn with_rng(corpus: &Corpus, rng: StdRng) -> Self {
        let active = corpus
            .ai
            .iter()
            .enumerate()
            .map(|(id, text)| AiMessage {
                id,
                text: text.clone(),
            })
            .collect();

        let mut session = Self {
            real: corpus.real.clone(),
            active,
            used: Vec::new(),
            round: None,
            phase: RoundPhase::Exhausted,
            round_no: 0,
            streak: 0,
            best_streak: 0,
            rng,
        };
        session.advance();
        session
    }

    /// Draw the next pair from the active pool.
    ///
    /// Leaves the session `Exhausted` instead of sampling when either pool is
    /// empty.
    fn advance(&mut self) {
        let Some(pair) = select_pair(&mut self.rng, &self.active, &self.real) else {
            self.round = None;
            self.phase = RoundPhase::Exhausted;
            return;
        };

        let real_slot = if self.rng.random_bool(0.5) {
            Slot::Left
        } else {
            Slot::Right
        };

        self.round = Some(Round {
            real: pair.real,
            ai: self.active[pair.ai].clone(),
            real_slot,
            reveal: None,
        });
        self.round_no += 1;
        self.phase = RoundPhase::AwaitingSelection;
    }

    /// Record the player's pick.
    ///
    /// Returns `None` without touching the streak unless a selection is
    /// pending, so only the first answer of a round counts.
    pub fn submit_answer(&mut self, real_chosen: bool) -> Option<Reveal> {
        if self.phase != RoundPhase::AwaitingSelection {
            return None;
        }
        let round = self.round.as_mut()?;
        let real = &self.real[round.real];

        if real_chosen {
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }

        let reveal = Reveal {
            correct: real_chosen,
            author: real.author.clone(),
            timestamp: real.timestamp.clone(),
            link: real.external_link.clone(),
            full_real_text: real.text.clone(),
            real_text: (!real_chosen).then(|| real.text.clone()),
        };

        round.reveal = Some(reveal.clone());
        self.phase = RoundPhase::Answered;
        Some(reveal)
    }

    /// Record a pick by display position
    pub fn select_slot(&mut self, slot: usize) -> Result<Option<Reveal>, GameError> {
        let slot = Slot::from_index(slot).ok_or(GameError::InvalidSlot(slot))?;
        let Some(real_slot) = self.round.as_ref().map(|r| r.real_slot) else {
            return Ok(None);
        };
        Ok(self.submit_answer(slot == real_slot))
    }

    /// Retire the current AI message and draw the next pair
    pub fn next_round(&mut self) -> Result<RoundPhase, GameError> {
        if self.phase != RoundPhase::Answered {
            return Err(GameError::NotAnswered);
        }

        if let Some(round) = self.round.take() {
            if let Some(pos) = self.active.iter().position(|m| m.id == round.ai.id) {
                let retired = self.active.remove(pos);
                self.used.push(retired);
            }
        }

        if self.active.is_empty() {
            tracing::debug!("AI pool exhausted after {} rounds", self.round_no);
            self.phase = RoundPhase::Exhausted;
        } else {
            self.advance();
        }
        Ok(self.phase)
    }

    /// Return every used message to the pool, clear the streak and start over
    pub fn reset_game(&mut self) -> RoundPhase {
        self.active.append(&mut self.used);
        self.streak = 0;
        self.round_no = 0;
        self.round = None;
        self.advance();
        self.phase
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn round_no(&self) -> u32 {
        self.round_no
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn used_len(&self) -> usize {
        self.used.len()
    }

    pub fn active_ids(&self) -> impl Iterator<Item = AiMessageId> + '_ {
        self.active.iter().map(|m| m.id)
    }

    pub fn used_ids(&self) -> impl Iterator<Item = AiMessageId> + '_ {
        self.used.iter().map(|m| m.id)
    }

    /// The AI message on display, if any
    pub fn current_ai(&self) -> Option<&AiMessage> {
        self.round.as_ref().map(|r| &r.ai)
    }

    /// The real message on display, if any
    pub fn current_real(&self) -> Option<&RealMessage> {
        self.round.as_ref().map(|r| &self.real[r.real])
    }

    /// Which slot holds the genuine message
    pub fn real_slot(&self) -> Option<Slot> {
        self.round.as_ref().map(|r| r.real_slot)
    }

    pub fn view(&self) -> RoundView {
        let (slots, reveal) = match &self.round {
            Some(round) => {
                let real = SlotContent {
                    is_real: true,
                    text: self.real[round.real].text.clone(),
                };
                let ai = SlotContent {
                    is_real: false,
                    text: round.ai.text.clone(),
                };
                let slots = match round.real_slot {
                    Slot::Left => vec![real, ai],
                    Slot::Right => vec![ai, real],
                };
                (slots, round.reveal.clone())
            }
            None => (Vec::new(), None),
        };

        RoundView {
            phase: self.phase,
            round_no: self.round_no,
            slots,
            streak: self.streak,
            best_streak: self.best_streak,
            remaining: self.active.len(),
            used: self.used.len(),
            reveal,
        }
    }
}
