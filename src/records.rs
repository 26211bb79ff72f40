//! Player identity and play history
//!
//! The simulation never touches storage directly: it asks an
//! [`IdentityProvider`] who is playing, reports finished sessions to a
//! [`SessionRecorder`], and reads/writes the running record through a
//! [`HighScoreStore`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level_for_score;

/// Login form validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("name is required")]
    MissingName,
    #[error("email is required")]
    MissingEmail,
    #[error("email `{0}` is not a valid address")]
    InvalidEmail(String),
    #[error("phone is required")]
    MissingPhone,
}

/// Who is playing (captured once at login, read-only afterwards)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl IdentityError {
    /// Login form field the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            IdentityError::MissingName => "name",
            IdentityError::MissingEmail | IdentityError::InvalidEmail(_) => "email",
            IdentityError::MissingPhone => "phone",
        }
    }
}

impl Identity {
    /// Validate and trim login form fields
    ///
    /// Every invalid field is reported, in form order, so the form can mark
    /// all of them at once.
    pub fn new(name: &str, email: &str, phone: &str) -> Result<Self, Vec<IdentityError>> {
        let name = name.trim();
        let email = email.trim();
        let phone = phone.trim();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(IdentityError::MissingName);
        }
        if email.is_empty() {
            errors.push(IdentityError::MissingEmail);
        } else if !looks_like_email(email) {
            errors.push(IdentityError::InvalidEmail(email.to_string()));
        }
        if phone.is_empty() {
            errors.push(IdentityError::MissingPhone);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        })
    }
}

/// Loose `something@something.something` check, whitespace-free
fn looks_like_email(email: &str) -> bool {
    email.split_whitespace().any(|token| {
        let bytes = token.as_bytes();
        bytes.iter().enumerate().any(|(at, &b)| {
            b == b'@'
                && at >= 1
                && bytes
                    .iter()
                    .enumerate()
                    .any(|(dot, &c)| c == b'.' && dot >= at + 2 && dot + 2 <= bytes.len())
        })
    })
}

/// Whether the session reached the target score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Completed,
    Incomplete,
}

impl CompletionStatus {
    pub fn from_won(won: bool) -> Self {
        if won { Self::Completed } else { Self::Incomplete }
    }
}

/// Outcome of one terminal session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub player: Identity,
    pub final_score: u32,
    /// Unix timestamp (ms) when the session ended
    #[serde(rename = "date")]
    pub timestamp: f64,
    pub status: CompletionStatus,
    pub level: u32,
}

impl GameResult {
    pub fn new(player: Identity, final_score: u32, status: CompletionStatus, timestamp: f64) -> Self {
        Self {
            player,
            final_score,
            timestamp,
            status,
            level: level_for_score(final_score),
        }
    }
}

/// A recorded result with its history id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(flatten)]
    pub result: GameResult,
}

/// Ordered, append-only play history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result, assigning a unique id
    pub fn push(&mut self, result: GameResult) -> &HistoryEntry {
        let id = format!("{}-{}", result.timestamp as u64, self.entries.len());
        self.entries.push(HistoryEntry { id, result });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive search by player name (empty term matches everything)
    pub fn filter_by_name(&self, term: &str) -> Vec<&HistoryEntry> {
        let term = term.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| term.is_empty() || e.result.player.name.to_lowercase().contains(&term))
            .collect()
    }

    /// Best final score ever recorded
    pub fn best_score(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.result.final_score).max()
    }

    /// Dashboard aggregates over the whole history
    pub fn stats(&self) -> HistoryStats {
        let total_games = self.entries.len();
        let completed_games = self
            .entries
            .iter()
            .filter(|e| e.result.status == CompletionStatus::Completed)
            .count();
        let sum: u64 = self.entries.iter().map(|e| e.result.final_score as u64).sum();
        let average_score = if total_games > 0 {
            (sum as f64 / total_games as f64).round() as u32
        } else {
            0
        };

        HistoryStats {
            total_games,
            completed_games,
            average_score,
            highest_score: self.best_score().unwrap_or(0),
        }
    }
}

/// Summary numbers shown on the kiosk dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_games: usize,
    /// Sessions that reached the target score
    pub completed_games: usize,
    /// Mean final score, rounded half up
    pub average_score: u32,
    pub highest_score: u32,
}

/// Source of the logged-in player
pub trait IdentityProvider {
    fn current_identity(&self) -> Option<Identity>;
}

/// Sink for terminal session outcomes
pub trait SessionRecorder {
    fn record_result(&mut self, result: GameResult);
}

/// Persisted running high score
pub trait HighScoreStore {
    /// Stored high score (0 when absent or unreadable)
    fn load_high_score(&self) -> u32;
    fn save_high_score(&mut self, score: u32);
}
