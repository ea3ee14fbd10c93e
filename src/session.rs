//! Identity and session handed to the client by the surrounding application.
//!
//! The client never persists anything; whoever owns the session stores it
//! and implements [`SessionHost`] to be told when it must be cleared.

use alloc::string::String;
use core::fmt;

use rand::Rng;

/// Who is playing, and which game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    player_name: String,
    game_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    EmptyPlayerName,
    EmptyGameId,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EmptyPlayerName => write!(f, "player name must not be empty"),
            SessionError::EmptyGameId => write!(f, "game id must not be empty"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {}

impl SessionContext {
    pub fn new(
        player_name: impl Into<String>,
        game_id: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let player_name = player_name.into();
        let game_id = game_id.into();
        if player_name.trim().is_empty() {
            return Err(SessionError::EmptyPlayerName);
        }
        if game_id.trim().is_empty() {
            return Err(SessionError::EmptyGameId);
        }
        Ok(Self {
            player_name,
            game_id,
        })
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }
}

/// Owner of the persisted session.
pub trait SessionHost: Send {
    /// Forget the session: the player aborted, or the game id is no longer valid.
    fn clear_session(&mut self);
}

impl<F: FnMut() + Send> SessionHost for F {
    fn clear_session(&mut self) {
        self()
    }
}

pub const VIKING_NAMES: [&str; 8] = [
    "Urist", "Nerthus", "Dane", "Helga", "Holger", "Hulgekir", "Folke", "Halvard",
];

/// A random default display name.
pub fn viking_name<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    VIKING_NAMES[rng.random_range(0..VIKING_NAMES.len())]
}

/// Two distinct names, e.g. for a bot-versus-bot game.
pub fn two_viking_names<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    let first = rng.random_range(0..VIKING_NAMES.len());
    // offset in 1..len guarantees a different index
    let offset = rng.random_range(1..VIKING_NAMES.len());
    let second = (first + offset) % VIKING_NAMES.len();
    (VIKING_NAMES[first], VIKING_NAMES[second])
}
