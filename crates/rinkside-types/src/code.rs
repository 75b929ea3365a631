//! Six-character codes identifying a shared game.
//!
//! Codes are drawn from an alphabet without the visually ambiguous
//! characters `0`, `O`, `1`, and `I`, so they can be read aloud or typed
//! from a TV screen.

use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Characters a game code may contain.
pub const GAME_CODE_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of characters in a game code.
pub const GAME_CODE_LEN: usize = 6;

/// Rejection reason for user-entered codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCodeError {
    /// Not exactly [`GAME_CODE_LEN`] characters.
    WrongLength(usize),
    /// Contains a character outside [`GAME_CODE_ALPHABET`].
    InvalidChar(char),
}

impl core::fmt::Display for GameCodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WrongLength(len) => {
                write!(f, "game code must be {GAME_CODE_LEN} characters, got {len}")
            }
            Self::InvalidChar(c) => write!(f, "game code contains invalid character '{c}'"),
        }
    }
}

impl std::error::Error for GameCodeError {}

/// A validated, uppercase game code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct GameCode(String);

impl GameCode {
    /// Draw a fresh random code.
    pub fn generate() -> Self {
        let alphabet = GAME_CODE_ALPHABET.as_bytes();
        let mut rng = rand::rng();
        let code = (0..GAME_CODE_LEN)
            .filter_map(|_| {
                let idx = rng.random_range(0..alphabet.len());
                alphabet.get(idx).map(|&b| char::from(b))
            })
            .collect();
        Self(code)
    }

    /// Normalize user input (trim, uppercase) and validate it.
    pub fn parse(input: &str) -> Result<Self, GameCodeError> {
        let code = input.trim().to_ascii_uppercase();
        let len = code.chars().count();
        if len != GAME_CODE_LEN {
            return Err(GameCodeError::WrongLength(len));
        }
        if let Some(bad) = code.chars().find(|c| !GAME_CODE_ALPHABET.contains(*c)) {
            return Err(GameCodeError::InvalidChar(bad));
        }
        Ok(Self(code))
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Viewer link for this code: `<base>?join=<code>`.
    pub fn share_url(&self, base_url: &str) -> String {
        format!("{base_url}?join={}", self.0)
    }
}

impl core::fmt::Display for GameCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for GameCode {
    type Err = GameCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_use_the_unambiguous_alphabet() {
        for _ in 0..200 {
            let code = GameCode::generate();
            assert_eq!(code.as_str().len(), GAME_CODE_LEN);
            assert!(code.as_str().chars().all(|c| GAME_CODE_ALPHABET.contains(c)));
            for banned in ['0', 'O', '1', 'I'] {
                assert!(!code.as_str().contains(banned));
            }
        }
    }

    #[test]
    fn parse_uppercases_input() {
        let code = GameCode::parse(" abc234 ");
        assert_eq!(code.map(|c| c.to_string()), Ok("ABC234".to_owned()));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(GameCode::parse("ABC"), Err(GameCodeError::WrongLength(3)));
        assert_eq!(
            GameCode::parse("ABCDE0"),
            Err(GameCodeError::InvalidChar('0'))
        );
    }

    #[test]
    fn share_url_appends_join_param() {
        let code = GameCode::parse("XK7P2M");
        assert_eq!(
            code.map(|c| c.share_url("https://rink.example/")),
            Ok("https://rink.example/?join=XK7P2M".to_owned())
        );
    }
}
