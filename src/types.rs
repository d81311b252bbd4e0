//! Shared primitive IDs and the validated mood value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned entry identifier.
pub type EntryId = i64;
/// Milliseconds since the Unix epoch.
pub type TimestampMs = i64;
/// Issuance-order sequence number of a refresh.
pub type RefreshSeq = u64;

/// A mood value outside the accepted 1..=5 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("mood value {0} is outside 1..=5")]
pub struct InvalidMoodValue(pub i32);

/// Mood rating on a 1 (worst) to 5 (best) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Mood(u8);

impl Mood {
    /// Lowest accepted value.
    pub const MIN: u8 = 1;
    /// Highest accepted value.
    pub const MAX: u8 = 5;

    /// Every mood in ascending order, one per selection control.
    pub const ALL: [Mood; 5] = [Mood(1), Mood(2), Mood(3), Mood(4), Mood(5)];

    /// Validates a raw value.
    pub fn new(value: i32) -> Result<Self, InvalidMoodValue> {
        match u8::try_from(value) {
            Ok(v) if (Self::MIN..=Self::MAX).contains(&v) => Ok(Self(v)),
            _ => Err(InvalidMoodValue(value)),
        }
    }

    /// Raw numeric value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "awful",
            2 => "bad",
            3 => "okay",
            4 => "good",
            _ => "great",
        }
    }
}

impl TryFrom<i32> for Mood {
    type Error = InvalidMoodValue;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mood> for i32 {
    fn from(value: Mood) -> Self {
        i32::from(value.0)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}
