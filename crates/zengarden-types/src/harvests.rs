//! Harvest credit counts for multi-harvest plants.
//!
//! A plant either has a finite number of harvests left or harvests forever.
//! On the wire a finite count is a plain integer and the unbounded case is
//! the string `"infinite"`. Older saves used `-1` for the unbounded case;
//! it is still accepted on read and never written.

use serde::{Deserialize, Serialize};

/// Legacy save-file sentinel for "unbounded harvests".
pub const LEGACY_INFINITE_SENTINEL: i64 = -1;

/// Wire word for the unbounded case.
const INFINITE_WORD: &str = "infinite";

/// Remaining (or configured) harvest credits of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HarvestsRepr", into = "HarvestsRepr")]
pub enum Harvests {
    /// A bounded number of harvests.
    Finite(u32),
    /// The plant can be harvested without limit.
    Infinite,
}

impl Harvests {
    /// A single harvest, used by every non-multi-harvest plant.
    pub const ONCE: Self = Self::Finite(1);

    /// Whether the plant harvests without limit.
    pub const fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Finite remaining count, or `None` when unbounded.
    pub const fn remaining(self) -> Option<u32> {
        match self {
            Self::Finite(n) => Some(n),
            Self::Infinite => None,
        }
    }

    /// Credits left after one more harvest, or `None` if this harvest is the
    /// last one and the plant must be cleared.
    ///
    /// Infinite credits never decrement.
    pub const fn after_harvest(self) -> Option<Self> {
        match self {
            Self::Infinite => Some(Self::Infinite),
            Self::Finite(n) if n > 1 => Some(Self::Finite(n.saturating_sub(1))),
            Self::Finite(_) => None,
        }
    }
}

impl core::fmt::Display for Harvests {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Infinite => f.write_str(INFINITE_WORD),
        }
    }
}

/// Wire representation: an integer or the word `"infinite"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum HarvestsRepr {
    Count(i64),
    Word(String),
}

impl TryFrom<HarvestsRepr> for Harvests {
    type Error = String;

    fn try_from(repr: HarvestsRepr) -> Result<Self, Self::Error> {
        match repr {
            HarvestsRepr::Count(LEGACY_INFINITE_SENTINEL) => Ok(Self::Infinite),
            HarvestsRepr::Count(n) => u32::try_from(n)
                .map(Self::Finite)
                .map_err(|_err| format!("invalid harvest count: {n}")),
            HarvestsRepr::Word(word) if word.eq_ignore_ascii_case(INFINITE_WORD) => {
                Ok(Self::Infinite)
            }
            HarvestsRepr::Word(word) => Err(format!("invalid harvest count: {word:?}")),
        }
    }
}

impl From<Harvests> for HarvestsRepr {
    fn from(h: Harvests) -> Self {
        match h {
            Harvests::Finite(n) => Self::Count(i64::from(n)),
            Harvests::Infinite => Self::Word(INFINITE_WORD.to_owned()),
        }
    }
}
