use serde::{Deserialize, Serialize};
use social_office_errors::AppError;
use std::fmt;
use std::str::FromStr;

/// The button a voter pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(AppError::InvalidInput(format!("Unknown vote direction: {other}"))),
        }
    }
}

/// A voter's active choice on one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    #[default]
    None,
    Up,
    Down,
}

impl VoteChoice {
    pub fn direction(self) -> Option<VoteDirection> {
        match self {
            Self::None => None,
            Self::Up => Some(VoteDirection::Up),
            Self::Down => Some(VoteDirection::Down),
        }
    }
}

impl From<VoteDirection> for VoteChoice {
    fn from(direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => Self::Up,
            VoteDirection::Down => Self::Down,
        }
    }
}

impl From<Option<VoteDirection>> for VoteChoice {
    fn from(direction: Option<VoteDirection>) -> Self {
        match direction {
            Some(direction) => direction.into(),
            None => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    pub up: u32,
    pub down: u32,
}

impl VoteTally {
    pub fn new(up: u32, down: u32) -> Self {
        Self { up, down }
    }

    pub fn score(&self) -> i64 {
        i64::from(self.up) - i64::from(self.down)
    }

    fn count_mut(&mut self, direction: VoteDirection) -> &mut u32 {
        match direction {
            VoteDirection::Up => &mut self.up,
            VoteDirection::Down => &mut self.down,
        }
    }

    fn cast(&mut self, direction: VoteDirection) {
        let count = self.count_mut(direction);
        *count = count.saturating_add(1);
    }

    // Saturates at zero so a replayed retraction cannot underflow.
    fn retract(&mut self, direction: VoteDirection) {
        let count = self.count_mut(direction);
        *count = count.saturating_sub(1);
    }
}

/// Applies one button press to an item's counts.
///
/// Pressing the active direction again retracts the vote, pressing the other
/// direction moves the vote across, and a first press casts it. Counts never
/// drop below zero even when `prior` is out of sync with `tally`.
pub fn toggle_vote(
    tally: VoteTally,
    prior: VoteChoice,
    direction: VoteDirection,
) -> (VoteTally, VoteChoice) {
    let mut next = tally;
    let choice = match prior.direction() {
        Some(active) if active == direction => {
            next.retract(direction);
            VoteChoice::None
        }
        Some(active) => {
            next.retract(active);
            next.cast(direction);
            direction.into()
        }
        None => {
            next.cast(direction);
            direction.into()
        }
    };
    (next, choice)
}

/// Result of a vote toggle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    pub choice: VoteChoice,
    pub up: u32,
    pub down: u32,
}

impl VoteResult {
    pub fn new(tally: VoteTally, choice: VoteChoice) -> Self {
        Self {
            choice,
            up: tally.up,
            down: tally.down,
        }
    }
}
