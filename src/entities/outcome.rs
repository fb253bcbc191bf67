use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicted result of a match, from the home side's (`team1`) perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// `team1` wins
    Win,
    Draw,
    /// `team2` wins
    Loss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Outcome {
    pub const ALL: [Self; 3] = [Self::Win, Self::Draw, Self::Loss];

    /// Convert from database/form string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "win" => Some(Self::Win),
            "draw" => Some(Self::Draw),
            "loss" => Some(Self::Loss),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Draw => "draw",
            Self::Loss => "loss",
        }
    }

    /// Label shown next to a prediction, naming the side it backs.
    #[must_use]
    pub fn describe(&self, team1: &str, team2: &str) -> String {
        match self {
            Self::Win => format!("{team1} win"),
            Self::Draw => "Draw".to_string(),
            Self::Loss => format!("{team2} win"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(Outcome::from_str("win"), Some(Outcome::Win));
        assert_eq!(Outcome::from_str(" DRAW "), Some(Outcome::Draw));
        assert_eq!(Outcome::from_str("loss"), Some(Outcome::Loss));
        assert_eq!(Outcome::from_str("lose"), None);
        assert_eq!(Outcome::from_str(""), None);
    }

    #[test]
    fn test_as_str_matches_from_str() {
        for outcome in Outcome::ALL {
            assert_eq!(Outcome::from_str(outcome.as_str()), Some(outcome));
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(Outcome::Win.describe("Mexico", "Canada"), "Mexico win");
        assert_eq!(Outcome::Loss.describe("Mexico", "Canada"), "Canada win");
        assert_eq!(Outcome::Draw.describe("Mexico", "Canada"), "Draw");
    }
}
