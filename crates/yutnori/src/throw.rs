//! The six throw outcomes of the yut sticks.
//!
//! The sticks are thrown by real players; the engine only receives the
//! outcome and turns it into a signed step count.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Result of one throw of the four yut sticks.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Throw {
    /// 도: one step.
    Do,
    /// 개: two steps.
    Gae,
    /// 걸: three steps.
    Geol,
    /// 윷: four steps.
    Yut,
    /// 모: five steps.
    Mo,
    /// 빽도: one step backward.
    BackDo,
}

impl Throw {
    /// Signed step count for the path resolver.
    pub fn steps(self) -> i32 {
        match self {
            Throw::Do => 1,
            Throw::Gae => 2,
            Throw::Geol => 3,
            Throw::Yut => 4,
            Throw::Mo => 5,
            Throw::BackDo => -1,
        }
    }

    /// Traditional Korean name.
    pub fn korean(self) -> &'static str {
        match self {
            Throw::Do => "도",
            Throw::Gae => "개",
            Throw::Geol => "걸",
            Throw::Yut => "윷",
            Throw::Mo => "모",
            Throw::BackDo => "빽도",
        }
    }

    /// Throw for a step count, if one exists.
    pub fn from_steps(steps: i32) -> Option<Self> {
        Throw::iter().find(|t| t.steps() == steps)
    }

    /// 윷 and 모 earn another throw in the traditional rules.
    ///
    /// Informational only; the engine does not track throws.
    pub fn grants_bonus_throw(self) -> bool {
        matches!(self, Throw::Yut | Throw::Mo)
    }
}

/// Failure to parse a throw name.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Unknown throw '{}': expected do, gae, geol, yut, mo, back_do or 도/개/걸/윷/모/빽도", input)]
pub struct ParseThrowError {
    /// The rejected text.
    pub input: String,
}

impl FromStr for Throw {
    type Err = ParseThrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let normalized = match wanted.to_ascii_lowercase().replace('-', "_").as_str() {
            "backdo" | "빽" => "back_do".to_string(),
            other => other.to_string(),
        };
        Throw::iter()
            .find(|t| t.to_string() == normalized || t.korean() == wanted)
            .ok_or_else(|| ParseThrowError {
                input: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_counts() {
        let steps: Vec<i32> = Throw::iter().map(Throw::steps).collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5, -1]);
    }

    #[test]
    fn test_from_steps() {
        assert_eq!(Throw::from_steps(4), Some(Throw::Yut));
        assert_eq!(Throw::from_steps(-1), Some(Throw::BackDo));
        assert_eq!(Throw::from_steps(0), None);
        assert_eq!(Throw::from_steps(6), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("geol".parse::<Throw>(), Ok(Throw::Geol));
        assert_eq!("Mo".parse::<Throw>(), Ok(Throw::Mo));
        assert_eq!("back-do".parse::<Throw>(), Ok(Throw::BackDo));
        assert_eq!("윷".parse::<Throw>(), Ok(Throw::Yut));
        assert_eq!("빽".parse::<Throw>(), Ok(Throw::BackDo));
        assert!("six".parse::<Throw>().is_err());
    }

    #[test]
    fn test_bonus_throws() {
        assert!(Throw::Yut.grants_bonus_throw());
        assert!(Throw::Mo.grants_bonus_throw());
        assert!(!Throw::Geol.grants_bonus_throw());
    }
}
