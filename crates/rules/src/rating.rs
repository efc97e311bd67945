//! Rating and decision vocabulary shared by the rule database and resolver.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::database::RuleError;

/// Quality rating attached to a rule, ordered by severity.
///
/// `None` means "no information" and sorts lowest; `Bad` is the most severe.
/// Conflict resolution always takes the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum Rating {
    None = -1,
    Good = 0,
    Uncertain = 1,
    Bad = 2,
}

impl Rating {
    /// All ratings in ascending severity.
    pub const ALL: [Rating; 4] = [Rating::None, Rating::Good, Rating::Uncertain, Rating::Bad];

    /// Upper-case label, as written in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::None => "NONE",
            Rating::Good => "GOOD",
            Rating::Uncertain => "UNCERTAIN",
            Rating::Bad => "BAD",
        }
    }

    /// True when the rating neither passes nor fails an observation outright.
    pub fn needs_review(self) -> bool {
        matches!(self, Rating::None | Rating::Uncertain)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = RuleError;

    /// Case-insensitive match against the rating labels.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Rating::ALL
            .into_iter()
            .find(|rating| rating.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RuleError::UnknownRating(s.to_string()))
    }
}

/// Whether an observation enters downstream analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Include,
    Exclude,
}

impl From<Rating> for Decision {
    /// `Bad` excludes. Everything else includes, unrated and uncertain
    /// observations included.
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Bad => Decision::Exclude,
            Rating::Good | Rating::None | Rating::Uncertain => Decision::Include,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Include => write!(f, "INCLUDE"),
            Decision::Exclude => write!(f, "EXCLUDE"),
        }
    }
}
