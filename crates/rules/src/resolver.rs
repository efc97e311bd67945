//! Decision resolver: turns one observation's tags into INCLUDE / EXCLUDE.
//!
//! Resolution filters the query to the rule vocabulary, finds every rule whose
//! tag mapping is a subset of the remaining tags, and takes the most severe
//! rating among them. Severity dominates specificity:
//! a matching `bad` rule excludes even when a more specific rule says `good`.
//!
//! Observations that resolve to `NONE` or `UNCERTAIN` are included, with a
//! warning logged once per distinct filtered tag mapping.

use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;

use tracing::warn;

use crate::database::RuleDatabase;
use crate::rating::{Decision, Rating};
use crate::tagmap::TagMap;

/// Resolves quality-control decisions against a loaded [`RuleDatabase`].
///
/// `resolve` takes `&self` and may be called from several threads. The
/// warned-tags memory is guarded by a mutex that is held while the warning is
/// emitted, so each tag mapping is reported at most once per resolver.
pub struct DecisionResolver {
    database: RuleDatabase,
    /// Filtered tag mappings that already produced a warning.
    warned: Mutex<HashSet<TagMap>>,
}

impl DecisionResolver {
    pub fn new(database: RuleDatabase) -> Self {
        Self {
            database,
            warned: Mutex::new(HashSet::new()),
        }
    }

    pub fn database(&self) -> &RuleDatabase {
        &self.database
    }

    /// The part of `tags` the rules can see.
    ///
    /// With an empty vocabulary the tags pass through unchanged.
    pub fn relevant_tags(&self, tags: &TagMap) -> TagMap {
        let vocabulary = self.database.vocabulary();
        if vocabulary.is_empty() {
            tags.clone()
        } else {
            tags.retain_names(vocabulary)
        }
    }

    /// Most severe rating matching `tags`, [`Rating::None`] when nothing matches.
    ///
    /// Has no side effects.
    pub fn rating(&self, tags: &TagMap) -> Rating {
        self.rating_of_relevant(&self.relevant_tags(tags))
    }

    /// Decide whether the observation described by `tags` is analysed.
    pub fn resolve(&self, tags: &TagMap) -> Decision {
        let relevant = self.relevant_tags(tags);
        let rating = self.rating_of_relevant(&relevant);

        if rating.needs_review() {
            self.warn_once(relevant, rating);
        }
        Decision::from(rating)
    }

    /// Walks whichever side is smaller: the `2^k` subsets of `relevant`, or
    /// the index keys checked for containment in `relevant`.
    fn rating_of_relevant(&self, relevant: &TagMap) -> Rating {
        if self.database.is_empty() {
            return Rating::None;
        }

        let enumerate = relevant.len() < 32 && (1usize << relevant.len()) <= self.database.len();
        if enumerate {
            most_severe(
                relevant
                    .subsets()
                    .filter_map(|subset| self.database.ratings(&subset)),
            )
        } else {
            most_severe(
                self.database
                    .entries()
                    .filter(|(tags, _)| tags.is_subset_of(relevant))
                    .map(|(_, ratings)| ratings),
            )
        }
    }

    /// Emit the inclusion warning unless `relevant` was already reported.
    fn warn_once(&self, relevant: TagMap, rating: Rating) {
        let mut warned = self.warned.lock().expect("warned tags lock poisoned");
        if warned.contains(&relevant) {
            return;
        }
        warn!(
            observation = %relevant,
            rating = %rating,
            "will include observation for analysis even though quality rating is {}",
            rating
        );
        warned.insert(relevant);
    }
}

/// Maximum over all rating sets, [`Rating::None`] when there are none.
fn most_severe<'a>(sets: impl Iterator<Item = &'a BTreeSet<Rating>>) -> Rating {
    sets.flatten().copied().fold(Rating::None, Ord::max)
}
