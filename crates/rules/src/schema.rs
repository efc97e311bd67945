//! Rule record shape as it appears in rule files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::database::Result;
use crate::rating::Rating;
use crate::tagmap::TagMap;

/// Record fields that carry bookkeeping rather than tags.
pub const RESERVED_FIELDS: [&str; 2] = ["rating", "type"];

/// One entry of a rule file: a flat object of string tags plus the optional
/// `rating` label and an ignored `type` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(flatten)]
    pub tags: BTreeMap<String, String>,
}

impl RuleRecord {
    /// Resolve the rating label. A missing label means [`Rating::None`].
    pub fn rating(&self) -> Result<Rating> {
        match self.rating.as_deref() {
            None => Ok(Rating::None),
            Some(label) => label.parse(),
        }
    }

    /// Tag mapping with reserved fields stripped.
    pub fn tag_map(&self) -> TagMap {
        self.tags
            .iter()
            .filter(|(name, _)| !RESERVED_FIELDS.contains(&name.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
