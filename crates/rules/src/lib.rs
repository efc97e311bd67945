//! Quality-control decision engine.
//!
//! This crate provides:
//! - Rating / decision vocabulary with a total severity order
//! - Order-independent tag mappings usable as index keys
//! - A rule database loaded from JSON rule files and glob patterns
//! - A decision resolver that matches every tag subset and lets the most
//!   severe rating win

pub mod database;
pub mod rating;
pub mod resolver;
pub mod schema;
pub mod tagmap;

pub use database::{RuleDatabase, RuleDatabaseBuilder, RuleError};
pub use rating::{Decision, Rating};
pub use resolver::DecisionResolver;
pub use tagmap::TagMap;
