//! Rule database: loads quality-rating rule files into an index keyed by
//! exact tag subset.
//!
//! Loading is a one-shot builder phase. Sources are file paths or glob
//! patterns; each file must hold a JSON list of rule records. Any error aborts
//! the load, so a [`RuleDatabase`] is either complete or never constructed.

mod core;
mod error;


pub use self::core::{RuleDatabase, RuleDatabaseBuilder};
pub use self::error::{LoadedFile, Result, RuleError};
