pub mod config;
pub mod tags;

pub use config::Config;
pub use tags::format_tags;
