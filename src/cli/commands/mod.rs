//! CLI command implementations.

mod config;
mod doctor;
mod keywords;
mod run;
mod search;
mod transcript;

pub use config::run_config;
pub use doctor::run_doctor;
pub use keywords::run_keywords;
pub use run::run_pipeline;
pub use search::run_search;
pub use transcript::run_transcript;
