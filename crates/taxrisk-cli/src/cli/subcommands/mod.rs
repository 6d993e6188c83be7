mod analysis;
mod config;

pub use analysis::AnalysisCommands;
pub use config::ConfigCommands;
