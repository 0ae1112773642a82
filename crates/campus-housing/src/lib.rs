pub mod config;
pub mod error;
pub mod listings;
pub mod preferences;
pub mod presentation;
pub mod search;
pub mod telemetry;
pub mod wizard;
