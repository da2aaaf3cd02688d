pub mod config;
pub mod filters;
pub mod generator;

// Re-export main types
pub use config::{Profile, SiteConfig};
pub use generator::{Generator, GeneratorError};
