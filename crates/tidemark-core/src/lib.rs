pub mod color_space;
pub mod config;
pub mod emit;
pub mod error;
pub mod pipeline;
pub mod resolve;

pub use config::Config;
pub use error::TidemarkError;
pub use pipeline::{check, generate, Freshness, Generated, Report};
