//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (Slack)
//! - Quotes, Images: Web APIs behind the `stock` and `image` commands

pub mod config;
pub mod adapters;
pub mod images;
pub mod quotes;
