//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Commands: Built-in command handlers
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and dispatching
//! - Services: The receive loop

pub mod commands;
pub mod errors;
pub mod messaging;
pub mod services;
