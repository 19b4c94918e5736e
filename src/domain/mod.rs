//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (Message, Command, CommandRegistry)
//! - Traits: Abstractions for infrastructure (Transport, Outbox)

pub mod entities;
pub mod traits;
