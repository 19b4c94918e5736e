//! d.a.r.y.l. - a chat bot that answers commands addressed to it

pub mod application;
pub mod domain;
pub mod infrastructure;
