//! Repositories: domain models over the SeaORM adapters.

pub mod executives;
pub mod settings;
