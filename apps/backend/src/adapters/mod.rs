//! SeaORM adapters. Functions return `DbErr`; repos translate.

pub mod executives_sea;
pub mod settings_sea;
