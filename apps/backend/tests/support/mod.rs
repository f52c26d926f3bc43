#![allow(dead_code)]

pub mod app_builder;
pub mod fake_provider;
pub mod sessions;

pub use app_builder::create_test_app;
