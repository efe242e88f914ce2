// src/core/mod.rs

pub mod calendar;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod reporting;
pub mod selector;
pub mod session;
