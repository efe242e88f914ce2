// src/core/models/mod.rs

pub mod day;
pub mod menu;
pub mod outcome;

pub use day::*;
pub use menu::*;
pub use outcome::*;
