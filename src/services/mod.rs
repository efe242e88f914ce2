// src/services/mod.rs

pub mod driver;
pub mod fake;
pub mod webdriver;
