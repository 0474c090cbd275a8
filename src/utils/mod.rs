//! Utility functions and helpers

pub mod dump;
pub mod hash;
pub mod pattern;
pub mod time;
pub mod transaction_parser;

#[cfg(test)]
mod tests;
