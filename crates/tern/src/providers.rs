pub mod anthropic;
pub mod base;
pub mod configs;
pub mod utils;

#[cfg(test)]
pub mod mock;
