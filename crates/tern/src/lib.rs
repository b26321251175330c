pub mod agent;
pub mod conversation;
pub mod errors;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod tools;
