pub mod auth;
pub mod catalog;
pub mod config;
pub mod prompt;
pub mod ticket;
