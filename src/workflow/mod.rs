pub mod catalog;
pub mod login;
pub mod register;
pub mod ticket;
