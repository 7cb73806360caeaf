pub mod category;
pub mod id;
pub mod session;
pub mod ticket;
pub mod user;
