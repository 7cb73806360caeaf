pub mod auth;
pub mod catalog;
pub mod http;
pub mod tickets;

#[cfg(test)]
pub(crate) mod test_server;
