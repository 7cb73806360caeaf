pub mod auth;
pub mod catalog;
pub mod tickets;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use tickets::TicketService;

#[cfg(test)]
pub use auth::MockAuthService;
#[cfg(test)]
pub use catalog::MockCatalogService;
#[cfg(test)]
pub use tickets::MockTicketService;
