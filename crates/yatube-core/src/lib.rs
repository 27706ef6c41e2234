//! # Yatube Core
//!
//! The domain layer of Yatube: entities, the error taxonomy, the ports that
//! infrastructure implements, and the services that compose feeds and accept
//! submissions. Nothing in here touches a database, a socket or the clock
//! beyond `Utc::now()`.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
