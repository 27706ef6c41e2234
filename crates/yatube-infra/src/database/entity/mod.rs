//! SeaORM entities mirroring the tables created by the `migration` app.

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;
