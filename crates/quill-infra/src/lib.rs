//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! PostgreSQL repositories via SeaORM, in-memory fallbacks for running and
//! testing without a database, and JWT + Argon2 authentication services.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{
    DatabaseConfig, InMemoryPostStore, InMemoryUserRepository, PostgresPostStore,
    PostgresUserRepository, connect,
};
