//! Database adapters for the post store and user repository.

mod connections;
pub mod entity;
mod memory;
mod postgres;

pub use connections::{DatabaseConfig, connect};
pub use memory::{InMemoryPostStore, InMemoryUserRepository};
pub use postgres::{PostgresPostStore, PostgresUserRepository};


/// Deduplicate tag names, keeping first-seen order.
pub(crate) fn dedup_names(names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .iter()
        .filter(|n| seen.insert(n.as_str()))
        .cloned()
        .collect()
}
