pub mod manager_repo;
pub use manager_repo::{ManagerStore, PgManagerStore};

#[cfg(test)]
pub mod memory_repo;
