pub mod manager_service;
pub use manager_service::ManagerService;
