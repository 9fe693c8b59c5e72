pub mod company_service;
pub mod config_repository;
pub mod notifier;
pub mod remote_data_client;
pub mod theme_service;
