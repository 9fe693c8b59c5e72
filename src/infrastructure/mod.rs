pub mod file_storage;
pub mod http_transport;
pub mod notification_surface;
