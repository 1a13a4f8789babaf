//! Filesystem-backed services for the viewer: platform paths, configuration
//! loading and window-state persistence.

pub mod config_service;
pub mod paths;
pub mod storage;
pub mod window_state_repository;

pub use config_service::ConfigService;
pub use paths::ViewerPaths;
pub use window_state_repository::TomlWindowStateRepository;
