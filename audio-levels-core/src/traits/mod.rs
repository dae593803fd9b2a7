pub mod capture_provider;
pub mod config_provider;
pub mod level_delegate;
