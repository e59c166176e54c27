pub mod config;
pub mod paths;
pub mod view;

pub use config::{deep_merge, default_config, Config, ConfigError};
pub use paths::{container_base_path, PathManager};
pub use view::ConfigView;
