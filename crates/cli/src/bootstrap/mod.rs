mod config;
mod logging;

pub use config::{load_config, report_config_warnings};
pub use logging::init_logging;
