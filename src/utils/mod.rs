pub mod settings_persistence;
pub mod time;

pub use settings_persistence::{get_settings_file_path, load_relay_settings, save_relay_settings};
pub use time::{current_millis, parse_timestamp};
