mod settings;

pub use settings::{CorruptPolicy, HistoryConfig, LoggingConfig, Settings};
