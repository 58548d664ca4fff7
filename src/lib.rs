// Award-fare availability scanner for an airline booking API

// Modules, leaves first
pub mod config;
pub mod dates;
pub mod fares;
pub mod notify;
pub mod report;
pub mod scheduler;
pub mod search;

// Re-export key types for convenience
pub use config::{load_configs, parse_configs, ConfigError, SearchConfig};
pub use dates::{expand_range, DateRangeError};
pub use fares::{has_award_business, Fare};
pub use notify::{EmailConfig, EmailNotifier, Notify, NotifyError};
pub use report::{Flight, Report};
pub use scheduler::{run_config, MAX_CONCURRENT_SEARCHES};
pub use search::{FareSearch, SearchClient};
