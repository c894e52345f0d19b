pub mod config;
pub mod error;
pub mod locale;
pub mod types;

pub use config::{parse_site_toml, parse_site_toml_str};
pub use error::{Error, Result};
pub use locale::{LocaleResolver, RouteParams};
pub use types::*;
