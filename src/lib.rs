//! State and derivation layer of the PIM dashboard: theme preference
//! resolution, the data-quality KPI, and the worklist filter.

pub mod ambient;
pub mod config;
pub mod demo;
mod error;
pub mod logging;
pub mod metrics;
pub mod preference;
pub mod store;
pub mod worklist;

pub use error::{Error, Result};
pub use preference::{DisplayPreference, PreferenceResolver, ThemeLifecycle};
