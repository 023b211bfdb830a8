pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::LocalStorage;
pub use config::AppConfig;
pub use crate::core::catalog::{Catalog, CatalogStore};
pub use crate::core::intake::{FormPayload, IntakePipeline, IntakeSettings};
pub use crate::core::selection::SortOption;
pub use utils::error::{BookingError, Result};
