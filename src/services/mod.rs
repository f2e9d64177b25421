//! Service layer
//!
//! Typed per-resource calls on top of the API client.

pub mod entity;
pub mod period;
pub mod stats;

pub use entity::EntityService;
pub use period::PeriodService;
pub use stats::{entity_stats, period_stats, StatCard};
