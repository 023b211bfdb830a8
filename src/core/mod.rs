pub mod catalog;
pub mod intake;
pub mod record_log;
pub mod selection;

pub use crate::domain::model::{BookingRequest, BookingSlot, GoalRequest, GoalTag, Tutor, Weekday};
pub use crate::domain::ports::Storage;
pub use crate::utils::error::Result;
