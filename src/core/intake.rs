use crate::core::catalog::{Catalog, CatalogStore};
use crate::core::record_log::RecordLog;
use crate::domain::model::{
    BookingRequest, BookingSlot, GoalRequest, RequestGoal, WeeklyHours, Weekday,
};
use crate::domain::ports::Storage;
use crate::utils::error::{BookingError, Result, ValidationErrors};
use crate::utils::validation::{check_non_empty, check_phone, require_field};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// A submitted form: field name to raw value.
pub type FormPayload = HashMap<String, String>;

pub const FIELD_NAME: &str = "client_name";
pub const FIELD_PHONE: &str = "client_phone";
pub const FIELD_TIME: &str = "client_time";
pub const FIELD_GOAL: &str = "client_goal";
pub const FIELD_WEEKDAY: &str = "client_weekday";
pub const FIELD_TUTOR: &str = "client_teacher";

const NAME_REQUIRED: &str = "Введите своё имя";

/// Where the two intake logs live and how long an append may take.
#[derive(Debug, Clone)]
pub struct IntakeSettings {
    pub requests_path: String,
    pub bookings_path: String,
    pub write_timeout: Duration,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            requests_path: "request.json".to_string(),
            bookings_path: "booking.json".to_string(),
            write_timeout: Duration::from_secs(5),
        }
    }
}

/// Validates visitor submissions and appends them to the request and booking logs.
///
/// Appends are serialized per file for the whole process, so several
/// pipelines over the same data directory may run side by side.
pub struct IntakePipeline<S: Storage> {
    catalog: Arc<CatalogStore>,
    requests: RecordLog<GoalRequest, S>,
    bookings: RecordLog<BookingRequest, S>,
}

impl<S: Storage> IntakePipeline<S> {
    pub fn new(catalog: Arc<CatalogStore>, storage: Arc<S>, settings: &IntakeSettings) -> Self {
        Self {
            catalog,
            requests: RecordLog::new(
                storage.clone(),
                settings.requests_path.clone(),
                settings.write_timeout,
            ),
            bookings: RecordLog::new(
                storage,
                settings.bookings_path.clone(),
                settings.write_timeout,
            ),
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub async fn submit_request(&self, payload: &FormPayload) -> Result<GoalRequest> {
        let request = parse_request(payload).inspect_err(|e| {
            tracing::warn!("Rejected tutor request: {}", e);
        })?;

        let count = self.requests.append(&request).await?;
        tracing::info!(
            "Stored tutor request #{} ({}, {})",
            count,
            request.goal.label(),
            request.weekly_hours.label()
        );
        Ok(request)
    }

    pub async fn submit_booking(&self, payload: &FormPayload) -> Result<BookingRequest> {
        let catalog = self.catalog.catalog()?;
        let booking = parse_booking(catalog, payload).inspect_err(|e| {
            tracing::warn!("Rejected booking: {}", e);
        })?;

        let count = self.bookings.append(&booking).await?;
        tracing::info!(
            "Stored booking #{} with tutor {} on {} at {}",
            count,
            booking.tutor_id,
            booking.weekday,
            booking.time
        );
        Ok(booking)
    }

    /// Resolves a booking link before the form is shown. Both the tutor and
    /// the weekday tag must exist.
    pub fn prepare_booking(&self, tutor_id: u32, weekday: &str, time: &str) -> Result<BookingSlot> {
        let tutor = self.catalog.catalog()?.require(tutor_id)?;
        let day = Weekday::from_tag(weekday)
            .ok_or_else(|| BookingError::not_found("weekday", weekday))?;

        Ok(BookingSlot {
            tutor: tutor.clone(),
            weekday: day,
            weekday_name: day.display_name(),
            time: time.to_string(),
        })
    }

    pub async fn requests(&self) -> Result<Vec<GoalRequest>> {
        self.requests.read_all().await
    }

    pub async fn bookings(&self) -> Result<Vec<BookingRequest>> {
        self.bookings.read_all().await
    }
}

fn field<'a>(payload: &'a FormPayload, name: &str) -> Option<&'a str> {
    payload.get(name).map(String::as_str)
}

/// Validates a "find me a tutor" form. All field errors are reported together.
pub fn parse_request(payload: &FormPayload) -> Result<GoalRequest> {
    let mut errors = ValidationErrors::new();

    let name = require_field(&mut errors, FIELD_NAME, field(payload, FIELD_NAME), NAME_REQUIRED);
    if let Some(name) = name {
        check_non_empty(&mut errors, FIELD_NAME, name, NAME_REQUIRED);
    }
    let phone = field(payload, FIELD_PHONE);
    check_phone(&mut errors, FIELD_PHONE, phone);

    let weekly_hours = field(payload, FIELD_TIME).and_then(WeeklyHours::from_label);
    if weekly_hours.is_none() {
        errors.push(FIELD_TIME, "Not a valid choice");
    }
    let goal = field(payload, FIELD_GOAL).and_then(RequestGoal::from_label);
    if goal.is_none() {
        errors.push(FIELD_GOAL, "Not a valid choice");
    }

    match (name, phone, weekly_hours, goal) {
        (Some(name), Some(phone), Some(weekly_hours), Some(goal)) if errors.is_empty() => {
            Ok(GoalRequest {
                name: name.to_string(),
                phone: phone.to_string(),
                weekly_hours,
                goal,
            })
        }
        _ => Err(BookingError::Validation(errors)),
    }
}

/// Validates a booking form against the catalog.
///
/// A tutor id or weekday that is well-formed but does not resolve is
/// `NotFound`, and is reported before any field errors.
pub fn parse_booking(catalog: &Catalog, payload: &FormPayload) -> Result<BookingRequest> {
    let mut errors = ValidationErrors::new();

    let tutor_id = match field(payload, FIELD_TUTOR).map(str::trim) {
        Some(raw) if !raw.is_empty() => match raw.parse::<u32>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(FIELD_TUTOR, "Not a valid tutor id");
                None
            }
        },
        _ => {
            errors.push(FIELD_TUTOR, "Tutor is required");
            None
        }
    };
    if let Some(id) = tutor_id {
        catalog.require(id)?;
    }

    let weekday = match field(payload, FIELD_WEEKDAY) {
        Some(raw) if !raw.trim().is_empty() => Some(
            Weekday::resolve(raw).ok_or_else(|| BookingError::not_found("weekday", raw))?,
        ),
        _ => {
            errors.push(FIELD_WEEKDAY, "Weekday is required");
            None
        }
    };

    let time = require_field(&mut errors, FIELD_TIME, field(payload, FIELD_TIME), "Time is required");
    let name = require_field(&mut errors, FIELD_NAME, field(payload, FIELD_NAME), NAME_REQUIRED);
    if let Some(name) = name {
        check_non_empty(&mut errors, FIELD_NAME, name, NAME_REQUIRED);
    }
    let phone = field(payload, FIELD_PHONE);
    check_phone(&mut errors, FIELD_PHONE, phone);

    match (tutor_id, weekday, time, name, phone) {
        (Some(tutor_id), Some(weekday), Some(time), Some(name), Some(phone)) if errors.is_empty() => {
            Ok(BookingRequest {
                tutor_id,
                time: time.to_string(),
                weekday,
                name: name.to_string(),
                phone: phone.to_string(),
            })
        }
        _ => Err(BookingError::Validation(errors)),
    }
}
