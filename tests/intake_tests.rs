use std::sync::Arc;
use tempfile::TempDir;
use tutor_booking::core::intake::{
    FIELD_GOAL, FIELD_NAME, FIELD_PHONE, FIELD_TIME, FIELD_TUTOR, FIELD_WEEKDAY,
};
use tutor_booking::core::Weekday;
use tutor_booking::domain::model::{RequestGoal, WeeklyHours};
use tutor_booking::{
    BookingError, CatalogStore, FormPayload, IntakePipeline, IntakeSettings, LocalStorage,
};

const FIXTURE: &str = include_str!("fixtures/teachers.json");

struct Harness {
    dir: TempDir,
    intake: Arc<IntakePipeline<LocalStorage>>,
}

async fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("teachers.json"), FIXTURE).unwrap();

    let storage = Arc::new(LocalStorage::new(dir.path()));
    let catalog = Arc::new(CatalogStore::load(storage.as_ref(), "teachers.json").await);
    let intake = IntakePipeline::new(catalog, storage, &IntakeSettings::default());

    Harness {
        dir,
        intake: Arc::new(intake),
    }
}

fn form(pairs: &[(&str, &str)]) -> FormPayload {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn booking_form(tutor: &str, weekday: &str, time: &str, name: &str) -> FormPayload {
    form(&[
        (FIELD_TUTOR, tutor),
        (FIELD_WEEKDAY, weekday),
        (FIELD_TIME, time),
        (FIELD_NAME, name),
        (FIELD_PHONE, "89990001111"),
    ])
}

fn read_log(dir: &TempDir, file: &str) -> Option<serde_json::Value> {
    let path = dir.path().join(file);
    path.exists()
        .then(|| serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap())
}

#[tokio::test]
async fn test_valid_request_is_persisted() {
    let h = harness().await;

    let request = h
        .intake
        .submit_request(&form(&[
            (FIELD_NAME, "Anna"),
            (FIELD_PHONE, "89990001111"),
            (FIELD_TIME, "1-2 часа в неделю"),
            (FIELD_GOAL, "Для работы"),
        ]))
        .await
        .unwrap();

    assert_eq!(request.name, "Anna");
    assert_eq!(request.phone, "89990001111");
    assert_eq!(request.weekly_hours, WeeklyHours::OneToTwo);
    assert_eq!(request.goal, RequestGoal::Work);

    assert_eq!(h.intake.requests().await.unwrap(), vec![request]);
    assert_eq!(
        read_log(&h.dir, "request.json").unwrap(),
        serde_json::json!([{
            "name": "Anna",
            "phone": "89990001111",
            "time": "1-2 часа в неделю",
            "goal": "Для работы"
        }])
    );
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    let h = harness().await;

    let err = h
        .intake
        .submit_request(&form(&[
            (FIELD_NAME, ""),
            (FIELD_PHONE, "89990001111"),
            (FIELD_TIME, "1-2 часа в неделю"),
            (FIELD_GOAL, "Для работы"),
        ]))
        .await
        .unwrap_err();

    assert!(err.validation_errors().unwrap().has_field(FIELD_NAME));
    assert!(read_log(&h.dir, "request.json").is_none());
}

#[tokio::test]
async fn test_short_phone_is_rejected() {
    let h = harness().await;

    let err = h
        .intake
        .submit_request(&form(&[
            (FIELD_NAME, "Anna"),
            (FIELD_PHONE, "123"),
            (FIELD_TIME, "1-2 часа в неделю"),
            (FIELD_GOAL, "Для работы"),
        ]))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::Validation(_)));
    assert!(err.validation_errors().unwrap().has_field(FIELD_PHONE));
    assert!(h.intake.requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_is_persisted() {
    let h = harness().await;

    let booking = h
        .intake
        .submit_booking(&booking_form("1", "mon", "10:00", "Anna"))
        .await
        .unwrap();
    assert_eq!(booking.tutor_id, 1);
    assert_eq!(booking.weekday, Weekday::Mon);

    assert_eq!(
        read_log(&h.dir, "booking.json").unwrap(),
        serde_json::json!([{
            "id": 1,
            "time": "10:00",
            "weekday": "mon",
            "name": "Anna",
            "phone": "89990001111"
        }])
    );
    // requests and bookings are separate collections
    assert!(read_log(&h.dir, "request.json").is_none());
}

#[tokio::test]
async fn test_booking_rejects_blank_name_and_short_phone() {
    let h = harness().await;

    let err = h
        .intake
        .submit_booking(&form(&[
            (FIELD_TUTOR, "1"),
            (FIELD_WEEKDAY, "mon"),
            (FIELD_TIME, "10:00"),
            (FIELD_NAME, "  "),
            (FIELD_PHONE, "123"),
        ]))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::Validation(_)));
    assert_eq!(err.status_code(), 422);
    let errors = err.validation_errors().unwrap();
    assert!(errors.has_field(FIELD_NAME));
    assert!(errors.has_field(FIELD_PHONE));
    assert!(read_log(&h.dir, "booking.json").is_none());
}

#[tokio::test]
async fn test_booking_rejects_long_phone() {
    let h = harness().await;

    let mut booking = booking_form("1", "mon", "10:00", "Anna");
    booking.insert(FIELD_PHONE.to_string(), "8999000111122".to_string());
    let err = h.intake.submit_booking(&booking).await.unwrap_err();

    let errors = err.validation_errors().unwrap();
    assert!(errors.has_field(FIELD_PHONE));
    assert!(!errors.has_field(FIELD_NAME));
    assert!(h.intake.bookings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_unknown_tutor_is_not_found_and_not_written() {
    let h = harness().await;

    let err = h
        .intake
        .submit_booking(&booking_form("9999", "mon", "10:00", "Anna"))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::NotFound { entity: "tutor", .. }));
    assert_eq!(err.status_code(), 404);
    assert!(read_log(&h.dir, "booking.json").is_none());
}

#[tokio::test]
async fn test_booking_unknown_weekday_is_not_found() {
    let h = harness().await;

    let err = h
        .intake
        .submit_booking(&booking_form("1", "someday", "10:00", "Anna"))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NotFound { entity: "weekday", .. }));
}

#[tokio::test]
async fn test_concurrent_bookings_are_all_persisted() {
    let h = harness().await;

    let first = {
        let intake = h.intake.clone();
        tokio::spawn(async move {
            intake
                .submit_booking(&booking_form("1", "mon", "10:00", "Anna"))
                .await
        })
    };
    let second = {
        let intake = h.intake.clone();
        tokio::spawn(async move {
            intake
                .submit_booking(&booking_form("2", "tue", "18:00", "Boris"))
                .await
        })
    };
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let bookings = h.intake.bookings().await.unwrap();
    assert_eq!(bookings.len(), 2);
    let mut names: Vec<&str> = bookings.iter().map(|b| b.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Anna", "Boris"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_submissions_lose_nothing() {
    let h = harness().await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let intake = h.intake.clone();
        handles.push(tokio::spawn(async move {
            let name = format!("Client {}", i);
            if i % 2 == 0 {
                intake
                    .submit_booking(&booking_form("6", "wed", "9:00", &name))
                    .await
                    .map(|_| ())
            } else {
                intake
                    .submit_request(&form(&[
                        (FIELD_NAME, name.as_str()),
                        (FIELD_PHONE, "+79990001111"),
                        (FIELD_TIME, "3-5 часов в неделю"),
                        (FIELD_GOAL, "Для путешествий"),
                    ]))
                    .await
                    .map(|_| ())
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(h.intake.bookings().await.unwrap().len(), 10);
    assert_eq!(h.intake.requests().await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_prepare_booking() {
    let h = harness().await;

    let slot = h.intake.prepare_booking(2, "thu", "18:00").unwrap();
    assert_eq!(slot.tutor.name, "Lee Bangs");
    assert_eq!(slot.weekday_name, "Четверг");
    assert_eq!(slot.time, "18:00");

    assert!(matches!(
        h.intake.prepare_booking(77, "thu", "18:00"),
        Err(BookingError::NotFound { entity: "tutor", .. })
    ));
    // route parameters take the short tag only
    assert!(matches!(
        h.intake.prepare_booking(2, "Четверг", "18:00"),
        Err(BookingError::NotFound { entity: "weekday", .. })
    ));
}

#[tokio::test]
async fn test_booking_without_catalog_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(LocalStorage::new(dir.path()));
    let catalog = Arc::new(CatalogStore::load(storage.as_ref(), "teachers.json").await);
    let intake = IntakePipeline::new(catalog, storage, &IntakeSettings::default());

    let err = intake
        .submit_booking(&booking_form("1", "mon", "10:00", "Anna"))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::CatalogUnavailable { .. }));

    // requests do not depend on the catalog
    intake
        .submit_request(&form(&[
            (FIELD_NAME, "Anna"),
            (FIELD_PHONE, "89990001111"),
            (FIELD_TIME, "7-10 часов в неделю"),
            (FIELD_GOAL, "Для переезда"),
        ]))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pipelines_over_one_directory_lose_nothing() {
    let h = harness().await;
    // a second pipeline built independently over the same data directory
    let storage = Arc::new(LocalStorage::new(h.dir.path()));
    let catalog = Arc::new(CatalogStore::load(storage.as_ref(), "teachers.json").await);
    let other = Arc::new(IntakePipeline::new(
        catalog,
        storage,
        &IntakeSettings::default(),
    ));

    let mut handles = Vec::new();
    for i in 0..16 {
        let intake = if i % 2 == 0 { h.intake.clone() } else { other.clone() };
        handles.push(tokio::spawn(async move {
            let name = format!("Client {}", i);
            intake
                .submit_booking(&booking_form("2", "tue", "18:00", &name))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(h.intake.bookings().await.unwrap().len(), 16);
    assert_eq!(other.bookings().await.unwrap().len(), 16);
}
