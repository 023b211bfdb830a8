use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tutor_booking::config::{CliArgs, Command};
use tutor_booking::core::intake::{
    FIELD_GOAL, FIELD_NAME, FIELD_PHONE, FIELD_TIME, FIELD_TUTOR, FIELD_WEEKDAY,
};
use tutor_booking::utils::error::ErrorCategory;
use tutor_booking::utils::{logger, validation::Validate};
use tutor_booking::{AppConfig, CatalogStore, FormPayload, IntakePipeline, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = if Path::new(&args.config).exists() {
        AppConfig::from_file(&args.config)
            .with_context(|| format!("Failed to load config file '{}'", args.config))?
    } else {
        AppConfig::default()
    };
    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    if config.logging.json {
        logger::init_json_logger(config.logging.level.as_deref());
    } else {
        logger::init_cli_logger(args.verbose);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    tracing::debug!("Config: {:?}", config);

    let storage = Arc::new(LocalStorage::new(&config.storage.data_dir));
    let catalog = Arc::new(CatalogStore::load(storage.as_ref(), &config.storage.tutors_file).await);
    if !catalog.is_available() {
        tracing::warn!("Continuing without a tutor catalog; only requests will be accepted");
    }
    let intake = IntakePipeline::new(catalog.clone(), storage, &config.intake_settings());

    let outcome = run(&args.command, &config, &catalog, &intake).await;
    if let Err(e) = outcome {
        if e.is_recoverable() {
            tracing::warn!("Command failed: {}", e);
        } else {
            tracing::error!("Command failed: {}", e);
        }
        eprintln!("❌ {}", e);
        let exit_code = match e.category() {
            ErrorCategory::NotFound => 2,
            ErrorCategory::Validation => 3,
            ErrorCategory::Persistence => 4,
            ErrorCategory::Service | ErrorCategory::Configuration => 1,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(
    command: &Command,
    config: &AppConfig,
    catalog: &CatalogStore,
    intake: &IntakePipeline<LocalStorage>,
) -> tutor_booking::Result<()> {
    match command {
        Command::Sample { n } => {
            let n = n.unwrap_or(config.catalog.landing_sample_size);
            print_json(&catalog.sample(n)?)
        }
        Command::List { sort } => match sort {
            Some(key) => {
                let (option, tutors) = catalog.sort_by_key(key)?;
                println!("{}", option.label());
                print_json(&tutors)
            }
            None => print_json(&catalog.list_all()?),
        },
        Command::Goal { index } => {
            let (goal, tutors) = catalog.by_goal_index(*index)?;
            println!("{}", goal.label());
            print_json(&tutors)
        }
        Command::Profile { id } => {
            let tutor = catalog
                .lookup_by_id(*id)?
                .ok_or_else(|| tutor_booking::BookingError::not_found("tutor", id))?;
            print_json(tutor)
        }
        Command::Slot {
            tutor_id,
            weekday,
            time,
        } => print_json(&intake.prepare_booking(*tutor_id, weekday, time)?),
        Command::Request {
            name,
            phone,
            hours,
            goal,
        } => {
            let payload = form(&[
                (FIELD_NAME, name),
                (FIELD_PHONE, phone),
                (FIELD_TIME, hours),
                (FIELD_GOAL, goal),
            ]);
            let request = intake.submit_request(&payload).await?;
            println!("✅ Request saved");
            print_json(&request)
        }
        Command::Book {
            tutor,
            weekday,
            time,
            name,
            phone,
        } => {
            let payload = form(&[
                (FIELD_TUTOR, tutor),
                (FIELD_WEEKDAY, weekday),
                (FIELD_TIME, time),
                (FIELD_NAME, name),
                (FIELD_PHONE, phone),
            ]);
            let booking = intake.submit_booking(&payload).await?;
            println!("✅ Booking saved");
            print_json(&booking)
        }
        Command::Requests => print_json(&intake.requests().await?),
        Command::Bookings => print_json(&intake.bookings().await?),
    }
}

fn form(fields: &[(&str, &String)]) -> FormPayload {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), (*v).clone()))
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> tutor_booking::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
