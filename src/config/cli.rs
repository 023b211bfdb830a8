use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "tutor-booking")]
#[command(about = "Browse the tutor catalog and record lesson requests and bookings")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "tutor-booking.toml")]
    pub config: String,

    /// Overrides storage.data_dir from the config
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Random selection for the landing page
    Sample {
        #[arg(short)]
        n: Option<usize>,
    },
    /// Every tutor, optionally sorted (1-4, random, rating_desc, price_desc, price_asc)
    List {
        #[arg(long)]
        sort: Option<String>,
    },
    /// Tutors for a goal page (1-5)
    Goal { index: usize },
    /// One tutor profile
    Profile { id: u32 },
    /// Resolve a booking link
    Slot {
        tutor_id: u32,
        weekday: String,
        time: String,
    },
    /// Submit a "find me a tutor" request
    Request {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "1-2 часа в неделю")]
        hours: String,
        #[arg(long, default_value = "Для путешествий")]
        goal: String,
    },
    /// Book a slot with a tutor
    Book {
        #[arg(long)]
        tutor: String,
        #[arg(long)]
        weekday: String,
        #[arg(long)]
        time: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    /// Print the stored requests
    Requests,
    /// Print the stored bookings
    Bookings,
}
