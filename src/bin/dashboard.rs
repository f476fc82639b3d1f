//! Builds a dashboard offline from a JSON file of transactions.
//!
//! This is the same computation the server runs, packaged for clients that
//! hold their transactions locally.

use std::{
    fs::File,
    io::{self, BufReader, Read},
};

use clap::Parser;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dashboard_engine::{Error, Period, Transaction, build_dashboard, get_local_offset};

/// Print the dashboard summary for a list of transactions as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// A JSON file containing an array of transactions, or "-" for stdin.
    #[arg(short, long, default_value = "-")]
    input: String,

    /// "week", "month" or "year". Anything else means "year".
    #[arg(long)]
    period: Option<String>,

    /// The RFC 3339 instant to build the dashboard for, e.g.
    /// "2024-05-15T13:00:00+12:00". Its offset is used as the local timezone.
    ///
    /// Defaults to the current time in `--timezone`.
    #[arg(long)]
    now: Option<String>,

    /// The canonical name of the local timezone, used when `--now` is not given.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() {
    setup_logging();

    let args = Args::parse();

    match run(&args) {
        Ok(output) => println!("{output}"),
        Err(error) => {
            tracing::error!("{error}");
            std::process::exit(1);
        }
    }
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(args: &Args) -> Result<String, Error> {
    let transactions = if args.input == "-" {
        read_transactions(io::stdin().lock())?
    } else {
        let file = File::open(&args.input)
            .map_err(|error| Error::ReadInput(format!("{}: {error}", args.input)))?;
        read_transactions(BufReader::new(file))?
    };

    let now = resolve_now(args.now.as_deref(), &args.timezone)?;
    let period = Period::from_token(args.period.as_deref());

    let dashboard = build_dashboard(&transactions, period, now);

    let output = if args.pretty {
        serde_json::to_string_pretty(&dashboard)
    } else {
        serde_json::to_string(&dashboard)
    };

    output.map_err(|error| Error::JSONSerializationError(error.to_string()))
}

fn read_transactions(reader: impl Read) -> Result<Vec<Transaction>, Error> {
    serde_json::from_reader(reader).map_err(|error| Error::ReadInput(error.to_string()))
}

/// The instant to build the dashboard for, in the local offset.
fn resolve_now(now: Option<&str>, timezone: &str) -> Result<OffsetDateTime, Error> {
    if let Some(text) = now {
        return OffsetDateTime::parse(text, &Rfc3339)
            .map_err(|error| Error::InvalidDateFormat(error.to_string(), text.to_owned()));
    }

    let now = OffsetDateTime::now_utc();
    let offset = get_local_offset(timezone, now)
        .ok_or_else(|| Error::InvalidTimezoneError(timezone.to_owned()))?;

    Ok(now.to_offset(offset))
}
