use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, ValueEnum};
use tracing::info;

use oplog_relay::models::ParseMode;
use oplog_relay::utils::{get_settings_file_path, load_relay_settings};
use oplog_relay::{Broker, JsonLinesBroker, LogConverter, Publisher, RelayError, RelaySettings};
use oplog_relay::{TrailingLine, follow_log_file, process_full_log_file};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Sink {
    /// Write `<key>\t<json>` lines to stdout
    Stdout,
    /// Produce to the configured Kafka topic
    Kafka,
}

#[derive(Parser, Debug)]
#[command(
    name = "oplog-relay",
    version,
    about = "Relays jdbc.sqlonly audit logs to a message broker"
)]
struct Cli {
    /// Log file to read
    log_file: PathBuf,

    /// Path to the settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Keep following the file after the existing lines are published
    #[arg(short, long)]
    follow: bool,

    #[arg(long, value_enum, default_value_t = Sink::Stdout)]
    sink: Sink,

    /// Kafka topic (overrides the settings file)
    #[arg(long)]
    topic: Option<String>,

    /// Abort on the first malformed parameter list instead of skipping the line
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let settings_path = cli.settings.clone().unwrap_or_else(get_settings_file_path);
    let mut settings = load_relay_settings(&settings_path);
    if let Some(topic) = &cli.topic {
        settings.kafka.topic = topic.clone();
    }
    if cli.strict {
        settings.parse_mode = ParseMode::Strict;
    }

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    info!(
        log_file = %cli.log_file.display(),
        sink = ?cli.sink,
        parse_mode = ?settings.parse_mode,
        "oplog-relay starting"
    );

    let broker = connect_broker(cli.sink, &settings)?;
    let converter = LogConverter::new(&settings);
    let mut publisher = Publisher::new(broker, &settings.publish);

    let trailing = if cli.follow {
        TrailingLine::HoldBack
    } else {
        TrailingLine::Include
    };
    let summary = process_full_log_file(&cli.log_file, trailing, &converter, &mut publisher)?;

    if cli.follow {
        // SIGINT or SIGTERM stops the poll loop; the publisher is closed below.
        let stop = Arc::new(AtomicBool::new(false));
        let handler_stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            info!("shutdown signal received");
            handler_stop.store(true, Ordering::Relaxed);
        })?;

        let followed = follow_log_file(
            &cli.log_file,
            summary.end_position,
            summary.lines,
            &converter,
            &mut publisher,
            settings.follow_poll_interval(),
            &stop,
        )?;
        info!(
            published = followed.published,
            skipped = followed.skipped,
            "stopped following log file"
        );
    }

    publisher.close()?;
    Ok(())
}

fn connect_broker(sink: Sink, settings: &RelaySettings) -> Result<Box<dyn Broker>, RelayError> {
    match sink {
        Sink::Stdout => Ok(Box::new(JsonLinesBroker::new(io::stdout().lock()))),
        Sink::Kafka => connect_kafka(settings),
    }
}

#[cfg(feature = "kafka")]
fn connect_kafka(settings: &RelaySettings) -> Result<Box<dyn Broker>, RelayError> {
    let broker = oplog_relay::publish::KafkaBroker::connect(&settings.kafka)
        .map_err(|e| RelayError::Broker(e.to_string()))?;
    Ok(Box::new(broker))
}

#[cfg(not(feature = "kafka"))]
fn connect_kafka(_settings: &RelaySettings) -> Result<Box<dyn Broker>, RelayError> {
    Err(RelayError::Broker(
        "built without Kafka support; rebuild with --features kafka".to_string(),
    ))
}
