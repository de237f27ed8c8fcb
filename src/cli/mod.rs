//! # CLI Module
//!
//! Command-line interface for the event pipeline.
//!
//! ## Usage
//! ```bash
//! # Dispatch a log file, echoing every event
//! event-relay logs data.txt
//!
//! # Stop at the first malformed line
//! event-relay logs data.txt --strict
//!
//! # JSON output
//! event-relay logs data.txt --output json
//!
//! # Moving average of opening prices
//! event-relay average quotes.csv --window 10
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use event_relay::core::dispatcher::{Dispatcher, RunSummary};
use event_relay::core::listener::InterestSet;
use event_relay::core::observer::{
    ChannelObserver, DispatchNotice, NoticeChannel, NoticeReceiver, TracingObserver,
};
use event_relay::core::source::LineSource;
use event_relay::error::Result;
use event_relay::logline::{CodeCounter, EchoListener, LineDecoder, LogEvent, ReactionListener};
use event_relay::quotes::{MovingAverage, QuoteDecoder};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;

/// Event Relay - decode records, dispatch events, react
#[derive(Parser, Debug)]
#[command(name = "event-relay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch events from a timestamped log file
    Logs {
        /// Log file to read
        path: PathBuf,

        /// Abort on the first line that fails to decode
        #[arg(long)]
        strict: bool,

        /// Maximum events a single line may trigger
        #[arg(long)]
        cascade_limit: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Moving average of opening prices from a quotes CSV
    Average {
        /// CSV file of date,open,high,low,close,volume rows
        path: PathBuf,

        /// Number of most recent quotes to average
        #[arg(short, long, default_value = "10")]
        window: usize,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    event_relay::init_tracing(cli.verbose);

    match cli.command {
        Commands::Logs {
            path,
            strict,
            cascade_limit,
            output,
        } => run_logs(path, strict, cascade_limit, output),
        Commands::Average {
            path,
            window,
            output,
        } => run_average(path, window, output),
    }
}

fn run_logs(
    path: PathBuf,
    strict: bool,
    cascade_limit: Option<usize>,
    output: OutputFormat,
) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(output, OutputFormat::Pretty);

    if pretty {
        print_header(&term, &path);
    }

    let source = LineSource::open(&path)?;
    let mut counter = CodeCounter::new();

    let mut builder = Dispatcher::builder(source, LineDecoder::new())
        .strict(strict)
        .observer(TracingObserver);
    if let Some(limit) = cascade_limit {
        builder = builder.cascade_limit(limit);
    }
    let mut dispatcher = builder.build()?;

    dispatcher.register(ReactionListener::new());
    if pretty {
        dispatcher
            .register(EchoListener::new(
                "Event1Listener",
                InterestSet::of([LogEvent::MEASUREMENT]),
                io::stdout(),
            ))
            .register(EchoListener::new(
                "Event2Listener",
                InterestSet::of([LogEvent::STATUS]),
                io::stdout(),
            ))
            .register(EchoListener::new(
                "Event3Listener",
                InterestSet::of([LogEvent::REACTION]),
                io::stdout(),
            ));
    }
    dispatcher.register(&mut counter);

    let summary = dispatcher.run()?;

    match output {
        OutputFormat::Pretty => {
            print_summary(&term, &summary);
            for (code, count) in counter.counts() {
                term.write_line(&format!("  {:<10} {}", style(code).cyan(), count))
                    .ok();
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "summary": summary,
                "codes": counter.counts(),
            });
            println!("{:#}", output);
        }
    }

    Ok(())
}

fn run_average(path: PathBuf, window: usize, output: OutputFormat) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(output, OutputFormat::Pretty);

    if pretty {
        print_header(&term, &path);
    }

    let source = LineSource::open(&path)?;
    let mut average = MovingAverage::new(window)?;

    // Progress spinner for pretty output
    let (sender, receiver) = NoticeChannel::new();
    let progress = if pretty {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.green} {pos} quotes {msg}") {
            pb.set_style(spinner);
        }
        Some(pb)
    } else {
        None
    };

    let mut dispatcher = Dispatcher::builder(source, QuoteDecoder::new())
        .observer((TracingObserver, ChannelObserver::new(sender)))
        .build()?;
    dispatcher.register(&mut average);

    // Running consumes the dispatcher, which drops the sender and ends the notice thread
    let summary = with_spinner(progress, receiver, move || dispatcher.run())?;

    match output {
        OutputFormat::Pretty => {
            print_summary(&term, &summary);
            term.write_line(&format!(
                "Moving average from the latest {} quotes: {}",
                average.len(),
                style(format!("{:.4}", average.average())).bold().green()
            ))
            .ok();
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "summary": summary,
                "window": average.window(),
                "quotes_in_window": average.len(),
                "average": average.average(),
            });
            println!("{:#}", output);
        }
    }

    Ok(())
}

/// Run `run` while a separate thread feeds dispatch notices to the spinner
///
/// The spinner is cleared once the notice thread has finished, whether
/// or not the run succeeded.
fn with_spinner<T>(
    progress: Option<ProgressBar>,
    receiver: NoticeReceiver,
    run: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let follower = progress.clone();
    let notice_thread = thread::spawn(move || {
        for notice in receiver.iter() {
            let Some(ref pb) = follower else { continue };
            match notice {
                DispatchNotice::Dispatched { .. } => pb.inc(1),
                DispatchNotice::DecodeFailed { record, .. } => {
                    pb.set_message(format!("(skipped row {})", record + 1));
                }
                _ => {}
            }
        }
    });

    let result = run();
    notice_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    result
}

fn print_header(term: &Term, path: &Path) {
    term.write_line(&format!(
        "{} {}",
        style("Event Relay").bold().cyan(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line(&format!("{} {}", style("Reading").dim(), path.display()))
        .ok();
    term.write_line("").ok();
}

fn print_summary(term: &Term, summary: &RunSummary) {
    term.write_line("").ok();
    term.write_line(&format!("{}", style("Summary:").bold().underlined()))
        .ok();
    term.write_line(&format!(
        "  {} records read, {} events dispatched ({} emitted by listeners)",
        summary.records_read,
        summary.events_dispatched(),
        summary.emitted_events
    ))
    .ok();

    if summary.decode_errors > 0 {
        term.write_line(&format!(
            "  {}",
            style(format!("{} records could not be decoded", summary.decode_errors)).yellow()
        ))
        .ok();
    }
    if summary.listener_errors > 0 {
        term.write_line(&format!(
            "  {}",
            style(format!("{} listener failures", summary.listener_errors)).red()
        ))
        .ok();
    }

    term.write_line(&format!(
        "  {}",
        style(format!("Finished in {} ms", summary.duration_ms)).dim()
    ))
    .ok();
}
