//! Integration tests for the log line and quote pipelines.
//!
//! These tests read real files from disk and verify:
//! - Reactions emitted while processing a line are echoed before the next line
//! - Malformed lines are skipped unless the run is strict
//! - Moving averages over a quotes CSV

use assert_fs::prelude::*;
use assert_fs::NamedTempFile;
use event_relay::core::dispatcher::Dispatcher;
use event_relay::core::listener::InterestSet;
use event_relay::core::observer::{ChannelObserver, DispatchNotice, NoticeChannel, NullObserver};
use event_relay::core::source::LineSource;
use event_relay::error::PipelineError;
use event_relay::logline::{CodeCounter, EchoListener, LineDecoder, LogEvent, ReactionListener};
use event_relay::quotes::{MovingAverage, QuoteDecoder};
use predicates::prelude::*;

const LOG: &str = r#"2018-03-01 10:15:00 Event1 a=1.5 b=2
2018-03-01 10:15:01 Event2 sit=4 abc="hello"

2018-03-01 10:15:02 Event1 a=0.5 b=1
"#;

fn log_file(contents: &str) -> NamedTempFile {
    let file = NamedTempFile::new("data.txt").unwrap();
    file.write_str(contents).unwrap();
    file
}

#[test]
fn log_file_reactions_follow_their_trigger() {
    let file = log_file(LOG);
    let mut echo = EchoListener::new("echo", InterestSet::any(), Vec::new());
    let mut counter = CodeCounter::new();

    let mut dispatcher = Dispatcher::builder(LineSource::open(file.path()).unwrap(), LineDecoder::new())
        .observer(NullObserver)
        .build()
        .unwrap();
    dispatcher
        .register(ReactionListener::new())
        .register(&mut echo)
        .register(&mut counter);

    let summary = dispatcher.run().unwrap();

    let text = String::from_utf8(echo.into_inner()).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0], "Caught Event1 with value a=1.5, b=2 by echo");
    assert_eq!(lines[1], "Caught Event3 with value event emitted by listener by echo");
    assert_eq!(lines[2], "Caught Event3 with value another event emitted by listener by echo");
    assert_eq!(lines[3], "Caught Event2 with value sit=4, abc=hello by echo");

    assert_eq!(counter.count(&LogEvent::MEASUREMENT), 2);
    assert_eq!(counter.count(&LogEvent::STATUS), 1);
    assert_eq!(counter.count(&LogEvent::REACTION), 6);

    assert_eq!(summary.records_read, 4);
    assert_eq!(summary.records_skipped, 1);
    assert_eq!(summary.emitted_events, 6);
}

#[test]
fn malformed_lines_are_reported_and_skipped() {
    let file = log_file(
        "2018-03-01 10:15:00 Event1 a=1.5\n\
         2018-03-01 10:15:01 Event7 x=1\n\
         2018-03-01 10:15:02 Event1 a=2 b=3\n",
    );
    let (sender, receiver) = NoticeChannel::new();
    let mut counter = CodeCounter::new();

    let mut dispatcher = Dispatcher::builder(LineSource::open(file.path()).unwrap(), LineDecoder::new())
        .observer(ChannelObserver::new(sender))
        .build()
        .unwrap();
    dispatcher.register(&mut counter);

    let summary = dispatcher.run().unwrap();

    assert_eq!(summary.decode_errors, 2);
    assert_eq!(counter.count(&LogEvent::MEASUREMENT), 1);

    let messages: Vec<String> = receiver
        .iter()
        .filter_map(|notice| match notice {
            DispatchNotice::DecodeFailed { message, .. } => Some(message),
            _ => None,
        })
        .collect();
    assert_eq!(messages.len(), 2);
    assert!(predicate::str::contains("'b'").eval(&messages[0]));
    assert!(predicate::str::contains("Event7").eval(&messages[1]));
}

#[test]
fn invalid_utf8_line_is_skipped_not_fatal() {
    let file = NamedTempFile::new("data.txt").unwrap();
    file.write_binary(
        b"2018-03-01 10:15:00 Event1 a=1 b=2\n\
          2018-03-01 10:15:01 Event1 a=\xff b=2\n\
          2018-03-01 10:15:02 Event1 a=3 b=4\n",
    )
    .unwrap();
    let (sender, receiver) = NoticeChannel::new();
    let mut counter = CodeCounter::new();

    let mut dispatcher = Dispatcher::builder(LineSource::open(file.path()).unwrap(), LineDecoder::new())
        .observer(ChannelObserver::new(sender))
        .build()
        .unwrap();
    dispatcher.register(&mut counter);

    let summary = dispatcher.run().unwrap();

    assert_eq!(summary.records_read, 3);
    assert_eq!(summary.decode_errors, 1);
    assert_eq!(counter.count(&LogEvent::MEASUREMENT), 2);

    let failed: Vec<(usize, String)> = receiver
        .pending()
        .into_iter()
        .filter_map(|notice| match notice {
            DispatchNotice::DecodeFailed { record, message } => Some((record, message)),
            _ => None,
        })
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, 1);
    assert!(predicate::str::contains("'a'").eval(&failed[0].1));
}

#[test]
fn strict_run_stops_at_first_malformed_line() {
    let file = log_file(
        "2018-03-01 10:15:00 Event1 a=1 b=1\n\
         2018-03-01 10:15:01 Event2 sit=x abc=\"y\"\n\
         2018-03-01 10:15:02 Event1 a=2 b=3\n",
    );
    let mut counter = CodeCounter::new();

    let mut dispatcher = Dispatcher::builder(LineSource::open(file.path()).unwrap(), LineDecoder::new())
        .strict(true)
        .observer(NullObserver)
        .build()
        .unwrap();
    dispatcher.register(&mut counter);

    let error = dispatcher.run().unwrap_err();

    assert!(matches!(error, PipelineError::Decode { record: 1, .. }));
    assert!(predicate::str::contains("sit").eval(&error.to_string()));
    assert_eq!(counter.total(), 1);
}

#[test]
fn missing_log_file_is_a_source_error() {
    let error = LineSource::open("/nonexistent/data.txt")
        .err()
        .map(PipelineError::from)
        .unwrap();
    assert!(matches!(error, PipelineError::Source(_)));
}

#[test]
fn moving_average_over_quotes_csv() {
    let file = NamedTempFile::new("quotes.csv").unwrap();
    file.write_str(
        "Date,Open,High,Low,Close,Volume\n\
         2017-01-03,10.0,11.0,9.0,10.5,1000\n\
         2017-01-04,20.0,21.0,19.0,20.5,1000\n\
         2017-01-05,not-a-price,1,1,1,1\n\
         2017-01-06,30.0,31.0,29.0,30.5,1000\n\
         2017-01-09,40.0,41.0,39.0,40.5,1000\n",
    )
    .unwrap();

    let mut average = MovingAverage::new(3).unwrap();
    let mut dispatcher = Dispatcher::builder(LineSource::open(file.path()).unwrap(), QuoteDecoder::new())
        .observer(NullObserver)
        .build()
        .unwrap();
    dispatcher.register(&mut average);

    let summary = dispatcher.run().unwrap();

    assert_eq!(summary.primary_events, 4);
    assert_eq!(summary.decode_errors, 1);
    assert_eq!(summary.records_skipped, 1);
    assert_eq!(average.len(), 3);
    assert_eq!(average.average(), 30.0);
}
