//! Wiring faults reported by the filtering handler, captured with `logtest`.

mod test_utils;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use femtologging_filters::{
    ChainSettings, DecideError, FemtoFilter, FemtoHandlerTrait, FemtoLevel, FemtoLogRecord,
    FilterChain, FilterDecision, FilterLink, FilteredHandler, femto_filter_link,
};
use logtest::Logger;
use test_utils::{CollectingHandler, record};

/// Filter whose successor is always a brand new filter, so the chain never
/// ends.
#[derive(Default)]
struct EndlessFilter {
    link: FilterLink,
}

impl FemtoFilter for EndlessFilter {
    femto_filter_link!(link);

    fn decide(&self, _record: &FemtoLogRecord) -> Result<FilterDecision, DecideError> {
        Ok(FilterDecision::Neutral)
    }

    fn next(&self) -> Option<Arc<dyn FemtoFilter>> {
        Some(Arc::new(EndlessFilter::default()))
    }
}

fn drain_errors(logger: &mut Logger) -> Vec<String> {
    let mut errors = Vec::new();
    while let Some(record) = logger.pop() {
        if record.level() == log::Level::Error {
            errors.push(record.args().to_string());
        }
    }
    errors
}

#[test]
fn miswired_chain_logs_error_and_forwards_records() {
    let mut logger = Logger::start();
    drain_errors(&mut logger);
    let time = Arc::new(AtomicU64::new(0));
    let clock = Arc::clone(&time);
    let chain = FilterChain::builder()
        .with_settings(ChainSettings::new().with_max_hops(4))
        .with_time_provider(Box::new(move || clock.load(Ordering::Relaxed)))
        .with_filter(EndlessFilter::default())
        .build()
        .expect("chain should build");
    let handler = FilteredHandler::with_filter_chain(CollectingHandler::default(), chain);

    handler
        .handle(record(FemtoLevel::Info, "first"))
        .expect("handle should succeed");
    let errors = drain_errors(&mut logger);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("exceeded 4 hops"));
    assert!(errors[0].contains("app.core"));

    // Further faults inside the interval are counted, not logged.
    handler
        .handle(record(FemtoLevel::Info, "second"))
        .expect("handle should succeed");
    assert!(drain_errors(&mut logger).is_empty());

    time.store(5, Ordering::Relaxed);
    handler
        .handle(record(FemtoLevel::Info, "third"))
        .expect("handle should succeed");
    let errors = drain_errors(&mut logger);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("2 records logged unfiltered"));

    assert_eq!(handler.inner().messages(), ["first", "second", "third"]);
    assert_eq!(handler.denied_records(), 0);
    let chain = handler.filter_chain().expect("chain is installed");
    assert_eq!(chain.failure_reporter().total_wiring_faults(), 3);
}
