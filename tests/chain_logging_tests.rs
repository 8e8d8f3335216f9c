//! Failure reports emitted while a chain evaluates records.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use femtologging_filters::{
    DecideError, FemtoLevel, FemtoLogRecord, FilterChain, FilterDecision, FnFilter,
};
use logtest::Logger;

fn mock_time_provider(time: Arc<AtomicU64>) -> impl Fn() -> u64 {
    move || time.load(Ordering::Relaxed)
}

/// Pop every captured record and keep the warnings.
fn drain_warnings(logger: &mut Logger) -> Vec<String> {
    let mut warnings = Vec::new();
    while let Some(record) = logger.pop() {
        if record.level() == log::Level::Warn {
            warnings.push(record.args().to_string());
        }
    }
    warnings
}

#[test]
fn chain_reports_failures_through_log() {
    let mut logger = Logger::start();
    drain_warnings(&mut logger);
    let time = Arc::new(AtomicU64::new(0));
    let chain = FilterChain::builder()
        .with_label("AuditChain")
        .with_time_provider(Box::new(mock_time_provider(time)))
        .with_filter(
            FnFilter::fallible(|_| Err(DecideError::Evaluation("no such field".into())))
                .with_name("field-match"),
        )
        .build()
        .expect("chain should build");

    let record = FemtoLogRecord::new("audit", FemtoLevel::Info, "msg");
    assert_eq!(chain.decide(&record), Ok(FilterDecision::Neutral));
    assert_eq!(chain.decide(&record), Ok(FilterDecision::Neutral));

    let warnings = drain_warnings(&mut logger);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("AuditChain: 1 filter failures"));
    assert!(warnings[0].contains("field-match"));

    assert_eq!(chain.failure_reporter().flush(), 1);
    let warnings = drain_warnings(&mut logger);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("1 filter failures treated as neutral since the last report"));
}
