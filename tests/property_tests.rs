//! Property-based tests for bridge_resilience using proptest

use bridge_resilience::client::{
    BusinessCodeClassifier, DefaultRetryPredicate, RawResponse, RequestError, ResponseClassifier,
    RetryPolicy, RetryPredicate,
};
use bridge_resilience::prelude::*;
use proptest::prelude::*;
use serde_json::json;
use std::time::Duration;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Critical),
    ]
}

fn any_category() -> impl Strategy<Value = LogCategory> {
    prop::sample::select(LogCategory::ALL.to_vec())
}

/// Failures a request can end with, business errors excluded
fn any_transient_or_client_error() -> impl Strategy<Value = RequestError> {
    prop_oneof![
        "[a-z ]{0,20}".prop_map(|m| RequestError::transport(m)),
        "[a-z ]{0,20}".prop_map(|m| RequestError::timeout(m)),
        (400u16..600).prop_map(|status| RequestError::http(status, b"")),
        (200u16..300).prop_map(|status| RequestError::decode(status, "eof")),
    ]
}

// ============================================================================
// LogLevel / LogCategory Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let text = if lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        let parsed: std::result::Result<LogLevel, String> = text.parse();
        prop_assert_eq!(parsed, Ok(level));
    }

    /// Test that LogLevel ordering follows severity values
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        prop_assert_eq!(a < b, (a as u8) < (b as u8));
    }

    /// Test that LogCategory string conversions roundtrip correctly
    #[test]
    fn test_log_category_roundtrip(category in any_category()) {
        let parsed: std::result::Result<LogCategory, String> = category.as_str().parse();
        prop_assert_eq!(parsed, Ok(category));
    }
}

// ============================================================================
// LogEntry Sanitization Tests
// ============================================================================

proptest! {
    /// Test that control characters never survive in titles or messages
    #[test]
    fn test_entry_text_is_single_line(title in ".*", message in ".*") {
        let entry = LogEntry::new(LogLevel::Info, LogCategory::General, &title)
            .with_message(&message);

        prop_assert!(!entry.title.contains('\n') && !entry.title.contains('\r'));
        let stored = entry.message.unwrap_or_default();
        prop_assert!(!stored.contains('\n') && !stored.contains('\r'));
        prop_assert!(!stored.contains('\t'));
    }

    /// Test that a fake entry cannot be injected through the title
    #[test]
    fn test_title_injection_prevention(
        legitimate in "[a-zA-Z0-9 ]+",
        injected in prop_oneof![Just("ERROR"), Just("CRITICAL")]
    ) {
        let entry = LogEntry::new(
            LogLevel::Info,
            LogCategory::Bridge,
            format!("{}\n[{}][api] Fake failure", legitimate, injected),
        );
        prop_assert_eq!(entry.title.lines().count(), 1);
    }

    /// Test that entries serialize with the wire level and category names
    #[test]
    fn test_entry_serialization(level in any_level(), category in any_category()) {
        let entry = LogEntry::new(level, category, "title");
        let value = serde_json::to_value(&entry).unwrap();
        prop_assert_eq!(value["level"].as_str(), Some(level.to_str()));
        prop_assert_eq!(value["category"].as_str(), Some(category.as_str()));
    }
}

// ============================================================================
// Retry Policy Tests
// ============================================================================

proptest! {
    /// Test that the delay is base_delay * 2^attempt
    #[test]
    fn test_backoff_formula(base_ms in 1u64..5_000, attempt in 0u32..10) {
        let policy = RetryPolicy::new(10, Duration::from_millis(base_ms));
        prop_assert_eq!(
            policy.delay_for(attempt),
            Duration::from_millis(base_ms * (1u64 << attempt))
        );
    }

    /// Test that delays never shrink from one attempt to the next
    #[test]
    fn test_backoff_is_monotonic(base_ms in 0u64..10_000, attempt in 0u32..40) {
        let policy = RetryPolicy::new(50, Duration::from_millis(base_ms));
        prop_assert!(policy.delay_for(attempt) <= policy.delay_for(attempt + 1));
    }

    /// Test that jittered delays stay within the configured spread
    #[test]
    fn test_jitter_bounds(base_ms in 1u64..5_000, attempt in 0u32..6, fraction in 0.0f64..1.0) {
        let policy = RetryPolicy::new(6, Duration::from_millis(base_ms)).with_jitter(fraction);
        let nominal = Duration::from_millis(base_ms * (1u64 << attempt)).as_secs_f64();
        let delay = policy.delay_for(attempt).as_secs_f64();
        prop_assert!(delay >= nominal * (1.0 - fraction) - 1e-6);
        prop_assert!(delay <= nominal * (1.0 + fraction) + 1e-6);
    }

    /// Test that a loop driven by should_retry makes at most max_retries + 1 attempts
    #[test]
    fn test_attempts_bounded(max_retries in 0u32..8, error in any_transient_or_client_error()) {
        let policy = RetryPolicy::new(max_retries, Duration::from_millis(1));
        let mut attempt = 0;
        let mut attempts = 1;
        while policy.should_retry(attempt, &error) {
            attempt += 1;
            attempts += 1;
        }
        prop_assert!(attempts <= max_retries + 1);
        if DefaultRetryPredicate.is_retryable(&error) {
            prop_assert_eq!(attempts, max_retries + 1);
        } else {
            prop_assert_eq!(attempts, 1);
        }
    }

    /// Test that business errors are never retried, whatever the predicate
    #[test]
    fn test_business_never_retried(code in any::<i64>(), attempt in 0u32..5, max_retries in 0u32..10) {
        let policy = RetryPolicy::new(max_retries, Duration::from_millis(1))
            .with_predicate(|_: &RequestError| true);
        prop_assert!(!policy.should_retry(attempt, &RequestError::business(code, "rejected")));
    }

    /// Test that 5xx is retryable and 4xx is not, whatever the body says
    #[test]
    fn test_status_retryability(status in 400u16..600, body in prop_oneof![Just(""), Just("upstream timeout")]) {
        let error = RequestError::http(status, body.as_bytes());
        prop_assert_eq!(DefaultRetryPredicate.is_retryable(&error), status >= 500);
    }
}

// ============================================================================
// Classifier / Error Code Tests
// ============================================================================

proptest! {
    /// Test that any non-zero code in a 200 body becomes a business error
    #[test]
    fn test_non_zero_code_is_business(code in any::<i64>().prop_filter("non-zero", |c| *c != 0)) {
        let response = RawResponse::json(200, &json!({"code": code, "message": "rejected"}));
        let err = BusinessCodeClassifier.classify(&response).unwrap_err();
        prop_assert_eq!(err.business_code(), Some(code));
        prop_assert_eq!(ErrorCode::from_error(&err), ErrorCode::BusinessError);
    }

    /// Test that a non-zero code written as a float is still a business error
    #[test]
    fn test_non_zero_float_code_is_business(code in any::<i32>().prop_filter("non-zero", |c| *c != 0)) {
        let response = RawResponse::json(200, &json!({"code": f64::from(code), "message": "rejected"}));
        let err = BusinessCodeClassifier.classify(&response).unwrap_err();
        prop_assert_eq!(err.business_code(), Some(i64::from(code)));
    }

    /// Test that integer codes beyond i64 are business errors too
    #[test]
    fn test_oversized_code_is_business(code in (i64::MAX as u64 + 1)..=u64::MAX) {
        let response = RawResponse::json(200, &json!({"code": code}));
        let err = BusinessCodeClassifier.classify(&response).unwrap_err();
        prop_assert_eq!(err.business_code(), Some(i64::MAX));
    }

    /// Test that non-2xx statuses never classify as success
    #[test]
    fn test_non_success_status_fails(status in prop_oneof![100u16..200, 300u16..600]) {
        let response = RawResponse::json(status, &json!({"code": 0}));
        let err = BusinessCodeClassifier.classify(&response).unwrap_err();
        prop_assert_eq!(err.status(), Some(status));
        prop_assert!(!err.is_business());
    }
}

// ============================================================================
// Logger Filtering Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Test that only entries at or above the minimum level are buffered
    #[test]
    fn test_level_filtering(
        min_level in any_level(),
        levels in prop::collection::vec(any_level(), 0..20)
    ) {
        let logger = Logger::builder()
            .min_level(min_level)
            .enable_console(false)
            .remote_endpoint("http://collector.test/logs")
            .max_buffer_size(1_000)
            .flush_interval(Duration::ZERO)
            .build()
            .unwrap();
        let before = logger.buffered_len();

        for level in &levels {
            logger.log(*level, LogCategory::General, "entry", None, None, None, None);
        }

        let expected = levels.iter().filter(|l| **l >= min_level).count();
        prop_assert_eq!(logger.buffered_len(), before + expected);

        // Skip the final flush against the unreachable collector
        logger.update_config(LoggerConfigUpdate::new().enable_remote(false)).unwrap();
        logger.destroy_with_timeout(Duration::from_secs(1));
    }
}
