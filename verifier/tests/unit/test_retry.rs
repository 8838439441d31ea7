//! Retry executor tests

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use deploy_verifier::errors::VerifyError;
use deploy_verifier::http::retry::{with_retry, with_retry_and_sleep, RetryPolicy};
use reqwest::StatusCode;
use tokio_test::{assert_err, assert_ok};

fn policy(max_retries: u32, base_delay_ms: u64) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay: Duration::from_millis(base_delay_ms),
        ..Default::default()
    }
}

fn server_error() -> VerifyError {
    VerifyError::Http {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "upstream down".to_string(),
    }
}

/// Records requested sleeps instead of sleeping
fn recording_sleep(
    slept: Arc<Mutex<Vec<Duration>>>,
) -> impl Fn(Duration) -> std::future::Ready<()> {
    move |delay| {
        slept.lock().unwrap().push(delay);
        std::future::ready(())
    }
}

#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_always_failing_operation_uses_whole_budget() {
    let calls = AtomicU32::new(0);
    let slept = Arc::new(Mutex::new(Vec::new()));

    let result: Result<(), _> = with_retry_and_sleep(
        &policy(4, 100),
        "listDeployments",
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(server_error()) }
        },
        recording_sleep(slept.clone()),
    )
    .await;

    let err = assert_err!(result);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert!(matches!(err, VerifyError::RetriesExhausted { attempts: 4, .. }));
    let message = err.to_string();
    assert!(message.contains("listDeployments"));
    assert!(message.contains("4 attempts"));
    assert!(message.contains("upstream down"));
}

#[tokio::test]
async fn test_backoff_doubles_between_attempts() {
    let slept = Arc::new(Mutex::new(Vec::new()));

    let result: Result<(), _> = with_retry_and_sleep(
        &policy(5, 250),
        "getDeployment",
        || async { Err(server_error()) },
        recording_sleep(slept.clone()),
    )
    .await;

    assert_err!(result);
    assert_eq!(
        *slept.lock().unwrap(),
        vec![
            Duration::from_millis(250),
            Duration::from_millis(500),
            Duration::from_millis(1000),
            Duration::from_millis(2000),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_default_policy_waits_one_then_two_seconds() {
    let start = tokio::time::Instant::now();

    let result: Result<(), _> = with_retry(&RetryPolicy::default(), "getDeploymentEvents", || async {
        Err(server_error())
    })
    .await;

    assert_err!(result);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_secs(4));
}

#[tokio::test]
async fn test_succeeds_after_two_timeouts_with_two_retry_warnings() {
    let buffer = CaptureWriter::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let calls = AtomicU32::new(0);
    let slept = Arc::new(Mutex::new(Vec::new()));

    let result = with_retry_and_sleep(
        &policy(3, 1000),
        "getDeployment",
        || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if attempt <= 2 {
                    Err(VerifyError::Timeout {
                        timeout: Duration::from_secs(30),
                    })
                } else {
                    Ok("dpl_1")
                }
            }
        },
        recording_sleep(slept.clone()),
    )
    .await;

    assert_eq!(assert_ok!(result), "dpl_1");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(slept.lock().unwrap().len(), 2);

    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    let warnings = output
        .lines()
        .filter(|line| line.contains("WARN") && line.contains("Retrying"))
        .count();
    assert_eq!(warnings, 2);
    let attempts = output
        .lines()
        .filter(|line| line.contains("DEBUG") && line.contains("attempt"))
        .count();
    assert_eq!(attempts, 3);
}

#[tokio::test]
async fn test_client_errors_are_terminal_when_not_retried() {
    let calls = AtomicU32::new(0);
    let strict = RetryPolicy {
        retry_client_errors: false,
        ..policy(3, 1)
    };

    let result: Result<(), _> = with_retry(&strict, "getDeployment", || {
        calls.fetch_add(1, Ordering::SeqCst);
        async {
            Err(VerifyError::Http {
                status: StatusCode::NOT_FOUND,
                message: "Deployment not found".to_string(),
            })
        }
    })
    .await;

    let err = assert_err!(result);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(err, VerifyError::RetriesExhausted { attempts: 1, .. }));
}

#[tokio::test]
async fn test_zero_budget_still_attempts_once() {
    let calls = AtomicU32::new(0);

    let result = with_retry(&policy(0, 1), "listDeployments", || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, VerifyError>(()) }
    })
    .await;

    assert_ok!(result);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
