//! Bounded readiness polling.
//!
//! A probe is retried on a fixed interval until it succeeds or a deadline
//! passes. Running out of time is not a failure: the caller proceeds as if the
//! target were ready.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The probe reported ready within the deadline.
    Confirmed { attempts: u32 },
    /// The deadline passed without confirmation.
    Assumed { attempts: u32 },
}

/// Poll `probe` every `interval` until it returns `true` or `deadline` elapses.
///
/// The probe runs at least once. A probe that is still running when the
/// deadline passes is abandoned.
pub async fn wait_until_ready<F, Fut>(mut probe: F, interval: Duration, deadline: Duration) -> Readiness
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let give_up_at = Instant::now() + deadline;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match tokio::time::timeout_at(give_up_at, probe()).await {
            Ok(true) => return Readiness::Confirmed { attempts },
            Ok(false) => {}
            Err(_) => return Readiness::Assumed { attempts },
        }

        let next = Instant::now() + interval;
        if next >= give_up_at {
            return Readiness::Assumed { attempts };
        }
        tokio::time::sleep_until(next).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_on_first_try() {
        let r = wait_until_ready(|| async { true }, Duration::from_millis(100), Duration::from_secs(1)).await;
        assert_eq!(r, Readiness::Confirmed { attempts: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_after_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let probe = {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { n >= 3 }
            }
        };
        let r = wait_until_ready(probe, Duration::from_millis(100), Duration::from_secs(1)).await;
        assert_eq!(r, Readiness::Confirmed { attempts: 3 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_assumed_after_deadline() {
        let r = wait_until_ready(
            || async { false },
            Duration::from_millis(200),
            Duration::from_millis(1000),
        )
        .await;
        // t=0, 200, 400, 600, 800; the next tick would land on the deadline.
        assert_eq!(r, Readiness::Assumed { attempts: 5 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_probe_abandoned_at_deadline() {
        let r = wait_until_ready(
            || std::future::pending::<bool>(),
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .await;
        assert_eq!(r, Readiness::Assumed { attempts: 1 });
    }
}
