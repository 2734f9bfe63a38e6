use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Fixed-interval polling driver.
///
/// Every tick spawns a fresh future from the factory without waiting for
/// the previous one, so a slow backend produces overlapping in-flight
/// requests that may complete in any order. Callers that need strict
/// ordering must serialize inside their own tick body.
///
/// The first tick fires immediately. Dropping the `Poller` stops the
/// timer; ticks already spawned run to completion, but no new tick fires
/// after the guard is gone.
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn spawn<F, Fut>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                tokio::spawn(tick());
            }
        });
        Self { handle }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_ticks_repeat() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let _poller = Poller::spawn(Duration::from_millis(10), move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_drop_stops_ticking() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let poller = Poller::spawn(Duration::from_millis(10), move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(poller);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let frozen = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), frozen);
    }

    #[tokio::test]
    async fn test_slow_ticks_overlap() {
        let started = Arc::new(AtomicUsize::new(0));
        let seen = started.clone();
        let _poller = Poller::spawn(Duration::from_millis(10), move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                // Far longer than the interval; must not delay later ticks
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(started.load(Ordering::SeqCst) >= 3);
    }
}
