use log::debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;

pub const DEFAULT_REFRESH_EVERY: Duration = Duration::from_secs(60);

/// Something that wants a poke on every refresh tick. The receiver decides
/// whether the tick turns into a fetch.
pub trait AutoRefresh: Send + Sync + 'static {
    fn on_tick(&self) -> impl Future<Output = ()> + Send;
}

/// Periodic refresh loop bound to its owner's lifetime: the owner keeps the
/// `JoinHandle` and aborts it on teardown.
pub struct PeriodicRefresher<T: AutoRefresh> {
    target: Arc<T>,
    every: Duration,
}

impl<T: AutoRefresh> PeriodicRefresher<T> {
    pub fn new(target: Arc<T>, every: Duration) -> Self {
        Self { target, every }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        let mut ticker = interval(self.every);
        // Skip the immediate first tick so the initial load isn't doubled up.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            debug!("auto-refresh tick");
            self.target.on_tick().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl AutoRefresh for Counter {
        async fn on_tick(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval_after_the_first() {
        let counter = Arc::new(Counter::default());
        let handle = PeriodicRefresher::new(counter.clone(), Duration::from_secs(60)).spawn();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 3);

        handle.abort();
        let _ = handle.await;
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 3, "aborted refresher must stop ticking");
    }
}
