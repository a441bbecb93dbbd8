//! Lazily computed value that expires after a fixed TTL.
//!
//! Hits only take a read lock. The first access after expiry recomputes
//! synchronously, and concurrent callers during a recompute wait for it
//! instead of starting their own.

use parking_lot::{Mutex, RwLock};
use std::time::{Duration, Instant};

type Loader<T> = Box<dyn Fn(Option<&T>) -> T + Send + Sync>;

struct Entry<T> {
    value: T,
    /// `None` once invalidated
    loaded_at: Option<Instant>,
}

/// TTL-bounded lazily loaded value.
pub struct ExpiringRef<T> {
    ttl: Duration,
    loader: Loader<T>,
    entry: RwLock<Option<Entry<T>>>,
    refresh: Mutex<()>,
}

impl<T: Clone> ExpiringRef<T> {
    /// The loader receives the previous value, if any, so it can fall back
    /// to it when the underlying source fails.
    pub fn new<F>(ttl: Duration, loader: F) -> Self
    where
        F: Fn(Option<&T>) -> T + Send + Sync + 'static,
    {
        Self {
            ttl,
            loader: Box::new(loader),
            entry: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Current value, reloading it when missing or expired.
    pub fn get(&self) -> T {
        if let Some(value) = self.fresh() {
            return value;
        }

        let _refresh = self.refresh.lock();
        // another caller may have reloaded while we waited
        if let Some(value) = self.fresh() {
            return value;
        }

        let value = {
            let entry = self.entry.read();
            (self.loader)(entry.as_ref().map(|e| &e.value))
        };
        *self.entry.write() = Some(Entry {
            value: value.clone(),
            loaded_at: Some(Instant::now()),
        });
        value
    }

    /// Force the next access to reload. The previous value is still handed
    /// to the loader.
    pub fn invalidate(&self) {
        if let Some(entry) = self.entry.write().as_mut() {
            entry.loaded_at = None;
        }
    }

    /// Time-to-live of loaded values.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn fresh(&self) -> Option<T> {
        let entry = self.entry.read();
        entry.as_ref().and_then(|e| match e.loaded_at {
            Some(at) if at.elapsed() < self.ttl => Some(e.value.clone()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn counting(ttl: Duration, delay: Duration) -> (Arc<ExpiringRef<usize>>, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let cell = ExpiringRef::new(ttl, move |_| {
            thread::sleep(delay);
            counter.fetch_add(1, Ordering::SeqCst) + 1
        });
        (Arc::new(cell), loads)
    }

    #[test]
    fn test_value_cached_within_ttl() {
        let (cell, loads) = counting(Duration::from_secs(60), Duration::ZERO);
        assert_eq!(cell.ttl(), Duration::from_secs(60));
        assert_eq!(cell.get(), 1);
        assert_eq!(cell.get(), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reload_after_expiry() {
        let (cell, loads) = counting(Duration::from_millis(20), Duration::ZERO);
        assert_eq!(cell.get(), 1);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(cell.get(), 2);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_miss_loads_once() {
        let (cell, loads) = counting(Duration::from_secs(60), Duration::from_millis(50));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = cell.clone();
                thread::spawn(move || cell.get())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalidate_passes_previous_value() {
        let cell = ExpiringRef::new(Duration::from_secs(60), |prev: Option<&u32>| {
            prev.map_or(10, |v| v + 1)
        });
        assert_eq!(cell.get(), 10);
        cell.invalidate();
        assert_eq!(cell.get(), 11);
        assert_eq!(cell.get(), 11);
    }
}
