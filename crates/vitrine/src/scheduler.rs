// File: src/scheduler.rs
// Purpose: Lazy-Load Scheduler. Loads deferred sections when they become relevant.
//
// A trigger hands out one future per key that resolves once the key becomes
// relevant (scrolled near, requested, ...). Without a trigger, keys are loaded
// in fixed-size batches. All work runs inside the calling task.

use futures::future::{join_all, ready, BoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::debug;

/// "Become relevant" signal source
pub trait Trigger: Send + Sync {
    /// Resolves to `true` when `key` becomes relevant, `false` if it never will
    fn relevant(&self, key: &str) -> BoxFuture<'static, bool>;
}

/// Every key is relevant right away
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateTrigger;

impl Trigger for ImmediateTrigger {
    fn relevant(&self, _key: &str) -> BoxFuture<'static, bool> {
        ready(true).boxed()
    }
}

/// Keys become relevant when something calls [`SignalTrigger::fire`].
///
/// Each registration is one-shot: firing removes it, so a key loads at most
/// once. Dropping the trigger releases every waiter with `false`.
#[derive(Debug, Clone, Default)]
pub struct SignalTrigger {
    waiting: Arc<Mutex<HashMap<String, oneshot::Sender<()>>>>,
}

impl SignalTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` relevant. Returns whether anything was waiting for it.
    pub fn fire(&self, key: &str) -> bool {
        let sender = match self.waiting.lock() {
            Ok(mut waiting) => waiting.remove(key),
            Err(_) => None,
        };
        match sender {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Keys registered and not fired yet
    pub fn pending(&self) -> Vec<String> {
        match self.waiting.lock() {
            Ok(waiting) => waiting.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Release every waiter without loading
    pub fn cancel_all(&self) {
        if let Ok(mut waiting) = self.waiting.lock() {
            waiting.clear();
        }
    }
}

impl Trigger for SignalTrigger {
    fn relevant(&self, key: &str) -> BoxFuture<'static, bool> {
        let (tx, rx) = oneshot::channel();
        if let Ok(mut waiting) = self.waiting.lock() {
            // A newer registration replaces (and releases) an older one
            waiting.insert(key.to_string(), tx);
        }
        rx.map(|fired| fired.is_ok()).boxed()
    }
}

pub const DEFAULT_BATCH_SIZE: usize = 4;

pub struct LazyScheduler {
    trigger: Option<Arc<dyn Trigger>>,
    batch_size: usize,
}

impl LazyScheduler {
    /// Fallback loader: keys load in order, `batch_size` at a time
    pub fn batched(batch_size: usize) -> Self {
        Self {
            trigger: None,
            batch_size: batch_size.max(1),
        }
    }

    pub fn with_trigger(trigger: Arc<dyn Trigger>) -> Self {
        Self {
            trigger: Some(trigger),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Load every key. Results come back in completion order, keyed, so
    /// callers fill reserved positions by key rather than by arrival.
    pub async fn run<F, Fut, O>(&self, keys: Vec<String>, load: F) -> Vec<(String, O)>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = O>,
    {
        match &self.trigger {
            Some(trigger) => Self::run_triggered(trigger.as_ref(), keys, load).await,
            None => self.run_batched(keys, load).await,
        }
    }

    async fn run_triggered<F, Fut, O>(trigger: &dyn Trigger, keys: Vec<String>, load: F) -> Vec<(String, O)>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = O>,
    {
        let load = &load;
        let mut pending: FuturesUnordered<_> = keys
            .into_iter()
            .map(|key| {
                let signal = trigger.relevant(&key);
                async move {
                    if !signal.await {
                        debug!(key = %key, "lazy slot released without loading");
                        return None;
                    }
                    let output = load(key.clone()).await;
                    Some((key, output))
                }
            })
            .collect();

        let mut loaded = Vec::new();
        while let Some(result) = pending.next().await {
            if let Some(entry) = result {
                loaded.push(entry);
            }
        }
        loaded
    }

    async fn run_batched<F, Fut, O>(&self, keys: Vec<String>, load: F) -> Vec<(String, O)>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = O>,
    {
        let mut loaded = Vec::with_capacity(keys.len());
        for batch in keys.chunks(self.batch_size) {
            let outputs = join_all(batch.iter().map(|key| load(key.clone()))).await;
            loaded.extend(batch.iter().cloned().zip(outputs));
        }
        debug!(loaded = loaded.len(), batch_size = self.batch_size, "batch loader finished");
        loaded
    }
}

impl Default for LazyScheduler {
    fn default() -> Self {
        Self::batched(DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex as AsyncMutex;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_batched_loads_everything_in_order() {
        let scheduler = LazyScheduler::batched(2);
        let loaded = scheduler
            .run(keys(&["a", "b", "c"]), |key| async move { key.to_uppercase() })
            .await;

        assert_eq!(
            loaded,
            vec![
                ("a".to_string(), "A".to_string()),
                ("b".to_string(), "B".to_string()),
                ("c".to_string(), "C".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_batches_bound_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let scheduler = LazyScheduler::batched(2);
        scheduler
            .run(keys(&["a", "b", "c", "d", "e"]), |_| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                }
            })
            .await;

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_immediate_trigger_loads_all() {
        let scheduler = LazyScheduler::with_trigger(Arc::new(ImmediateTrigger));
        let mut loaded = scheduler.run(keys(&["x", "y"]), |key| async move { key.len() }).await;
        loaded.sort();
        assert_eq!(loaded, vec![("x".to_string(), 1), ("y".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_signal_trigger_loads_in_firing_order() {
        let trigger = SignalTrigger::new();
        let scheduler = LazyScheduler::with_trigger(Arc::new(trigger.clone()));
        let order = Arc::new(AsyncMutex::new(Vec::new()));

        let run = {
            let order = order.clone();
            async move {
                scheduler
                    .run(keys(&["first", "second", "third"]), move |key| {
                        let order = order.clone();
                        async move {
                            order.lock().await.push(key.clone());
                            key
                        }
                    })
                    .await
            }
        };

        let fire = async {
            // Let the scheduler register every key first
            while trigger.pending().len() < 3 {
                tokio::task::yield_now().await;
            }
            assert!(trigger.fire("third"));
            tokio::task::yield_now().await;
            assert!(trigger.fire("first"));
            tokio::task::yield_now().await;
            assert!(trigger.fire("second"));
            // One-shot: a second fire finds nothing
            assert!(!trigger.fire("second"));
        };

        let (loaded, ()) = tokio::join!(run, fire);
        assert_eq!(loaded.len(), 3);
        assert_eq!(*order.lock().await, vec!["third", "first", "second"]);
    }

    #[tokio::test]
    async fn test_cancelled_keys_never_load() {
        let trigger = SignalTrigger::new();
        let scheduler = LazyScheduler::with_trigger(Arc::new(trigger.clone()));
        let loads = Arc::new(AtomicUsize::new(0));

        let run = scheduler.run(keys(&["a", "b"]), |_| {
            let loads = loads.clone();
            async move {
                loads.fetch_add(1, Ordering::SeqCst);
            }
        });

        let cancel = async {
            while trigger.pending().len() < 2 {
                tokio::task::yield_now().await;
            }
            trigger.fire("a");
            trigger.cancel_all();
        };

        let (loaded, ()) = tokio::join!(run, cancel);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
