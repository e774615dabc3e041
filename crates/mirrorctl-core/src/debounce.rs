// ── Debouncer ──
//
// Collapses bursts of values into the last one. A value is delivered
// once no newer value has arrived for `delay`.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Trailing-edge debouncer backed by a background task.
///
/// Values pushed while the task is busy delivering are queued and form
/// the next burst. Dropping the debouncer flushes any pending value.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debounce task. `deliver` runs once per quiet window.
    pub fn spawn<F, Fut>(delay: Duration, cancel: CancellationToken, deliver: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(debounce_task(rx, delay, cancel, deliver));
        Self { tx, handle }
    }

    /// Queue a value. Returns `false` once the task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }

    /// Close the input and wait for the pending value, if any, to be delivered.
    pub async fn flush(self) {
        drop(self.tx);
        let _ = self.handle.await;
    }
}

async fn debounce_task<T, F, Fut>(
    mut rx: mpsc::UnboundedReceiver<T>,
    delay: Duration,
    cancel: CancellationToken,
    mut deliver: F,
) where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        let mut latest = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            value = rx.recv() => match value {
                Some(value) => value,
                None => return,
            },
        };

        // Keep replacing `latest` until the channel goes quiet.
        let closed = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                value = rx.recv() => match value {
                    Some(value) => latest = value,
                    None => break true,
                },
                () = tokio::time::sleep(delay) => break false,
            }
        };

        deliver(latest).await;
        if closed {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<i64>>>, impl FnMut(i64) -> std::future::Ready<()> + Send) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let deliver = move |v| {
            sink.lock().expect("lock").push(v);
            std::future::ready(())
        };
        (seen, deliver)
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_only_the_last_value_of_a_burst() {
        let (seen, deliver) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(300), CancellationToken::new(), deliver);

        for v in [10, 20, 30] {
            assert!(debouncer.push(v));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(seen.lock().expect("lock").is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(*seen.lock().expect("lock"), vec![30]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_are_delivered_separately() {
        let (seen, deliver) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(300), CancellationToken::new(), deliver);

        debouncer.push(40);
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.push(60);
        debouncer.push(65);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(*seen.lock().expect("lock"), vec![40, 65]);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_delivers_pending_value() {
        let (seen, deliver) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_secs(60), CancellationToken::new(), deliver);

        debouncer.push(5);
        debouncer.flush().await;
        assert_eq!(*seen.lock().expect("lock"), vec![5]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_value() {
        let (seen, deliver) = recorder();
        let cancel = CancellationToken::new();
        let debouncer = Debouncer::spawn(Duration::from_millis(300), cancel.clone(), deliver);

        debouncer.push(75);
        cancel.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(seen.lock().expect("lock").is_empty());
        assert!(!debouncer.push(80));
    }
}
