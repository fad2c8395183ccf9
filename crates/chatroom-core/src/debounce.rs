//! Trailing-edge debounce for rapidly changing input such as search text.
//!
//! Values pushed into a [`DebounceInput`] are forwarded to the paired
//! `watch::Receiver` only after no new value has arrived for the configured
//! delay. Dropping the input flushes the latest pending value and ends the
//! background task.

use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::watch;

pub struct DebounceInput<T> {
    tx: watch::Sender<T>,
}

impl<T> DebounceInput<T> {
    /// Replace the pending value and restart the settle timer.
    pub fn set(&self, value: T) {
        // send_replace works with no receivers left
        self.tx.send_replace(value);
    }
}

/// Spawn a debouncer seeded with `initial`. Fails outside a Tokio runtime.
pub fn debounce<T>(
    initial: T,
    delay: Duration,
) -> Result<(DebounceInput<T>, watch::Receiver<T>), TryCurrentError>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let runtime = Handle::try_current()?;
    let (in_tx, mut in_rx) = watch::channel(initial.clone());
    let (out_tx, out_rx) = watch::channel(initial);

    runtime.spawn(async move {
        // Wait for the first change of each burst
        while in_rx.changed().await.is_ok() {
            // Keep extending the window while changes keep arriving
            let input_open = loop {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => break true,
                    changed = in_rx.changed() => {
                        if changed.is_err() {
                            break false;
                        }
                    }
                }
            };

            let settled = in_rx.borrow_and_update().clone();
            out_tx.send_if_modified(|current| {
                if *current == settled {
                    false
                } else {
                    *current = settled;
                    true
                }
            });

            if !input_open {
                break;
            }
        }
        tracing::trace!("debounce input closed");
    });

    Ok((DebounceInput { tx: in_tx }, out_rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_only_settled_value_is_published() {
        let (input, mut output) = debounce(String::new(), DELAY).unwrap();

        for partial in ["r", "ru", "rus", "rust"] {
            input.set(partial.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        // Still typing inside the window
        assert_eq!(*output.borrow(), "");
        assert!(!output.has_changed().unwrap());

        tokio::time::sleep(DELAY).await;
        assert!(output.has_changed().unwrap());
        assert_eq!(*output.borrow_and_update(), "rust");
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_publish_separately() {
        let (input, mut output) = debounce(0u32, DELAY).unwrap();

        input.set(1);
        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(*output.borrow_and_update(), 1);

        input.set(2);
        input.set(3);
        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(*output.borrow_and_update(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returning_to_same_value_is_silent() {
        let (input, mut output) = debounce("a".to_string(), DELAY).unwrap();

        input.set("ab".to_string());
        input.set("a".to_string());
        tokio::time::sleep(DELAY * 2).await;
        assert!(!output.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_flushes_pending_value() {
        let (input, mut output) = debounce(0u32, DELAY).unwrap();
        input.set(7);
        drop(input);

        output.changed().await.unwrap();
        assert_eq!(*output.borrow(), 7);
    }

    #[test]
    fn test_requires_runtime() {
        assert!(debounce(0u32, DELAY).is_err());
    }
}
