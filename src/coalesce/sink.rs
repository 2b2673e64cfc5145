//! Outbound seam towards the rendering layer.
//!
//! The concrete plot-update logic lives entirely outside this crate; the
//! consumer thread only ever talks to it through [`EventSink`].

use crate::error::Result;
use crate::types::AttributeEvent;

/// Downstream consumer of coalesced events.
///
/// `forward` is invoked synchronously on the consumer thread with the
/// freshest event of each coalescing cycle — and, after teardown, inline
/// on whatever thread the ingestion callback runs on (the fallback path),
/// hence `Send + Sync`.
///
/// Implementations should keep `forward` short: the pipeline does not
/// interrupt an in-progress call during shutdown. A returned error is
/// contained per iteration (logged, loop continues), never fatal.
pub trait EventSink: Send + Sync {
    fn forward(&self, event: AttributeEvent) -> Result<()>;
}

/// Closure adapter, mostly for tests and simple embedders.
impl<F> EventSink for F
where
    F: Fn(AttributeEvent) -> Result<()> + Send + Sync,
{
    fn forward(&self, event: AttributeEvent) -> Result<()> {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_closure_is_a_sink() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let sink = move |_event: AttributeEvent| {
            count_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };

        sink.forward(AttributeEvent::scalar("a", 1.0)).unwrap();
        sink.forward(AttributeEvent::scalar("a", 2.0)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
