//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use mfp_stream::{AttributeEvent, EventSink, Result};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Sink that records every forwarded event for later assertions.
pub struct RecordingSink {
    events: Mutex<Vec<AttributeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn scalars(&self) -> Vec<f64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| e.value.as_scalar())
            .collect()
    }

    pub fn last_scalar(&self) -> Option<f64> {
        self.events
            .lock()
            .unwrap()
            .last()
            .and_then(|e| e.value.as_scalar())
    }

    pub fn snapshot(&self) -> Vec<AttributeEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn forward(&self, event: AttributeEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Poll `condition` until it holds or `deadline` elapses.
pub fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}

/// Generous timeout for cross-thread assertions.
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}
