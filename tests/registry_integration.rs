//! Registry-level tests: model reconciliation wired to live pipelines.

mod common;

use common::{test_timeout, wait_until, RecordingSink};
use mfp_stream::{AttributeEvent, CurveModel, EventSink, StreamRegistry};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Sink factory that keeps a recording sink per curve model.
struct SinkTable {
    sinks: Mutex<HashMap<String, Arc<RecordingSink>>>,
}

impl SinkTable {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sinks: Mutex::new(HashMap::new()),
        })
    }

    fn make(&self, model: &CurveModel) -> Arc<dyn EventSink> {
        let sink = RecordingSink::new();
        self.sinks
            .lock()
            .unwrap()
            .insert(model.key().to_string(), sink.clone());
        sink
    }

    fn sink(&self, model: &str) -> Arc<RecordingSink> {
        self.sinks.lock().unwrap().get(model).unwrap().clone()
    }
}

#[test]
fn test_events_route_to_their_curve() {
    let table = SinkTable::new();
    let factory_table = table.clone();
    let mut registry = StreamRegistry::new(move |model| factory_table.make(model));

    registry
        .update_models(&["BunchIntensity", "InputSignal"])
        .unwrap();

    let bunch = registry.handle("bunchintensity").unwrap();
    let input = registry.handle("inputsignal").unwrap();

    bunch.push_event(AttributeEvent::spectrum("bunchintensity", vec![1.0, 2.0]));
    input.push_event(AttributeEvent::scalar("inputsignal", 3.0));

    let bunch_sink = table.sink("bunchintensity");
    let input_sink = table.sink("inputsignal");
    assert!(wait_until(test_timeout(), || bunch_sink.count() >= 1
        && input_sink.count() >= 1));

    assert_eq!(input_sink.last_scalar(), Some(3.0));
    assert_eq!(bunch_sink.snapshot()[0].source, "bunchintensity");

    registry.shutdown();
}

#[test]
fn test_removed_curve_handle_degrades_to_inline() {
    let table = SinkTable::new();
    let factory_table = table.clone();
    let mut registry = StreamRegistry::new(move |model| factory_table.make(model));

    registry.update_models(&["InputSignal"]).unwrap();
    let handle = registry.handle("inputsignal").unwrap();

    // Reconciling away the model stops its pipeline...
    registry.update_models(&[]).unwrap();
    assert!(registry.is_empty());

    // ...but a handle the subscription layer still holds keeps delivering,
    // inline, through the old sink.
    let sink = table.sink("inputsignal");
    let before = sink.count();
    handle.push_event(AttributeEvent::scalar("inputsignal", 5.0));
    assert_eq!(sink.count(), before + 1);
    assert_eq!(sink.last_scalar(), Some(5.0));
}

#[test]
fn test_reconcile_keeps_survivor_running() {
    let table = SinkTable::new();
    let factory_table = table.clone();
    let mut registry = StreamRegistry::new(move |model| factory_table.make(model));

    registry
        .update_models(&["BunchIntensity", "InputSignal"])
        .unwrap();
    registry.update_models(&["InputSignal"]).unwrap();
    assert_eq!(registry.len(), 1);

    let handle = registry.handle("inputsignal").unwrap();
    handle.push_event(AttributeEvent::scalar("inputsignal", 8.0));

    let sink = table.sink("inputsignal");
    assert!(wait_until(test_timeout(), || sink.last_scalar() == Some(8.0)));

    registry.shutdown();
}
