//! Curve model reconciliation.
//!
//! The plot widget is handed a list of curve model names whenever its
//! models change. Each model name is either a single attribute (used for
//! the Y values) or two attribute names separated by `'|'` (left-hand side
//! feeds X, right-hand side feeds Y). The registry diffs that list against
//! the pipelines it already owns: new models get a freshly spawned
//! coalescing pipeline, vanished models get theirs stopped and removed,
//! survivors are left untouched.

use crate::coalesce::{EventSink, StreamHandle, StreamPipeline};
use crate::config::StreamConfig;
use crate::error::{Result, StreamError};
use std::collections::HashMap;
use std::sync::Arc;

/// A parsed curve model.
///
/// Model names are case-insensitive; they are normalized to lowercase on
/// parse, matching how the device layer reports attribute names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveModel {
    /// Attribute feeding the Y values; also the registry key.
    pub y: String,
    /// Optional attribute feeding the X values.
    pub x: Option<String>,
}

impl CurveModel {
    /// Parse `"y"` or `"x|y"` into a model.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim().to_lowercase();
        let mut parts = raw.rsplitn(2, '|');
        let y = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StreamError::Model(format!("empty model name: {raw:?}")))?
            .to_string();
        let x = match parts.next() {
            Some("") => return Err(StreamError::Model(format!("empty x attribute: {raw:?}"))),
            Some(x) => Some(x.to_string()),
            None => None,
        };
        Ok(Self { y, x })
    }

    /// Registry key for this model.
    pub fn key(&self) -> &str {
        &self.y
    }
}

struct CurveEntry {
    model: CurveModel,
    pipeline: StreamPipeline,
}

/// Builds the [`EventSink`] for a newly added curve model. The concrete
/// sink (the plot curve) lives outside this crate.
pub type SinkFactory = dyn Fn(&CurveModel) -> Arc<dyn EventSink> + Send;

/// Owns one coalescing pipeline per displayed curve model.
pub struct StreamRegistry {
    curves: HashMap<String, CurveEntry>,
    sink_factory: Box<SinkFactory>,
}

impl StreamRegistry {
    pub fn new<F>(sink_factory: F) -> Self
    where
        F: Fn(&CurveModel) -> Arc<dyn EventSink> + Send + 'static,
    {
        Self {
            curves: HashMap::new(),
            sink_factory: Box::new(sink_factory),
        }
    }

    /// Reconcile the owned pipelines against a new list of model names.
    ///
    /// Spawns a pipeline for each model not yet present, stops and removes
    /// pipelines whose model disappeared, and leaves the rest running. The
    /// whole list is parsed up front: on a malformed name nothing changes.
    pub fn update_models(&mut self, names: &[&str]) -> Result<()> {
        let models = names
            .iter()
            .map(|n| CurveModel::parse(n))
            .collect::<Result<Vec<_>>>()?;

        let keep: Vec<&str> = models.iter().map(|m| m.key()).collect();
        let stale: Vec<String> = self
            .curves
            .keys()
            .filter(|k| !keep.contains(&k.as_str()))
            .cloned()
            .collect();

        for key in stale {
            if let Some(mut entry) = self.curves.remove(&key) {
                tracing::info!(curve = %key, "removing streaming curve");
                entry.pipeline.stop();
            }
        }

        for model in models {
            if self.curves.contains_key(model.key()) {
                continue;
            }
            tracing::info!(curve = %model.key(), "building streaming curve for model");
            let sink = (self.sink_factory)(&model);
            let pipeline = StreamPipeline::spawn(StreamConfig::new(model.key()), sink)?;
            self.curves
                .insert(model.key().to_string(), CurveEntry { model, pipeline });
        }

        Ok(())
    }

    /// Ingestion handle for a curve, to hand to the subscription layer.
    pub fn handle(&self, model: &str) -> Option<StreamHandle> {
        self.curves
            .get(&model.to_lowercase())
            .map(|entry| entry.pipeline.handle())
    }

    /// The parsed model behind a curve name.
    pub fn model(&self, name: &str) -> Option<&CurveModel> {
        self.curves.get(&name.to_lowercase()).map(|e| &e.model)
    }

    /// Names of all live curves (unordered).
    pub fn names(&self) -> Vec<&str> {
        self.curves.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Stop and remove every pipeline.
    pub fn shutdown(&mut self) {
        for (name, mut entry) in self.curves.drain() {
            tracing::info!(curve = %name, "stopping streaming curve");
            entry.pipeline.stop();
        }
    }
}

impl Drop for StreamRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
