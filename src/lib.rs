//! # mfp-stream: event-coalescing streaming layer
//!
//! Streaming core of a measured filling pattern beam-diagnostics monitor.
//! The GUI shell binds device attributes to plot widgets; each streaming
//! curve owns one of these pipelines so a fast data source can never pile
//! events up faster than the rendering thread drains them.
//!
//! ## Architecture
//!
//! - **Coalescing**: a last-write-wins [`Mailbox`](coalesce::Mailbox) plus a
//!   dedicated consumer thread per curve — only the freshest event reaches
//!   the render sink, superseded ones are counted and dropped
//! - **Ingestion**: a cloneable [`StreamHandle`](coalesce::StreamHandle)
//!   the device-subscription layer calls from its notification threads
//! - **Rendering**: behind the [`EventSink`](coalesce::EventSink) trait;
//!   plotting itself lives outside this crate
//! - **Reconciliation**: [`StreamRegistry`](registry::StreamRegistry) keeps
//!   one pipeline per displayed curve model as the model list changes
//!
//! ## Example
//!
//! ```
//! use mfp_stream::{AttributeEvent, Result, StreamConfig, StreamPipeline};
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let sink = Arc::new(|_event: AttributeEvent| -> Result<()> {
//!         // push the curve data to the plot widget here
//!         Ok(())
//!     });
//!
//!     let mut pipeline = StreamPipeline::spawn(StreamConfig::new("bunchintensity"), sink)?;
//!
//!     // the device layer holds the handle and calls it per notification
//!     let handle = pipeline.handle();
//!     handle.push_event(AttributeEvent::spectrum("bunchintensity", vec![0.2, 0.8]));
//!
//!     // widget destruction must stop the pipeline explicitly
//!     pipeline.stop();
//!     Ok(())
//! }
//! ```

pub mod coalesce;
pub mod config;
pub mod error;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use coalesce::{Drained, EventSink, Mailbox, StreamHandle, StreamPipeline};
pub use config::{DeviceClass, MonitorConfig, PlotConfig, StreamConfig};
pub use error::{Result, StreamError};
pub use registry::{CurveModel, StreamRegistry};
pub use types::{AttrValue, AttributeEvent, EventKind};
