//! Event-coalescing producer/consumer pipeline.
//!
//! Update events arrive at an unbounded rate from device-notification
//! threads. Rendering the plot cannot keep up, so instead of queueing every
//! event the pipeline keeps a last-write-wins [`Mailbox`] and a dedicated
//! consumer thread that only ever processes the freshest entry, counting
//! and discarding the superseded ones.
//!
//! # Architecture
//!
//! ```text
//! [device callback] ──push──► [Mailbox] ──drain newest──► [consumer thread] ──► [EventSink]
//!        │                                                      ▲
//!        └───────────── wake token (capacity 1) ────────────────┘
//! ```
//!
//! # Design
//!
//! - **LIFO, not FIFO** — under sustained overload the display should show
//!   the freshest state, not catch up chronologically through stale values.
//! - **Level-triggered wake** — a capacity-1 token channel; multiple sets
//!   before a clear collapse to one wake.
//! - **Cooperative shutdown** — stop flag plus a wake token, then join.
//! - **Fallback delivery** — ingestion after teardown forwards inline
//!   through the sink instead of dropping the event.

pub mod mailbox;
pub mod pipeline;
pub mod sink;

pub use mailbox::{Drained, Mailbox};
pub use pipeline::{StreamHandle, StreamPipeline};
pub use sink::EventSink;
