//! # qms-sync
//!
//! Keeps locally edited audit answers in step with the remote store.
//!
//! - [`ResponseBaseline`]: last server-confirmed responses
//! - [`ResponseOverlay`]: baseline merged with local edits, local wins
//! - [`AutoSaveController`]: pending map, debounce timer and save state machine
//! - [`AssessmentSession`]: loads tree and baseline, wires overlay to controller
//!
//! The remote side is abstracted by [`ResponsesApi`]. Timers run as Tokio
//! tasks, so controllers must be driven from inside a Tokio runtime.

pub mod api;
pub mod autosave;
pub mod baseline;
pub mod error;
pub mod memory;
pub mod overlay;
pub mod session;

pub use api::ResponsesApi;
pub use autosave::{AutoSaveController, FlushOutcome, SaveState};
pub use baseline::ResponseBaseline;
pub use error::{ApiError, LoadError, SaveFailure};
pub use memory::InMemoryResponsesApi;
pub use overlay::ResponseOverlay;
pub use session::AssessmentSession;
