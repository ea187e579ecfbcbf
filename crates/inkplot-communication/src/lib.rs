//! # InkPlot Communication
//!
//! Moving data in and out of InkPlot: HTTP submission of finished programs
//! and the broadcast relay that delivers captured strokes.

pub mod relay;
pub mod submission;

pub use relay::{
    RelayConsumer, RelayHub, RelayMessage, RelayStats, RelaySubscription, DEFAULT_RELAY_CAPACITY,
};
pub use submission::{Endpoint, HttpSubmitter, ProgramSubmitter, SubmissionReceipt};
