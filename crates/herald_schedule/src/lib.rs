//! Scheduling and auto-posting for Herald.
//!
//! [`ScheduleEvaluator`] decides whether a content item's weekly slot
//! (`"Monday 9AM"`) is due for review or for publication, and
//! [`PostingOrchestrator`] publishes approved items through the platform
//! adapters, moving each through its lifecycle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod best_time;
mod clock;
mod dispatch;
mod evaluator;
mod orchestrator;

pub use best_time::BestTime;
pub use clock::{Clock, FixedClock, SystemClock};
pub use dispatch::{PublishAction, dispatch, publish_action};
pub use evaluator::{Due, ScheduleEvaluator, classify, is_auto_post_due, is_due};
pub use orchestrator::{
    FailedItem, OrchestratorSettings, OrchestratorSettingsBuilder, PostedItem, PostingOrchestrator,
    ReviewEntry, SweepReport, split_hashtags,
};
