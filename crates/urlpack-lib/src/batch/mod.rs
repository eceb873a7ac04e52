mod orchestrator;
mod progress;
mod state;
mod types;

pub use orchestrator::BatchOrchestrator;
pub use progress::{ProgressTracker, progress_percent};
pub use state::BatchState;
pub use types::{BatchResult, FailureRecord, ProcessedFile};
