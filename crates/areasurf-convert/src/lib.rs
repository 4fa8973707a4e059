pub mod automate;
pub mod outcome;
pub mod pipeline;
pub mod summary;

pub use automate::{AutomationHost, automate};
pub use outcome::{ConversionOutcome, Failure, FailureReason, SurfaceResult};
pub use pipeline::{ConversionRun, convert_candidate, run_conversion};
pub use summary::{ObjectResults, ResultLevel, RunStatus, RunSummary};
