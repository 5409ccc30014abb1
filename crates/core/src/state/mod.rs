pub mod execution;
pub mod picker;
pub mod selection;
pub mod staging;

pub use execution::{ExecutionPhase, ExecutionState};
pub use picker::{read_artifact, FilePicker};
pub use selection::Selection;
pub use staging::{Artifact, StagingStore};
