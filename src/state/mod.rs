//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet`: the run-wide set of URLs already claimed by a crawl task
//! - `TaskState`: the lifecycle of a single (URL, depth) crawl task

mod task_state;
mod visited;

// Re-export main types
pub use task_state::TaskState;
pub use visited::VisitedSet;
