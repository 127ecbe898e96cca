//! Deferred and animated viewport mutations.

pub mod job;
pub mod pool;
pub mod queue;

pub use job::{ViewportJob, ViewportJobKind};
pub use pool::{JobHandle, JobPool, JobPoolConfig};
pub use queue::ViewportJobQueue;
