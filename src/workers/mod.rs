//! # Pool de Workers
//! src/workers/mod.rs
//!
//! Un hilo aceptador produce conexiones en una [`BoundedQueue`] y un
//! [`WorkerPool`] de tamaño fijo las consume:
//!
//! ```text
//! accept loop ──enqueue──▶ BoundedQueue ──dequeue──▶ worker-0 .. worker-N
//! ```

pub mod pool;
pub mod queue;
pub mod worker;

pub use pool::{PoolError, WorkerPool};
pub use queue::{BoundedQueue, QueueError};
pub use worker::{Handler, Worker, WorkerSnapshot, IDLE_LABEL};
