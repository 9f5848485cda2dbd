//! Personalization worker running store operations off the event path.
//!
//! # Architecture
//!
//! - `messages`: request/response protocol with request generations
//! - `handler`: worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::PersonalizationWorker;
pub use messages::{WorkerMessage, WorkerResponse};
