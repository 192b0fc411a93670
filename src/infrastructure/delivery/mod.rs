pub mod worker_channel;

pub use worker_channel::{WorkerChannel, WorkerEndpoint};
