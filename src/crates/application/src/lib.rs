pub mod consumer;
pub mod error;
pub mod message;
pub mod query;
pub mod report;
pub mod sink;
