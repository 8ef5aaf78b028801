use crate::query::QueryError;
use crate::sink::SinkError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Query error: {0}")]
    QueryError(#[from] QueryError),
    #[error("Sink write error: {0}")]
    SinkWriteError(#[from] SinkError),
    #[error("Queue error: {0}")]
    QueueError(String),
}
