use thiserror::Error;

pub mod dao;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Source unreadable: {0}")]
    SourceUnreadable(String),
    #[error("Database error: {0}")]
    DbError(String),
}
