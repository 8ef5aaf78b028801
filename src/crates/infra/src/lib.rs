pub mod config;
pub use config::{AppConfig, OutputLayout};

pub mod output;
pub use output::FileReportOutputs;

pub mod queue;
pub use queue::JsonLinesQueue;

pub mod repository;
pub use repository::sqlite::command::summary::SummaryRepositoryImpl;
pub use repository::sqlite::query::sales::SqliteSalesSource;
