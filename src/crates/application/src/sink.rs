use async_trait::async_trait;
use domain::report::{AlbumList, BestSellingTrack, CountryInvoiceCount, CountryItemCount};
use domain::request::ReportYear;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Encode error: {0}")]
    Encode(String),
    #[error("Database error: {0}")]
    DbError(String),
}

/// 文件输出（csv / json / xml），彼此之间不具备事务性
#[async_trait]
pub trait ReportOutputs: Send + Sync {
    async fn write_invoice_count(&self, value: &CountryInvoiceCount) -> Result<(), SinkError>;
    async fn write_item_count(&self, value: &CountryItemCount) -> Result<(), SinkError>;
    async fn write_album_list(&self, value: &AlbumList) -> Result<(), SinkError>;
    /// `since` is the request's year floor and is part of the output location.
    async fn write_best_selling(
        &self,
        value: &BestSellingTrack,
        since: ReportYear,
    ) -> Result<(), SinkError>;
}

/// 汇总库，跨请求复用同一个连接
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// All rows go in one transaction. When `best_selling` is `None` the
    /// best-selling table is not touched.
    async fn upsert_summary(
        &self,
        invoice_count: &CountryInvoiceCount,
        item_count: &CountryItemCount,
        best_selling: Option<&BestSellingTrack>,
    ) -> Result<(), SinkError>;
}
