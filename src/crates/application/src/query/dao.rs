use crate::query::QueryError;
use async_trait::async_trait;
use domain::report::BestSellingTrack;
use domain::request::ReportYear;
use std::path::Path;

/// 源销售库上的只读查询，每个处理周期打开一次
#[async_trait]
pub trait SalesDao: Send + Sync {
    /// 是否至少有一张该国家的发票
    async fn country_has_invoices(&self, country: &str) -> Result<bool, QueryError>;
    /// 是否至少有一张发票日期不早于该年 1 月 1 日
    async fn year_has_records(&self, year: ReportYear) -> Result<bool, QueryError>;
    async fn count_invoices(&self, country: &str) -> Result<u64, QueryError>;
    /// 经发票关联到该国家的发票明细行数
    async fn count_items(&self, country: &str) -> Result<u64, QueryError>;
    /// 该国家购买过的专辑名（去重，按名称排序）
    async fn list_albums(&self, country: &str) -> Result<Vec<String>, QueryError>;
    /// `None` means no track of the configured genre was sold there since `year`.
    async fn best_selling_track(
        &self,
        country: &str,
        year: ReportYear,
    ) -> Result<Option<BestSellingTrack>, QueryError>;
    /// Releases the underlying connection. Called once at the end of a cycle.
    async fn close(&self) -> Result<(), QueryError>;
}

/// Opens a [`SalesDao`] over the database file named by a request.
#[async_trait]
pub trait SalesSource: Send + Sync {
    type Dao: SalesDao;

    async fn open(&self, path: &Path) -> Result<Self::Dao, QueryError>;
}
