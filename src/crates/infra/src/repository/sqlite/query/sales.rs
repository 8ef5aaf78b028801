use application::query::dao::{SalesDao, SalesSource};
use application::query::QueryError;
use async_trait::async_trait;
use domain::report::BestSellingTrack;
use domain::request::ReportYear;
use log::debug;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::ConnectOptions as _;
use sea_orm::*;
use std::path::Path;

/// 按请求中的路径以只读方式打开源销售库
#[derive(Clone)]
pub struct SqliteSalesSource {
    genre: String,
}

impl SqliteSalesSource {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
        }
    }
}

#[async_trait]
impl SalesSource for SqliteSalesSource {
    type Dao = SalesDaoImpl;

    async fn open(&self, path: &Path) -> Result<SalesDaoImpl, QueryError> {
        // 直接传文件名，不拼 URL：路径里的 `?`、`%`、`#` 原样保留
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .disable_statement_logging();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| QueryError::SourceUnreadable(e.to_string()))?;
        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

        // 读一次 schema，非 SQLite 文件在这里就会失败
        db.execute(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT COUNT(*) FROM sqlite_master".to_owned(),
        ))
        .await
        .map_err(|e| QueryError::SourceUnreadable(e.to_string()))?;

        debug!("Opened source database {}", path.display());
        Ok(SalesDaoImpl::new(db, self.genre.clone()))
    }
}

pub struct SalesDaoImpl {
    db: DatabaseConnection,
    genre: String,
}

impl SalesDaoImpl {
    pub fn new(db: DatabaseConnection, genre: String) -> Self {
        Self { db, genre }
    }

    async fn exists(&self, sql: &str, values: Vec<Value>) -> Result<bool, QueryError> {
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(DbBackend::Sqlite, sql, values))
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(row.is_some())
    }

    async fn count(&self, sql: &str, country: &str) -> Result<u64, QueryError> {
        let row: Option<CountRow> = CountRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            sql,
            vec![country.into()],
        ))
        .one(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;

        Ok(row.map(|r| u64::try_from(r.total).unwrap_or(0)).unwrap_or(0))
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct CountRow {
    pub total: i64,
}

#[derive(Debug, Clone, FromQueryResult)]
struct AlbumRow {
    pub title: String,
}

#[derive(Debug, Clone, FromQueryResult)]
struct BestSellingRow {
    pub name: String,
    pub country: String,
    pub amount: i64,
    pub year: Option<String>,
}

impl From<BestSellingRow> for BestSellingTrack {
    fn from(row: BestSellingRow) -> Self {
        BestSellingTrack {
            name: row.name,
            country: row.country,
            amount: u64::try_from(row.amount).unwrap_or(0),
            year: row.year.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl SalesDao for SalesDaoImpl {
    async fn country_has_invoices(&self, country: &str) -> Result<bool, QueryError> {
        self.exists(
            "SELECT 1 FROM invoices WHERE BillingCountry = ? LIMIT 1",
            vec![country.into()],
        )
        .await
    }

    async fn year_has_records(&self, year: ReportYear) -> Result<bool, QueryError> {
        self.exists(
            "SELECT 1 FROM invoices WHERE InvoiceDate >= ? LIMIT 1",
            vec![year.first_day().into()],
        )
        .await
    }

    async fn count_invoices(&self, country: &str) -> Result<u64, QueryError> {
        self.count(
            "SELECT COUNT(*) AS total FROM invoices WHERE BillingCountry = ?",
            country,
        )
        .await
    }

    async fn count_items(&self, country: &str) -> Result<u64, QueryError> {
        self.count(
            r#"
            SELECT COUNT(*) AS total
            FROM invoice_items
                JOIN invoices ON invoice_items.InvoiceId = invoices.InvoiceId
            WHERE invoices.BillingCountry = ?
            "#,
            country,
        )
        .await
    }

    async fn list_albums(&self, country: &str) -> Result<Vec<String>, QueryError> {
        let rows: Vec<AlbumRow> = AlbumRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            r#"
            SELECT albums.Title AS title
            FROM invoices
                JOIN invoice_items ON invoice_items.InvoiceId = invoices.InvoiceId
                JOIN tracks ON tracks.TrackId = invoice_items.TrackId
                JOIN albums ON albums.AlbumId = tracks.AlbumId
            WHERE invoices.BillingCountry = ?
            GROUP BY albums.Title
            ORDER BY albums.Title
            "#,
            vec![country.into()],
        ))
        .all(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.title).collect())
    }

    async fn best_selling_track(
        &self,
        country: &str,
        year: ReportYear,
    ) -> Result<Option<BestSellingTrack>, QueryError> {
        // 同销量时按曲名、TrackId 排序，结果确定
        let row: Option<BestSellingRow> =
            BestSellingRow::find_by_statement(Statement::from_sql_and_values(
                DbBackend::Sqlite,
                r#"
                SELECT
                    tracks.Name AS name,
                    invoices.BillingCountry AS country,
                    COUNT(invoice_items.TrackId) AS amount,
                    MIN(strftime('%Y', invoices.InvoiceDate)) AS year
                FROM invoice_items
                    JOIN invoices ON invoice_items.InvoiceId = invoices.InvoiceId
                    JOIN tracks ON tracks.TrackId = invoice_items.TrackId
                    JOIN genres ON genres.GenreId = tracks.GenreId
                WHERE
                    invoices.BillingCountry = ?
                    AND invoices.InvoiceDate >= ?
                    AND genres.Name = ?
                GROUP BY invoice_items.TrackId
                ORDER BY amount DESC, tracks.Name ASC, invoice_items.TrackId ASC
                LIMIT 1
                "#,
                vec![
                    country.into(),
                    year.first_day().into(),
                    self.genre.as_str().into(),
                ],
            ))
            .one(&self.db)
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))?;

        Ok(row.map(BestSellingTrack::from))
    }

    async fn close(&self) -> Result<(), QueryError> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))
    }
}
