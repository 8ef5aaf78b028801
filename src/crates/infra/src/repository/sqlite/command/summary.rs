use super::db_data::{best_selling, num_invoices, num_items};
use application::sink::{SinkError, SummaryStore};
use async_trait::async_trait;
use domain::report::{BestSellingTrack, CountryInvoiceCount, CountryItemCount};
use log::info;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

fn db_err(e: DbErr) -> SinkError {
    SinkError::DbError(e.to_string())
}

/// 汇总库：num_invoices / num_items / best_selling 三张表
#[derive(Clone)]
pub struct SummaryRepositoryImpl {
    db: DatabaseConnection,
}

impl SummaryRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects and creates the three tables when missing.
    pub async fn connect(db_url: &str) -> Result<Self, SinkError> {
        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(1).sqlx_logging(false);

        let db = Database::connect(opt).await.map_err(db_err)?;
        let repo = Self::new(db);
        repo.ensure_tables().await?;

        info!("Summary database ready at {}", db_url);
        Ok(repo)
    }

    pub async fn ensure_tables(&self) -> Result<(), SinkError> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        let statements = [
            schema.create_table_from_entity(num_invoices::Entity),
            schema.create_table_from_entity(num_items::Entity),
            schema.create_table_from_entity(best_selling::Entity),
        ];

        for mut stmt in statements {
            stmt.if_not_exists();
            self.db.execute(backend.build(&stmt)).await.map_err(db_err)?;
        }
        Ok(())
    }

    pub async fn invoice_counts(&self) -> Result<Vec<CountryInvoiceCount>, SinkError> {
        let rows = num_invoices::Entity::find()
            .order_by_asc(num_invoices::Column::CountryName)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(CountryInvoiceCount::from).collect())
    }

    pub async fn item_counts(&self) -> Result<Vec<CountryItemCount>, SinkError> {
        let rows = num_items::Entity::find()
            .order_by_asc(num_items::Column::CountryName)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(CountryItemCount::from).collect())
    }

    pub async fn best_selling_for(
        &self,
        country: &str,
    ) -> Result<Vec<BestSellingTrack>, SinkError> {
        let rows = best_selling::Entity::find()
            .filter(best_selling::Column::CountryName.eq(country))
            .order_by_asc(best_selling::Column::Year)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(BestSellingTrack::from).collect())
    }
}

#[async_trait]
impl SummaryStore for SummaryRepositoryImpl {
    async fn upsert_summary(
        &self,
        invoice_count: &CountryInvoiceCount,
        item_count: &CountryItemCount,
        best_selling: Option<&BestSellingTrack>,
    ) -> Result<(), SinkError> {
        // 任何一步失败，txn 被 drop 时回滚
        let txn = self.db.begin().await.map_err(db_err)?;

        num_invoices::Entity::insert(num_invoices::ActiveModel::from(invoice_count))
            .on_conflict(
                OnConflict::column(num_invoices::Column::CountryName)
                    .update_column(num_invoices::Column::InvSaleAmount)
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;

        num_items::Entity::insert(num_items::ActiveModel::from(item_count))
            .on_conflict(
                OnConflict::column(num_items::Column::CountryName)
                    .update_column(num_items::Column::ItemSaleAmount)
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;

        if let Some(track) = best_selling {
            best_selling::Entity::insert(best_selling::ActiveModel::from(track))
                .on_conflict(
                    OnConflict::columns([
                        best_selling::Column::CountryName,
                        best_selling::Column::Year,
                    ])
                    .update_columns([
                        best_selling::Column::TrackName,
                        best_selling::Column::SaleAmount,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn repo(temp_dir: &TempDir) -> SummaryRepositoryImpl {
        let url = format!(
            "sqlite://{}?mode=rwc",
            temp_dir.path().join("summary.db").display()
        );
        SummaryRepositoryImpl::connect(&url).await.unwrap()
    }

    fn counts(country: &str, invoices: u64, items: u64) -> (CountryInvoiceCount, CountryItemCount) {
        (
            CountryInvoiceCount {
                country: country.to_string(),
                count: invoices,
            },
            CountryItemCount {
                country: country.to_string(),
                count: items,
            },
        )
    }

    fn track(name: &str, amount: u64, year: &str) -> BestSellingTrack {
        BestSellingTrack {
            name: name.to_string(),
            country: "Brazil".to_string(),
            amount,
            year: year.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_country() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir).await;

        let (inv, items) = counts("France", 10, 20);
        repo.upsert_summary(&inv, &items, None).await.unwrap();
        let (inv, items) = counts("Brazil", 15, 37);
        repo.upsert_summary(&inv, &items, None).await.unwrap();
        let (inv, items) = counts("France", 15, 21);
        repo.upsert_summary(&inv, &items, None).await.unwrap();

        let invoices = repo.invoice_counts().await.unwrap();
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].country, "Brazil");
        assert_eq!(invoices[1].count, 15);
        let items = repo.item_counts().await.unwrap();
        assert_eq!(items[1].count, 21);
    }

    #[tokio::test]
    async fn test_best_selling_keyed_by_country_and_year() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir).await;
        let (inv, items) = counts("Brazil", 15, 37);

        repo.upsert_summary(&inv, &items, Some(&track("Track X", 4, "2010")))
            .await
            .unwrap();
        repo.upsert_summary(&inv, &items, Some(&track("Track Y", 5, "2010")))
            .await
            .unwrap();
        repo.upsert_summary(&inv, &items, Some(&track("Track X", 2, "2012")))
            .await
            .unwrap();

        let rows = repo.best_selling_for("Brazil").await.unwrap();
        assert_eq!(rows, vec![track("Track Y", 5, "2010"), track("Track X", 2, "2012")]);
    }

    #[tokio::test]
    async fn test_absent_track_leaves_table_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir).await;
        let (inv, items) = counts("Brazil", 15, 37);

        repo.upsert_summary(&inv, &items, Some(&track("Track X", 4, "2010")))
            .await
            .unwrap();
        let (inv, items) = counts("Brazil", 16, 38);
        repo.upsert_summary(&inv, &items, None).await.unwrap();

        assert_eq!(
            repo.best_selling_for("Brazil").await.unwrap(),
            vec![track("Track X", 4, "2010")]
        );
        assert_eq!(repo.invoice_counts().await.unwrap()[0].count, 16);
    }

    #[tokio::test]
    async fn test_failed_cycle_commits_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir).await;
        let (inv, items) = counts("Brazil", 15, 37);
        repo.upsert_summary(&inv, &items, None).await.unwrap();

        // 删掉 best_selling 表，让事务的最后一步失败
        repo.db
            .execute_unprepared("DROP TABLE best_selling")
            .await
            .unwrap();
        let (inv, items) = counts("Brazil", 99, 99);
        let result = repo
            .upsert_summary(&inv, &items, Some(&track("Track X", 4, "2010")))
            .await;

        assert!(matches!(result, Err(SinkError::DbError(_))));
        assert_eq!(repo.invoice_counts().await.unwrap()[0].count, 15);
        assert_eq!(repo.item_counts().await.unwrap()[0].count, 37);
    }

    #[tokio::test]
    async fn test_ensure_tables_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir).await;
        repo.ensure_tables().await.unwrap();
        assert!(repo.invoice_counts().await.unwrap().is_empty());
    }
}
