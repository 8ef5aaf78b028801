pub mod document;
pub mod markup;
pub mod tabular;

use crate::config::OutputLayout;
use application::sink::{ReportOutputs, SinkError};
use async_trait::async_trait;
use domain::report::{AlbumList, BestSellingTrack, CountryInvoiceCount, CountryItemCount};
use domain::request::ReportYear;
use log::debug;
use tabular::TabularFile;

pub const NUM_INV_CSV_COLUMNS: [&str; 2] = ["Country", "Invoices amount"];
pub const NUM_ITEMS_CSV_COLUMNS: [&str; 2] = ["Country", "Items amount"];

/// 本地文件输出：两张 csv、每国一个 json、每个 (国家, 起始年) 一个 xml
pub struct FileReportOutputs {
    layout: OutputLayout,
    invoices: TabularFile,
    items: TabularFile,
}

impl FileReportOutputs {
    pub fn new(layout: OutputLayout) -> Self {
        let invoices = TabularFile::new(layout.invoice_count_file(), NUM_INV_CSV_COLUMNS);
        let items = TabularFile::new(layout.item_count_file(), NUM_ITEMS_CSV_COLUMNS);
        Self {
            layout,
            invoices,
            items,
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }
}

#[async_trait]
impl ReportOutputs for FileReportOutputs {
    async fn write_invoice_count(&self, value: &CountryInvoiceCount) -> Result<(), SinkError> {
        self.invoices
            .upsert_row(&value.country, &value.count.to_string())?;
        debug!("Wrote {} invoice count to {}", value.country, self.invoices.path().display());
        Ok(())
    }

    async fn write_item_count(&self, value: &CountryItemCount) -> Result<(), SinkError> {
        self.items.upsert_row(&value.country, &value.count.to_string())?;
        debug!("Wrote {} item count to {}", value.country, self.items.path().display());
        Ok(())
    }

    async fn write_album_list(&self, value: &AlbumList) -> Result<(), SinkError> {
        let path = self.layout.album_file(&value.country);
        document::write_document(&path, value)?;
        debug!("Wrote {} albums to {}", value.titles.len(), path.display());
        Ok(())
    }

    async fn write_best_selling(
        &self,
        value: &BestSellingTrack,
        since: ReportYear,
    ) -> Result<(), SinkError> {
        let path = self.layout.best_selling_file(&value.country, since.as_i32());
        markup::write_markup(&path, value)?;
        debug!("Wrote best selling track to {}", path.display());
        Ok(())
    }
}
