use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInvoiceCount {
    pub country: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryItemCount {
    pub country: String,
    pub count: u64,
}

/// 某个国家当前购买过的全部专辑，写出时整体覆盖
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumList {
    pub country: String,
    pub titles: Vec<String>,
}

impl AlbumList {
    /// Keeps the first occurrence of each title, preserving order.
    pub fn new(country: impl Into<String>, titles: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let titles = titles
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect();
        Self {
            country: country.into(),
            titles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// 指定流派在某国自某年起销量最高的曲目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestSellingTrack {
    pub name: String,
    pub country: String,
    pub amount: u64,
    /// Four-digit year of the track's earliest qualifying sale.
    pub year: String,
}

/// Everything read from the source database for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesReport {
    pub invoice_count: CountryInvoiceCount,
    pub item_count: CountryItemCount,
    pub albums: AlbumList,
    pub best_selling: Option<BestSellingTrack>,
}
