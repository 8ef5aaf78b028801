use crate::error::AppError;
use crate::message::decode_request;
use crate::query::dao::{SalesDao, SalesSource};
use crate::query::QueryError;
use crate::sink::{ReportOutputs, SummaryStore};
use domain::report::{AlbumList, CountryInvoiceCount, CountryItemCount, SalesReport};
use domain::request::{RawReportRequest, ReportRequest, ReportYear, RequestError};
use log::{debug, error, info, warn};
use std::fmt::{self, Display};

/// 单个请求处理周期的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Received,
    Validated,
    Gated,
    Read,
    Written,
    Done,
    Rejected,
    Skipped,
}

impl CycleState {
    pub fn can_advance_to(self, next: CycleState) -> bool {
        use CycleState::*;
        matches!(
            (self, next),
            (Received, Validated)
                | (Received, Rejected)
                | (Validated, Gated)
                | (Gated, Read)
                | (Gated, Skipped)
                | (Read, Written)
                | (Written, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CycleState::Done | CycleState::Rejected | CycleState::Skipped
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnknownCountry(String),
    NoDataForYear(ReportYear),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownCountry(country) => write!(f, "no invoices for country {}", country),
            SkipReason::NoDataForYear(year) => write!(f, "no invoices since year {}", year),
        }
    }
}

/// 一个周期的结果。只有真正的故障才是 `Err(AppError)`
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Rejected(RequestError),
    Skipped(SkipReason),
    Done(SalesReport),
}

impl CycleOutcome {
    pub fn state(&self) -> CycleState {
        match self {
            CycleOutcome::Rejected(_) => CycleState::Rejected,
            CycleOutcome::Skipped(_) => CycleState::Skipped,
            CycleOutcome::Done(_) => CycleState::Done,
        }
    }
}

struct Cycle {
    state: CycleState,
}

impl Cycle {
    fn new() -> Self {
        Self {
            state: CycleState::Received,
        }
    }

    fn advance(&mut self, next: CycleState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal cycle transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!("cycle {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn reject(&mut self, reason: RequestError) -> CycleOutcome {
        warn!("Invalid message, skipping: {}", reason);
        self.advance(CycleState::Rejected);
        CycleOutcome::Rejected(reason)
    }
}

/// 报表编排：校验 -> 存在性检查 -> 读取聚合 -> 写出
///
/// Holds the summary store for the life of the process; the source database
/// is opened per request and closed before `process` returns.
pub struct ReportService<S, O, M> {
    source: S,
    outputs: O,
    summary: M,
}

impl<S, O, M> ReportService<S, O, M>
where
    S: SalesSource,
    O: ReportOutputs,
    M: SummaryStore,
{
    pub fn new(source: S, outputs: O, summary: M) -> Self {
        Self {
            source,
            outputs,
            summary,
        }
    }

    /// Decodes a raw queue payload and runs one cycle for it.
    pub async fn handle_message(&self, payload: &[u8]) -> Result<CycleOutcome, AppError> {
        match decode_request(payload) {
            Ok(raw) => self.process(raw).await,
            Err(e) => Ok(Cycle::new().reject(e)),
        }
    }

    pub async fn process(&self, raw: RawReportRequest) -> Result<CycleOutcome, AppError> {
        let mut cycle = Cycle::new();
        info!("Received report request: {:?}", raw);

        let request = match raw.validate() {
            Ok(request) => request,
            Err(e) => return Ok(cycle.reject(e)),
        };
        let dao = match self.source.open(request.source_path()).await {
            Ok(dao) => dao,
            Err(e) => {
                return Ok(cycle.reject(RequestError::SourceUnreadable(format!(
                    "{}: {}",
                    request.source_path().display(),
                    e
                ))))
            }
        };
        cycle.advance(CycleState::Validated);

        let result = self.run(&mut cycle, &request, &dao).await;

        if let Err(e) = dao.close().await {
            warn!(
                "Failed to close source database {}: {}",
                request.source_path().display(),
                e
            );
        }
        if let Err(e) = &result {
            error!(
                "Report for {} ({}) aborted in state {:?}: {}",
                request.country, request.year, cycle.state, e
            );
        }
        result
    }

    async fn run(
        &self,
        cycle: &mut Cycle,
        request: &ReportRequest,
        dao: &S::Dao,
    ) -> Result<CycleOutcome, AppError> {
        cycle.advance(CycleState::Gated);
        if let Some(reason) = self.gate(request, dao).await? {
            warn!("Nothing to report for {}: {}", request.country, reason);
            cycle.advance(CycleState::Skipped);
            return Ok(CycleOutcome::Skipped(reason));
        }

        let report = self.read(request, dao).await?;
        cycle.advance(CycleState::Read);

        self.write(request, &report).await?;
        cycle.advance(CycleState::Written);

        info!(
            "Report for {} since {} written: {} invoices, {} items, {} albums",
            request.country,
            request.year,
            report.invoice_count.count,
            report.item_count.count,
            report.albums.titles.len()
        );
        cycle.advance(CycleState::Done);
        Ok(CycleOutcome::Done(report))
    }

    async fn gate(
        &self,
        request: &ReportRequest,
        dao: &S::Dao,
    ) -> Result<Option<SkipReason>, QueryError> {
        if !dao.country_has_invoices(&request.country).await? {
            return Ok(Some(SkipReason::UnknownCountry(request.country.clone())));
        }
        if !dao.year_has_records(request.year).await? {
            return Ok(Some(SkipReason::NoDataForYear(request.year)));
        }
        Ok(None)
    }

    async fn read(&self, request: &ReportRequest, dao: &S::Dao) -> Result<SalesReport, QueryError> {
        let country = &request.country;
        let invoice_count = CountryInvoiceCount {
            country: country.clone(),
            count: dao.count_invoices(country).await?,
        };
        let item_count = CountryItemCount {
            country: country.clone(),
            count: dao.count_items(country).await?,
        };
        let albums = AlbumList::new(country.clone(), dao.list_albums(country).await?);
        let best_selling = dao.best_selling_track(country, request.year).await?;

        Ok(SalesReport {
            invoice_count,
            item_count,
            albums,
            best_selling,
        })
    }

    // 文件先写，汇总库最后提交；中途失败时汇总库保持原样
    async fn write(&self, request: &ReportRequest, report: &SalesReport) -> Result<(), AppError> {
        self.outputs
            .write_invoice_count(&report.invoice_count)
            .await?;
        self.outputs.write_item_count(&report.item_count).await?;
        self.outputs.write_album_list(&report.albums).await?;

        match &report.best_selling {
            Some(track) => self.outputs.write_best_selling(track, request.year).await?,
            None => info!(
                "No records found for best selling in {} since {}",
                request.country, request.year
            ),
        }

        self.summary
            .upsert_summary(
                &report.invoice_count,
                &report.item_count,
                report.best_selling.as_ref(),
            )
            .await?;
        Ok(())
    }
}
