use crate::error::AppError;
use crate::query::dao::SalesSource;
use crate::report::{CycleOutcome, ReportService};
use crate::sink::{ReportOutputs, SummaryStore};
use async_trait::async_trait;
use log::{error, info};
use std::fmt::{self, Display};

/// 从队列取出的一条消息
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub tag: u64,
    pub payload: Vec<u8>,
}

/// Pull-style queue: the consumer asks for the next message and acknowledges
/// it only after the cycle for it has finished.
#[async_trait]
pub trait RequestQueue: Send {
    /// `Ok(None)` when the queue is closed.
    async fn receive(&mut self) -> Result<Option<Delivery>, AppError>;
    async fn ack(&mut self, tag: u64) -> Result<(), AppError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerStats {
    pub done: u64,
    pub rejected: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl ConsumerStats {
    fn record(&mut self, result: &Result<CycleOutcome, AppError>) {
        match result {
            Ok(CycleOutcome::Done(_)) => self.done += 1,
            Ok(CycleOutcome::Rejected(_)) => self.rejected += 1,
            Ok(CycleOutcome::Skipped(_)) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }
}

impl Display for ConsumerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} done, {} rejected, {} skipped, {} failed",
            self.done, self.rejected, self.skipped, self.failed
        )
    }
}

/// 逐条处理直到队列关闭。单条失败只记录日志，不重试，继续下一条
pub async fn run_consumer<Q, S, O, M>(
    queue: &mut Q,
    service: &ReportService<S, O, M>,
) -> Result<ConsumerStats, AppError>
where
    Q: RequestQueue,
    S: SalesSource,
    O: ReportOutputs,
    M: SummaryStore,
{
    let mut stats = ConsumerStats::default();
    info!("Listening to queue...");

    while let Some(delivery) = queue.receive().await? {
        let result = service.handle_message(&delivery.payload).await;
        if let Err(e) = &result {
            error!("Message {} failed: {}", delivery.tag, e);
        }
        stats.record(&result);
        queue.ack(delivery.tag).await?;
    }

    info!("Queue closed: {}", stats);
    Ok(stats)
}
