use crate::{
    event::{
        complete_events::CompleteEventsUseCase, reindex_events::ReindexEventsUseCase,
        send_reminders::SendRemindersUseCase,
    },
    shared::usecase::execute,
};
use eventhub_infra::EventHubContext;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// A job that runs on a fixed period until it is cancelled.
///
/// Every tick runs to completion before the timer is polled again, so ticks
/// never overlap. Fires missed while a tick overran its period are skipped.
/// Cancelling lets an in-flight tick finish before the loop exits.
pub struct PeriodicJob {
    name: &'static str,
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PeriodicJob {
    pub fn start<F, Fut>(
        name: &'static str,
        period: Duration,
        first_tick_at: Instant,
        cancel_token: CancellationToken,
        ctx: EventHubContext,
        job: F,
    ) -> Self
    where
        F: Fn(EventHubContext) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let token = cancel_token.clone();
        let handle = actix_web::rt::spawn(async move {
            info!("Starting job {} running every {:?}", name, period);
            let mut interval = interval_at(first_tick_at, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }
                job(ctx.clone()).await;
            }
            info!("Stopped job {}", name);
        });

        Self {
            name,
            cancel_token,
            handle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Asks the job to stop after the current tick, if any
    pub fn stop(&self) {
        self.cancel_token.cancel();
    }

    /// Waits until the job loop has exited
    pub async fn stopped(self) {
        if let Err(e) = self.handle.await {
            error!("Job {} did not stop cleanly: {:?}", self.name, e);
        }
    }
}

pub fn start_send_reminders_job(
    ctx: EventHubContext,
    cancel_token: CancellationToken,
) -> PeriodicJob {
    let delay = if ctx.config.align_jobs_to_minute {
        let now = ctx.sys.get_timestamp_millis();
        Duration::from_secs(get_start_delay(now as usize, 0) as u64)
    } else {
        Duration::ZERO
    };

    PeriodicJob::start(
        "send_reminders",
        ctx.config.reminder_job_interval,
        Instant::now() + delay,
        cancel_token,
        ctx,
        |ctx| async move {
            // Failures are logged by the usecase, the next tick retries
            let _ = execute(SendRemindersUseCase, &ctx).await;
        },
    )
}

pub fn start_complete_events_job(
    ctx: EventHubContext,
    cancel_token: CancellationToken,
) -> PeriodicJob {
    PeriodicJob::start(
        "complete_events",
        ctx.config.status_job_interval,
        Instant::now(),
        cancel_token,
        ctx,
        |ctx| async move {
            let _ = execute(CompleteEventsUseCase, &ctx).await;
        },
    )
}

/// Pushes every event to the search index once per period, repairing
/// mirror writes that were dropped or failed
pub fn start_reindex_events_job(
    ctx: EventHubContext,
    cancel_token: CancellationToken,
) -> PeriodicJob {
    let period = ctx.config.reindex_job_interval;
    PeriodicJob::start(
        "reindex_events",
        period,
        Instant::now() + period,
        cancel_token,
        ctx,
        |ctx| async move {
            let _ = execute(ReindexEventsUseCase, &ctx).await;
        },
    )
}
