use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tracing::info;

use crate::models::TriggerTime;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Work the scheduler fires once per trigger
#[async_trait::async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn execute(&self);
}

/// Fires a job once a day at a fixed local wall-clock time.
///
/// The next trigger is always derived from the wall-clock date at the moment
/// of a check, so a job that overruns its tick never causes a double run.
pub struct Scheduler {
    at: TriggerTime,
    next_run: NaiveDateTime,
}

impl Scheduler {
    pub fn new(at: TriggerTime, now: NaiveDateTime) -> Self {
        Self {
            at,
            next_run: Self::next_occurrence(at, now),
        }
    }

    pub fn at(&self) -> TriggerTime {
        self.at
    }

    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    /// First instant strictly after `after` whose time of day is `at`
    pub fn next_occurrence(at: TriggerTime, after: NaiveDateTime) -> NaiveDateTime {
        let today = after.date().and_time(at.time());
        if today > after {
            today
        } else {
            today + chrono::Duration::days(1)
        }
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }

    /// Runs the job if its trigger has been reached. Returns whether it ran.
    pub async fn run_pending<J>(&mut self, now: NaiveDateTime, job: &J) -> bool
    where
        J: ScheduledJob + ?Sized,
    {
        if !self.is_due(now) {
            return false;
        }

        job.execute().await;

        self.next_run = Self::next_occurrence(self.at, now);
        info!(next_run = %self.next_run, "Next briefing scheduled");
        true
    }

    pub async fn run_forever<J>(&mut self, job: &J)
    where
        J: ScheduledJob + ?Sized,
    {
        info!(
            at = %self.at(),
            next_run = %self.next_run,
            "Waiting for the scheduled time..."
        );
        loop {
            self.run_pending(Local::now().naive_local(), job).await;
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
