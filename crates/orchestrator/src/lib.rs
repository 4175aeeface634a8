use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use buffer::BufferClient;
use clicky::ClickyFetcher;
use common::config::ArticleCounts;
use common::{
    Candidate, CandidateSource, Config, CuratorError, CuratorResult, FileStateStore, PostScheduler,
    ProfileTarget, ScheduledTime, StateStore,
};
use feedly::FeedlyFetcher;
use rand::seq::SliceRandom;
use scheduler::{check_posted, format_timestamp, posting_times};
use time::{OffsetDateTime, UtcOffset};
use tracing::{info, warn};

/// The parts of [`Config`] a run needs once the clients are built.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub posting_hours: Vec<u8>,
    pub articles: ArticleCounts,
    pub profile: String,
    pub post_delay: Duration,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            posting_hours: config.posting_hours.clone(),
            articles: config.articles,
            profile: config.buffer.profile.clone(),
            post_delay: Duration::from_secs(config.post_delay_secs),
        }
    }

    /// One posting hour per requested article.
    pub fn validate(&self) -> CuratorResult<()> {
        if self.posting_hours.len() != self.articles.total() {
            return Err(CuratorError::PostingHoursMismatch {
                hours: self.posting_hours.len(),
                articles: self.articles.total(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledPost {
    pub title: String,
    pub url: String,
    pub at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPost {
    pub url: String,
    pub at: i64,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub scheduled: Vec<ScheduledPost>,
    pub failed: Vec<FailedPost>,
    /// Slots left over because fewer candidates survived dedup.
    pub unused_slots: usize,
}

#[derive(Debug)]
pub enum RunOutcome {
    AlreadyRanToday,
    Completed(RunReport),
}

pub struct DailyRun {
    settings: RunSettings,
    feed: Arc<dyn CandidateSource>,
    analytics: Arc<dyn CandidateSource>,
    poster: Arc<dyn PostScheduler>,
    store: Arc<dyn StateStore>,
}

impl DailyRun {
    pub fn new(
        settings: RunSettings,
        feed: Arc<dyn CandidateSource>,
        analytics: Arc<dyn CandidateSource>,
        poster: Arc<dyn PostScheduler>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            settings,
            feed,
            analytics,
            poster,
            store,
        }
    }

    /// Wires the Feedly, Clicky and Buffer clients and the flat-file store.
    pub fn from_config(config: &Config) -> CuratorResult<Self> {
        Ok(Self::new(
            RunSettings::from_config(config),
            Arc::new(FeedlyFetcher::new(&config.feedly)?),
            Arc::new(ClickyFetcher::new(&config.clicky)),
            Arc::new(BufferClient::new(&config.buffer)),
            Arc::new(FileStateStore::from_config(&config.state)),
        ))
    }

    pub async fn run(&self) -> CuratorResult<RunOutcome> {
        self.run_at(OffsetDateTime::now_utc()).await
    }

    pub async fn run_at(&self, now: OffsetDateTime) -> CuratorResult<RunOutcome> {
        let now = now.to_offset(UtcOffset::UTC);
        let today = now.date().to_string();
        info!("UTC time now: {}", format_timestamp(now.unix_timestamp()));

        if self.store.load_marker().await?.as_deref() == Some(today.as_str()) {
            info!("Already scheduled today, nothing to do");
            return Ok(RunOutcome::AlreadyRanToday);
        }

        self.settings.validate()?;

        let feed = self.fetch(&self.feed).await?;
        let analytics = self.fetch(&self.analytics).await?;

        let mut history = self.store.load_history().await?;
        let posted: HashSet<String> = history.iter().cloned().collect();

        let mut to_schedule = check_posted(&feed, self.settings.articles.feedly, &posted);
        to_schedule.extend(check_posted(&analytics, self.settings.articles.clicky, &posted));

        let slots = posting_times(&self.settings.posting_hours, now, &mut rand::rng());
        to_schedule.shuffle(&mut rand::rng());

        let mut report = RunReport {
            unused_slots: slots.len().saturating_sub(to_schedule.len()),
            ..RunReport::default()
        };
        if report.unused_slots > 0 {
            warn!(
                "Only {} candidates for {} slots, {} slots stay empty",
                to_schedule.len(),
                slots.len(),
                report.unused_slots
            );
        }

        let profile = ProfileTarget::single(&self.settings.profile);
        for (index, (at, candidate)) in slots.iter().zip(to_schedule.iter()).enumerate() {
            if index > 0 && !self.settings.post_delay.is_zero() {
                tokio::time::sleep(self.settings.post_delay).await;
            }

            info!("Scheduling {} at {}", candidate.url(), format_timestamp(*at));
            let result = self
                .poster
                .schedule(&candidate.status_text(), &profile, &ScheduledTime::At(*at))
                .await;

            match result {
                Ok(response) if response.success => {
                    info!("Scheduled successfully: {}", candidate.url());
                    history.push(candidate.url().to_string());
                    report.scheduled.push(ScheduledPost {
                        title: candidate.title().to_string(),
                        url: candidate.url().to_string(),
                        at: *at,
                    });
                }
                Ok(response) => {
                    let reason = response
                        .message
                        .unwrap_or_else(|| "no message from scheduling API".to_string());
                    warn!("Something went wrong scheduling {}: {}", candidate.url(), reason);
                    report.failed.push(FailedPost {
                        url: candidate.url().to_string(),
                        at: *at,
                        reason,
                    });
                }
                Err(e) if is_per_post(&e) => {
                    warn!("Something went wrong scheduling {}: {}", candidate.url(), e);
                    report.failed.push(FailedPost {
                        url: candidate.url().to_string(),
                        at: *at,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        // A crash before this point leaves no record of the posts above.
        self.store.save_history(&history).await?;
        self.store.save_marker(&today).await?;

        info!(
            "Run finished. Scheduled: {}, Failed: {}",
            report.scheduled.len(),
            report.failed.len()
        );
        Ok(RunOutcome::Completed(report))
    }

    async fn fetch(&self, source: &Arc<dyn CandidateSource>) -> CuratorResult<Vec<Candidate>> {
        let candidates = source.fetch().await?;
        info!("{} returned {} candidates", source.name(), candidates.len());
        Ok(candidates)
    }
}

/// Failures confined to a single post; anything else aborts the run.
fn is_per_post(error: &CuratorError) -> bool {
    matches!(
        error,
        CuratorError::HttpRequest(_)
            | CuratorError::Json(_)
            | CuratorError::MalformedResponse { .. }
            | CuratorError::Upstream { .. }
    )
}
