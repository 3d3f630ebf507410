use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::DeliveryError;
use crate::guardian::GuardianClient;
use crate::models::Article;
use crate::scheduler::ScheduledJob;
use crate::summarizer::{CohereSummarizer, Summary};
use crate::telegram::TelegramNotifier;

pub const INTRO_MESSAGE: &str = "<b>📰 Your Daily News Briefing</b>";
pub const ARTICLES_PER_BRIEFING: usize = 5;
pub const PACING_DELAY: Duration = Duration::from_secs(2);
/// Telegram's sendMessage text limit
pub const MAX_MESSAGE_CHARS: usize = 4096;
const TRUNCATION_MARK: &str = "…";

/// Source of the articles for one briefing. Failures are contained by the
/// implementation and reported as an empty list.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self, max_articles: usize) -> Vec<Article>;
}

/// Turns article text into a summary. Never fails; errors come back as
/// [`Summary::Failed`].
#[async_trait::async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(&self, text: &str) -> Summary;
}

#[async_trait::async_trait]
pub trait Notify: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), DeliveryError>;
}

pub struct MessageFormatter;

impl MessageFormatter {
    /// Title, summary and link in Telegram HTML, at most [`MAX_MESSAGE_CHARS`]
    /// characters. Only the summary is shortened to fit.
    pub fn format(article: &Article, summary: &Summary) -> String {
        let head = format!("<b>{}</b>\n\n", Self::escape_html(&article.title));
        let tail = format!(
            "\n\n<a href=\"{}\">Read the full article</a>",
            Self::escape_html(&article.url)
        );
        let budget = MAX_MESSAGE_CHARS
            .saturating_sub(head.chars().count())
            .saturating_sub(tail.chars().count());

        let body = Self::escape_within(&summary.to_string(), budget);
        format!("{}{}{}", head, body, tail)
    }

    /// Escapes `text`, cutting it with an ellipsis once the escaped form would
    /// exceed `budget` characters. Never splits an entity.
    fn escape_within(text: &str, budget: usize) -> String {
        let escaped = Self::escape_html(text);
        if escaped.chars().count() <= budget {
            return escaped;
        }

        let limit = budget.saturating_sub(TRUNCATION_MARK.chars().count());
        let mut out = String::new();
        let mut used = 0;
        for c in text.chars() {
            let piece = Self::escape_html(c.encode_utf8(&mut [0; 4]));
            let len = piece.chars().count();
            if used + len > limit {
                break;
            }
            out.push_str(&piece);
            used += len;
        }
        out.push_str(TRUNCATION_MARK);
        out
    }

    pub fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }
}

/// Outcome counts for a single pipeline pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub intro_delivered: bool,
    pub articles: usize,
    pub delivered: usize,
    pub failed_summaries: usize,
    pub failed_deliveries: usize,
}

pub struct BriefingJob<N, S, T> {
    news: N,
    summarizer: S,
    notifier: T,
    pacing: Duration,
}

pub type DailyBriefing = BriefingJob<GuardianClient, CohereSummarizer, TelegramNotifier>;

impl DailyBriefing {
    pub fn from_config(config: &Config) -> Result<Self> {
        let news = GuardianClient::new(
            config.guardian_api_key.clone(),
            config.guardian_section.clone(),
        )?;
        let summarizer =
            CohereSummarizer::new(config.cohere_api_key.clone(), config.cohere_model.clone())?;
        let notifier = TelegramNotifier::new(
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
        )?;

        Ok(BriefingJob::new(news, summarizer, notifier))
    }
}

impl<N, S, T> BriefingJob<N, S, T>
where
    N: NewsSource,
    S: Summarize,
    T: Notify,
{
    pub fn new(news: N, summarizer: S, notifier: T) -> Self {
        Self {
            news,
            summarizer,
            notifier,
            pacing: PACING_DELAY,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// One full pass: intro, fetch, then summarize/format/send per article.
    ///
    /// Every failure is contained; the only early exit is an empty fetch.
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();

        // Notifier already logs delivery failures
        report.intro_delivered = self.notifier.notify(INTRO_MESSAGE).await.is_ok();

        let articles = self.news.fetch(ARTICLES_PER_BRIEFING).await;
        if articles.is_empty() {
            warn!("No articles found, skipping briefing.");
            return report;
        }
        report.articles = articles.len();

        for (index, article) in articles.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pacing).await;
            }

            info!(title = %article.title, "Processing article {}/{}", index + 1, articles.len());

            let summary = self.summarizer.summarize(&article.body_text).await;
            if summary.is_failed() {
                report.failed_summaries += 1;
            }

            let message = MessageFormatter::format(article, &summary);
            match self.notifier.notify(&message).await {
                Ok(()) => report.delivered += 1,
                Err(_) => report.failed_deliveries += 1,
            }
        }

        report
    }
}

#[async_trait::async_trait]
impl<N, S, T> ScheduledJob for BriefingJob<N, S, T>
where
    N: NewsSource,
    S: Summarize,
    T: Notify,
{
    async fn execute(&self) {
        info!("Running daily briefing");
        let report = self.run().await;
        info!(
            intro_delivered = report.intro_delivered,
            articles = report.articles,
            delivered = report.delivered,
            failed_summaries = report.failed_summaries,
            failed_deliveries = report.failed_deliveries,
            "Briefing finished"
        );
    }
}
