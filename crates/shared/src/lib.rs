// Public modules
pub mod briefing;
pub mod config;
pub mod error;
pub mod guardian;
pub mod models;
pub mod scheduler;
pub mod summarizer;
pub mod telegram;

// Re-export commonly used types
pub use briefing::{
    BriefingJob, DailyBriefing, MessageFormatter, NewsSource, Notify, RunReport, Summarize,
};
pub use config::Config;
pub use error::{DeliveryError, FetchError, SummarizeError};
pub use guardian::GuardianClient;
pub use models::{Article, TriggerTime};
pub use scheduler::{ScheduledJob, Scheduler};
pub use summarizer::{CohereSummarizer, Summary};
pub use telegram::TelegramNotifier;
