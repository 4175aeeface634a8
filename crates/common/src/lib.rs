pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod source;
pub mod state;

pub use config::Config;
pub use error::{CuratorError, CuratorResult};
pub use http::{ApiClient, ApiRequest, HttpMethod};
pub use models::{Candidate, FeedArticle, PageArticle};
pub use source::{CandidateSource, PostScheduler, ProfileTarget, ScheduledTime, UpdateResponse};
pub use state::{FileStateStore, MemoryStateStore, StateStore};
