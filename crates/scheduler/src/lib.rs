pub mod dedup;
pub mod slots;

pub use dedup::check_posted;
pub use slots::{format_timestamp, posting_times};
