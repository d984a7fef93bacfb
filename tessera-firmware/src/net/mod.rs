//! Network collaborators: HTTP fetching and SNTP time sync.

pub mod http;
pub mod json_path;
pub mod sntp;

pub use http::HttpFetcher;
pub use sntp::time_sync_task;
