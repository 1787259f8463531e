pub mod movie;
pub mod placeholder;
pub mod report;
pub mod status;

pub use movie::{base_title, cache_key, extract_douban_id, MovieRecord, StorageProvider};
pub use placeholder::Placeholder;
pub use report::Report;
pub use status::LinkStatus;
