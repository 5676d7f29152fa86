pub mod news;
pub mod source;
pub mod video;

pub use news::NewsItem;
pub use source::{Endpoint, FeedFormat, SourceDescriptor};
pub use video::{VideoDetails, VideoPage, VideoSummary};
