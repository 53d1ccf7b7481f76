//! Download delegation: share-link resolution, the yt-dlp backend and its
//! error taxonomy.

pub mod error;
pub mod resolve;
pub mod source;
pub mod ytdlp;

pub use error::DownloadError;
pub use resolve::resolve_share_url;
pub use source::ytdlp::YtDlpExtractor;
pub use source::{DownloadedVideo, VideoExtractor};
