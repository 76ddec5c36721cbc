pub mod thumbnail;
pub mod video_locks;

pub use thumbnail::ThumbnailUploadService;
pub use video_locks::{VideoLockGuard, VideoLocks};
