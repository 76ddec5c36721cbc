//! Thumbnail upload coordination
//!
//! Writes the validated image to blob storage and points the video's metadata
//! record at it. The record is only updated after the blob write completed,
//! and only when the caller owns the video.
//!
//! When ownership is checked after the write, the bytes go to a staging key
//! and only replace the live object once the caller is known to own the
//! video. A staged blob left behind by a refused or failed upload stays on
//! storage unreferenced.

use crate::auth::CallerIdentity;
use crate::services::video_locks::VideoLocks;
use std::sync::Arc;
use tubely_core::models::{UploadedThumbnail, Video};
use tubely_core::{AppError, OwnershipCheck};
use tubely_db::VideoStore;
use tubely_storage::{staging_key, thumbnail_key, AssetKey, Storage};
use uuid::Uuid;

#[derive(Clone)]
pub struct ThumbnailUploadService {
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    locks: VideoLocks,
    ownership_check: OwnershipCheck,
}

impl ThumbnailUploadService {
    pub fn new(
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        ownership_check: OwnershipCheck,
    ) -> Self {
        Self {
            videos,
            storage,
            locks: VideoLocks::new(),
            ownership_check,
        }
    }

    pub fn ownership_check(&self) -> OwnershipCheck {
        self.ownership_check
    }

    /// Store `thumbnail` for `video_id` and return the updated record.
    #[tracing::instrument(
        skip(self, caller, thumbnail),
        fields(
            user_id = %caller.user_id,
            media_type = %thumbnail.media_type,
            size_bytes = thumbnail.len(),
            ownership_check = %self.ownership_check,
        )
    )]
    pub async fn upload(
        &self,
        caller: &CallerIdentity,
        video_id: Uuid,
        thumbnail: UploadedThumbnail,
    ) -> Result<Video, AppError> {
        let key = thumbnail_key(video_id, thumbnail.media_type);

        // Held until the record is committed or the upload fails.
        let _lock = self.locks.acquire(video_id).await;

        let mut video = match self.ownership_check {
            OwnershipCheck::BeforeWrite => {
                let video = self.load_owned(caller, video_id).await?;
                self.store(&key, thumbnail).await?;
                video
            }
            OwnershipCheck::AfterWrite => {
                let staged = staging_key(&key);
                self.store(&staged, thumbnail).await?;

                let video = self.load_owned(caller, video_id).await.inspect_err(|e| {
                    tracing::warn!(
                        staged_key = %staged,
                        error = %e,
                        "Staged thumbnail left unreferenced"
                    );
                })?;

                self.storage
                    .promote(&staged, &key)
                    .await
                    .map_err(|e| AppError::StorageWriteFailed(e.to_string()))?;
                video
            }
        };

        video.set_thumbnail_url(self.storage.url_for(&key));

        self.videos.update(&video).await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "Thumbnail stored but metadata update failed");
            AppError::MetadataUpdateFailed(e.to_string())
        })?;

        tracing::info!(
            key = %key,
            thumbnail_url = video.thumbnail_url.as_deref().unwrap_or_default(),
            "Thumbnail updated"
        );

        Ok(video)
    }

    async fn store(&self, key: &AssetKey, thumbnail: UploadedThumbnail) -> Result<u64, AppError> {
        let reader = Box::pin(std::io::Cursor::new(thumbnail.data));
        self.storage
            .write(key, reader)
            .await
            .map_err(|e| AppError::StorageWriteFailed(e.to_string()))
    }

    /// Load the record and check that `caller` owns it.
    async fn load_owned(&self, caller: &CallerIdentity, video_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .videos
            .get(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(caller.user_id) {
            return Err(AppError::NotAuthorized(format!(
                "User {} does not own video {}",
                caller.user_id, video_id
            )));
        }

        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tubely_core::models::ThumbnailMediaType;
    use tubely_db::test_helpers::MockVideoStore;
    use tubely_storage::test_helpers::MockStorage;

    struct Fixture {
        videos: MockVideoStore,
        storage: MockStorage,
        service: ThumbnailUploadService,
        owner: CallerIdentity,
        video: Video,
    }

    fn fixture(ownership_check: OwnershipCheck) -> Fixture {
        let videos = MockVideoStore::new();
        let storage = MockStorage::new();
        let owner = CallerIdentity {
            user_id: Uuid::new_v4(),
        };
        let created = Utc::now() - chrono::Duration::minutes(5);
        let video = Video {
            id: Uuid::new_v4(),
            user_id: owner.user_id,
            title: "Boots".to_string(),
            description: Some("A pair of boots".to_string()),
            thumbnail_url: None,
            video_url: None,
            created_at: created,
            updated_at: created,
        };
        videos.insert(video.clone());

        let service = ThumbnailUploadService::new(
            Arc::new(videos.clone()),
            Arc::new(storage.clone()),
            ownership_check,
        );

        Fixture {
            videos,
            storage,
            service,
            owner,
            video,
        }
    }

    fn png(data: &'static [u8]) -> UploadedThumbnail {
        UploadedThumbnail::new(data, ThumbnailMediaType::Png)
    }

    #[tokio::test]
    async fn owner_upload_writes_blob_and_updates_record() {
        let f = fixture(OwnershipCheck::AfterWrite);

        let updated = f
            .service
            .upload(&f.owner, f.video.id, png(b"\x89PNG..."))
            .await
            .unwrap();

        let key = format!("{}.png", f.video.id);
        assert_eq!(
            updated.thumbnail_url,
            Some(format!("memory://assets/{}", key))
        );
        assert!(updated.updated_at > f.video.updated_at);
        assert_eq!(updated.title, f.video.title);
        assert_eq!(f.storage.get(&key).unwrap().as_ref(), b"\x89PNG...");
        assert_eq!(f.videos.snapshot(f.video.id), Some(updated));
    }

    #[tokio::test]
    async fn jpeg_uses_jpg_key() {
        let f = fixture(OwnershipCheck::AfterWrite);

        let updated = f
            .service
            .upload(
                &f.owner,
                f.video.id,
                UploadedThumbnail::new(&b"\xff\xd8\xff"[..], ThumbnailMediaType::Jpeg),
            )
            .await
            .unwrap();

        assert!(updated.thumbnail_url.unwrap().ends_with(".jpg"));
    }

    #[tokio::test]
    async fn reupload_overwrites_same_key() {
        let f = fixture(OwnershipCheck::AfterWrite);

        let first = f
            .service
            .upload(&f.owner, f.video.id, png(b"one"))
            .await
            .unwrap();
        let second = f
            .service
            .upload(&f.owner, f.video.id, png(b"two"))
            .await
            .unwrap();

        assert_eq!(first.thumbnail_url, second.thumbnail_url);
        assert_eq!(f.storage.object_count(), 1);
        assert_eq!(
            f.storage.get(&format!("{}.png", f.video.id)).unwrap().as_ref(),
            b"two"
        );
    }

    #[tokio::test]
    async fn foreign_caller_after_write_leaves_record_unchanged() {
        let f = fixture(OwnershipCheck::AfterWrite);
        let stranger = CallerIdentity {
            user_id: Uuid::new_v4(),
        };

        let result = f.service.upload(&stranger, f.video.id, png(b"evil")).await;

        assert!(matches!(result, Err(AppError::NotAuthorized(_))));
        assert_eq!(f.videos.snapshot(f.video.id), Some(f.video.clone()));
        assert_eq!(f.videos.update_count(), 0);
        // Written to a staging key only; the live key was never touched.
        assert_eq!(f.storage.write_count(), 1);
        assert!(f.storage.get(&format!("{}.png", f.video.id)).is_none());
    }

    #[tokio::test]
    async fn foreign_caller_after_write_keeps_owner_thumbnail() {
        let f = fixture(OwnershipCheck::AfterWrite);
        let stranger = CallerIdentity {
            user_id: Uuid::new_v4(),
        };
        let key = format!("{}.png", f.video.id);

        let owned = f
            .service
            .upload(&f.owner, f.video.id, png(b"owner image"))
            .await
            .unwrap();
        let result = f.service.upload(&stranger, f.video.id, png(b"defaced")).await;

        assert!(matches!(result, Err(AppError::NotAuthorized(_))));
        assert_eq!(f.storage.get(&key).unwrap().as_ref(), b"owner image");
        assert_eq!(f.videos.snapshot(f.video.id), Some(owned));
        // The refused upload stays behind as an unreferenced staged object.
        let keys = f.storage.keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().any(|k| k.ends_with(".staged")));
    }

    #[tokio::test]
    async fn foreign_caller_before_write_touches_no_storage() {
        let f = fixture(OwnershipCheck::BeforeWrite);
        let stranger = CallerIdentity {
            user_id: Uuid::new_v4(),
        };

        let result = f.service.upload(&stranger, f.video.id, png(b"evil")).await;

        assert!(matches!(result, Err(AppError::NotAuthorized(_))));
        assert_eq!(f.storage.write_count(), 0);
        assert_eq!(f.videos.update_count(), 0);
        assert_eq!(f.videos.snapshot(f.video.id), Some(f.video.clone()));
    }

    #[tokio::test]
    async fn before_write_owner_upload_succeeds() {
        let f = fixture(OwnershipCheck::BeforeWrite);

        let updated = f
            .service
            .upload(&f.owner, f.video.id, png(b"img"))
            .await
            .unwrap();

        assert!(updated.thumbnail_url.is_some());
        assert_eq!(f.videos.get_count(), 1);
        assert_eq!(f.storage.write_count(), 1);
    }

    #[tokio::test]
    async fn unknown_video_is_not_found() {
        for check in [OwnershipCheck::AfterWrite, OwnershipCheck::BeforeWrite] {
            let f = fixture(check);
            let result = f.service.upload(&f.owner, Uuid::new_v4(), png(b"img")).await;
            assert!(matches!(result, Err(AppError::NotFound(_))), "{}", check);
            assert_eq!(f.videos.update_count(), 0);
        }
    }

    #[tokio::test]
    async fn storage_failure_is_storage_write_failed() {
        let f = fixture(OwnershipCheck::AfterWrite);
        f.storage.fail_writes(true);

        let result = f.service.upload(&f.owner, f.video.id, png(b"img")).await;

        assert!(matches!(result, Err(AppError::StorageWriteFailed(_))));
        assert_eq!(f.videos.update_count(), 0);
        assert_eq!(f.videos.snapshot(f.video.id), Some(f.video.clone()));
    }

    #[tokio::test]
    async fn update_failure_is_metadata_update_failed() {
        let f = fixture(OwnershipCheck::AfterWrite);
        f.videos.fail_updates(true);

        let result = f.service.upload(&f.owner, f.video.id, png(b"img")).await;

        assert!(matches!(result, Err(AppError::MetadataUpdateFailed(_))));
        // Blob remains, record still points at the previous thumbnail.
        assert_eq!(f.storage.object_count(), 1);
        assert_eq!(f.videos.snapshot(f.video.id), Some(f.video.clone()));
    }

    #[tokio::test]
    async fn concurrent_uploads_commit_consistently() {
        let f = fixture(OwnershipCheck::AfterWrite);

        let uploads = (0..10u8).map(|i| {
            let service = f.service.clone();
            let owner = f.owner;
            let video_id = f.video.id;
            tokio::spawn(async move {
                service
                    .upload(&owner, video_id, UploadedThumbnail::new(vec![i; 4], ThumbnailMediaType::Png))
                    .await
            })
        });
        for upload in futures::future::join_all(uploads).await {
            upload.unwrap().unwrap();
        }

        assert!(f.videos.snapshot(f.video.id).unwrap().thumbnail_url.is_some());
        assert_eq!(f.storage.object_count(), 1);
        assert_eq!(f.videos.update_count(), 10);
    }
}
