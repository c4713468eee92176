//! Staging: authenticate every scripted identity before playback.

use crate::{ActorDirectory, Notice, Renderer};
use derive_getters::Getters;
use marionette_error::StagingError;
use marionette_platform::ChatPlatform;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of a successful staging run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct StagingReport {
    /// Keys that authenticated, in staging order
    staged: Vec<String>,
    /// Keys without credentials; their lines are spoken by the app
    skipped: Vec<String>,
    /// Photo uploads started
    photos: usize,
}

/// Authenticates identities in declaration order and attaches their sessions
/// to the directory.
pub struct Stager {
    platform: Arc<dyn ChatPlatform>,
    upload_photos: bool,
}

impl Stager {
    /// Create a stager; `upload_photos` starts photo uploads once staging succeeds.
    pub fn new(platform: Arc<dyn ChatPlatform>, upload_photos: bool) -> Self {
        Self {
            platform,
            upload_photos,
        }
    }

    /// Authenticate the app, then each actor as declared, one at a time.
    ///
    /// Stops at the first failure; entries staged before it keep their
    /// sessions but playback must not begin.
    ///
    /// # Errors
    ///
    /// Returns a `StagingError` naming the identity that failed.
    #[instrument(skip_all, fields(platform = self.platform.platform_name()))]
    pub async fn stage(
        &self,
        directory: &mut ActorDirectory,
        renderer: &mut dyn Renderer,
    ) -> Result<StagingReport, StagingError> {
        renderer.notice(&Notice::Staging);

        let pending: Vec<_> = directory
            .staging_order()
            .map(|entry| {
                (
                    entry.key().clone(),
                    entry.name().clone(),
                    entry.credentials().clone(),
                )
            })
            .collect();

        let mut report = StagingReport::default();
        for (key, name, credentials) in pending {
            let Some(credentials) = credentials else {
                debug!(actor = %key, "No credentials, lines fall back to the app");
                report.skipped.push(key);
                continue;
            };

            match self.platform.authenticate(&credentials).await {
                Ok(session) => {
                    info!(actor = %key, identity = %session.identity(), "Actor staged");
                    directory.attach_session(&key, session);
                    renderer.notice(&Notice::ActorReady(name));
                    report.staged.push(key);
                }
                Err(cause) => {
                    warn!(actor = %key, error = %cause, "Staging failed");
                    renderer.notice(&Notice::ActorFailed {
                        actor: name,
                        cause: cause.kind.to_string(),
                    });
                    return Err(StagingError::new(key, cause));
                }
            }
        }

        if self.upload_photos {
            report.photos = self.upload_photos(directory);
            if report.photos > 0 {
                renderer.notice(&Notice::PhotosUploading(report.photos));
            }
        }

        renderer.notice(&Notice::Action);
        Ok(report)
    }

    /// Start a background upload for every staged identity with a photo.
    ///
    /// Uploads never block or fail playback; failures are logged.
    /// Returns the number of uploads started.
    pub fn upload_photos(&self, directory: &ActorDirectory) -> usize {
        let mut started = 0;
        for entry in directory.staging_order() {
            let (Some(session), Some(photo)) = (entry.session().clone(), entry.photo().clone())
            else {
                continue;
            };
            let platform = Arc::clone(&self.platform);
            let key = entry.key().clone();
            tokio::spawn(async move {
                match platform.upload_photo(&session, &photo).await {
                    Ok(()) => info!(actor = %key, photo = %photo.display(), "Photo uploaded"),
                    Err(e) => warn!(actor = %key, error = %e, "Photo upload failed"),
                }
            });
            started += 1;
        }
        started
    }
}
