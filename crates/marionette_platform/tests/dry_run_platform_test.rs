//! Tests for the dry-run platform.

use marionette_core::FocusBuilder;
use marionette_platform::{ChatPlatform, Credentials, DryRunPlatform, MessagePayload};
use std::path::Path;

#[tokio::test]
async fn test_dry_run_accepts_everything() {
    let platform = DryRunPlatform::new();
    let session = platform
        .authenticate(&Credentials::ClientSecret {
            id: "app-1".to_string(),
            secret: "secret".to_string(),
        })
        .await
        .expect("dry run authenticates");
    assert_eq!(session.identity(), "app-1");

    let first = platform
        .send_message(&session, "space-1", &MessagePayload::generic("#FFFFFF", "hi"))
        .await
        .expect("message accepted");
    let second = platform
        .send_file(&session, "space-1", Path::new("missing.png"))
        .await
        .expect("file accepted without reading it");

    assert_ne!(first, second);
    assert_eq!(first.space_id(), "space-1");

    let focus = FocusBuilder::default()
        .phrase("hi")
        .lens("Greeting")
        .build()
        .expect("valid focus");
    assert!(platform.add_message_focus(&session, &first, &focus).await.is_ok());
    assert!(platform.upload_photo(&session, Path::new("me.png")).await.is_ok());
    assert_eq!(platform.platform_name(), "dry-run");
}
