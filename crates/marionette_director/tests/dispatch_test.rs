//! Tests for single-line dispatch.

mod common;

use common::{Call, MockPlatform, RecordingRenderer};
use marionette_core::{FocusBuilder, LineBuilder, Script};
use marionette_director::{ActorDirectory, Dispatched, Dispatcher, Stager};
use marionette_error::DispatchErrorKind;
use std::sync::Arc;

async fn staged_directory(platform: Arc<MockPlatform>, script: &Script) -> ActorDirectory {
    let mut directory = ActorDirectory::build(script);
    Stager::new(platform, false)
        .stage(&mut directory, &mut RecordingRenderer::default())
        .await
        .expect("staging succeeds");
    directory
}

fn script() -> Script {
    Script::from_json_str(
        r#"{
          "app": { "id": "app-id", "secret": "s" },
          "actors": {
            "van": { "id": "van-id", "secret": "s" },
            "walk_on": { "name": "Walk-on" }
          },
          "spaces": { "main": "space-1" }
        }"#,
    )
    .expect("valid script")
}

#[tokio::test]
async fn test_comment_is_never_transmitted() {
    let platform = Arc::new(MockPlatform::new());
    let script = script();
    let directory = staged_directory(platform.clone(), &script).await;
    let dispatcher = Dispatcher::new(platform.clone(), "#FFFFFF", ".");

    // A comment succeeds even with an unmapped space.
    let line = LineBuilder::default()
        .space("nowhere")
        .text("aside")
        .comment(true)
        .build()
        .expect("valid line");
    let dispatched = dispatcher
        .dispatch(0, &line, &directory)
        .await
        .expect("comment succeeds");

    assert_eq!(dispatched, Dispatched::Suppressed);
    assert_eq!(platform.calls().len(), 2, "only the two authentications");
}

#[tokio::test]
async fn test_empty_line_is_rejected() {
    let platform = Arc::new(MockPlatform::new());
    let script = script();
    let directory = staged_directory(platform.clone(), &script).await;
    let dispatcher = Dispatcher::new(platform.clone(), "#FFFFFF", ".");

    let line = LineBuilder::default().space("main").build().expect("valid line");
    let err = dispatcher
        .dispatch(4, &line, &directory)
        .await
        .expect_err("nothing to send");
    assert!(matches!(err.kind, DispatchErrorKind::EmptyLine(4)));
    assert!(err.is_configuration());
}

#[tokio::test]
async fn test_unstaged_actor_speaks_through_app() {
    let platform = Arc::new(MockPlatform::new());
    let script = script();
    let directory = staged_directory(platform.clone(), &script).await;
    let dispatcher = Dispatcher::new(platform.clone(), "#FF0000", ".");

    let line = LineBuilder::default()
        .actor("walk_on")
        .space("main")
        .text("extra line")
        .build()
        .expect("valid line");
    let dispatched = dispatcher
        .dispatch(0, &line, &directory)
        .await
        .expect("sent via app");

    assert!(matches!(dispatched, Dispatched::Message(_)));
    assert!(platform.calls().contains(&Call::SendMessage {
        identity: "app-id".to_string(),
        space: "space-1".to_string(),
        text: "extra line".to_string(),
    }));
}

#[tokio::test]
async fn test_no_session_at_all_is_unauthenticated() {
    let platform = Arc::new(MockPlatform::new());
    let script = script();
    let directory = ActorDirectory::build(&script);
    let dispatcher = Dispatcher::new(platform.clone(), "#FFFFFF", ".");

    let line = LineBuilder::default()
        .actor("van")
        .space("main")
        .text("too early")
        .build()
        .expect("valid line");
    let err = dispatcher
        .dispatch(0, &line, &directory)
        .await
        .expect_err("nothing staged");
    assert!(matches!(err.kind, DispatchErrorKind::Unauthenticated(ref key) if key == "van"));
    assert!(platform.calls().is_empty());
}

#[tokio::test]
async fn test_multi_part_text_is_joined_with_newlines() {
    let platform = Arc::new(MockPlatform::new());
    let script = script();
    let directory = staged_directory(platform.clone(), &script).await;
    let dispatcher = Dispatcher::new(platform.clone(), "#FFFFFF", ".");

    let line = LineBuilder::default()
        .actor("van")
        .space("main")
        .text(vec!["first".to_string(), "second".to_string()])
        .build()
        .expect("valid line");
    dispatcher
        .dispatch(0, &line, &directory)
        .await
        .expect("sent");
    assert_eq!(platform.sent_texts(), vec!["first\nsecond"]);
}

#[tokio::test]
async fn test_file_resolves_against_asset_root() {
    let platform = Arc::new(MockPlatform::new());
    let script = script();
    let directory = staged_directory(platform.clone(), &script).await;
    let dispatcher = Dispatcher::new(platform.clone(), "#FFFFFF", "/scripts/demo");

    let line = LineBuilder::default()
        .actor("van")
        .space("main")
        .filename("deck.pdf")
        .build()
        .expect("valid line");
    let dispatched = dispatcher
        .dispatch(0, &line, &directory)
        .await
        .expect("file sent");

    assert!(matches!(dispatched, Dispatched::File(_)));
    assert!(platform.calls().contains(&Call::SendFile {
        identity: "van-id".to_string(),
        space: "space-1".to_string(),
        path: "/scripts/demo/deck.pdf".into(),
    }));
}

#[tokio::test]
async fn test_file_send_carries_no_focus() {
    let platform = Arc::new(MockPlatform::new());
    let script = script();
    let directory = staged_directory(platform.clone(), &script).await;
    let dispatcher = Dispatcher::new(platform.clone(), "#FFFFFF", ".");

    let focus = FocusBuilder::default()
        .phrase("deck")
        .lens("ActionRequest")
        .build()
        .expect("valid focus");
    let line = LineBuilder::default()
        .actor("van")
        .space("main")
        .filename("deck.pdf")
        .focus(focus)
        .build()
        .expect("valid line");
    let dispatched = dispatcher
        .dispatch(0, &line, &directory)
        .await
        .expect("file sent");

    assert!(matches!(dispatched, Dispatched::File(_)));
    assert!(
        !platform
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Focus { .. }))
    );
}

#[tokio::test]
async fn test_text_send_carries_focus() {
    let platform = Arc::new(MockPlatform::new());
    let script = script();
    let directory = staged_directory(platform.clone(), &script).await;
    let dispatcher = Dispatcher::new(platform.clone(), "#FFFFFF", ".");

    let focus = FocusBuilder::default()
        .phrase("review")
        .lens("ActionRequest")
        .build()
        .expect("valid focus");
    let line = LineBuilder::default()
        .actor("van")
        .space("main")
        .text("please review")
        .focus(focus)
        .build()
        .expect("valid line");
    dispatcher
        .dispatch(0, &line, &directory)
        .await
        .expect("sent");

    assert!(
        platform
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Focus { identity, .. } if identity == "app-id"))
    );
}

#[tokio::test]
async fn test_empty_text_is_rejected_without_sending() {
    let platform = Arc::new(MockPlatform::new());
    let script = script();
    let directory = staged_directory(platform.clone(), &script).await;
    let dispatcher = Dispatcher::new(platform.clone(), "#FFFFFF", ".");

    let line = LineBuilder::default()
        .actor("van")
        .space("main")
        .text("")
        .build()
        .expect("valid line");
    let err = dispatcher
        .dispatch(2, &line, &directory)
        .await
        .expect_err("empty text is nothing to send");

    assert!(matches!(err.kind, DispatchErrorKind::EmptyLine(2)));
    assert!(platform.sent_texts().is_empty());
}
