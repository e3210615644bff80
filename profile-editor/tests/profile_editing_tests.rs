//! End-to-end editing flows against the in-memory collaborators

mod common;

use common::{BOB, bob, file, loaded_runtime, stage};
use profile_editor::domains::profile::AvatarDisplay;
use profile_editor::infrastructure::testing::{StubOutcome, StubServices, TestImageTransform};
use profile_editor::{EditorRuntime, StoreError, TransformError};
use profile_model::ProfileField;

#[tokio::test]
async fn stage_remove_and_save_submits_remaining_candidate() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;
    assert_eq!(
        runtime.editor().avatar_display(),
        AvatarDisplay::Stored("/a.png".into())
    );

    runtime.select_file(Some(file("one.png", b"img1")));
    runtime.run_until_idle().await;
    let c1 = runtime.editor().candidates().selected_id().expect("c1 selected");
    assert_eq!(runtime.editor().candidates().ids(), vec![c1]);

    runtime.select_file(Some(file("two.png", b"img2")));
    runtime.run_until_idle().await;
    let c2 = runtime.editor().candidates().selected_id().expect("c2 selected");
    assert_ne!(c1, c2);
    assert_eq!(runtime.editor().candidates().ids(), vec![c1, c2]);

    runtime.remove_candidate(c2);
    assert_eq!(runtime.editor().candidates().ids(), vec![c1]);
    assert_eq!(runtime.editor().candidates().selected_id(), Some(c1));

    runtime.save();
    runtime.run_until_idle().await;

    let updates = stubs.profiles.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].profile.username, BOB);
    assert_eq!(updates[0].profile.full_name, "Bob");
    assert_eq!(updates[0].profile.website, "");
    assert_eq!(
        updates[0].avatar,
        Some(TestImageTransform::expected_output(b"img1"))
    );
    assert_eq!(runtime.editor().success_message(), Some("Profile updated"));
}

#[tokio::test]
async fn candidate_count_tracks_successful_compressions() {
    let stubs = StubServices::new();
    stubs.images.push_outcome(StubOutcome::Succeed);
    stubs
        .images
        .push_outcome(StubOutcome::Fail(TransformError::Decode("truncated".into())));
    stubs.images.push_outcome(StubOutcome::Succeed);
    let mut runtime = loaded_runtime(&stubs).await;

    stage(
        &mut runtime,
        &[file("a.png", b"a"), file("b.png", b"b"), file("c.png", b"c")],
    )
    .await;

    let candidates = runtime.editor().candidates();
    assert_eq!(stubs.images.call_count(), 3);
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates.iter().filter(|c| candidates.is_selected(c.id())).count(), 1);
    assert_eq!(
        candidates.selected().map(|c| c.file_name()),
        Some("c.png")
    );
}

#[tokio::test]
async fn failed_compression_keeps_previous_selection() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;
    stage(&mut runtime, &[file("good.png", b"ok")]).await;
    let shown = runtime.editor().avatar_display();

    stubs
        .images
        .push_outcome(StubOutcome::Fail(TransformError::Decode("bad header".into())));
    stage(&mut runtime, &[file("bad.png", b"??")]).await;

    assert_eq!(runtime.editor().candidates().len(), 1);
    assert_eq!(runtime.editor().avatar_display(), shown);
    let error = runtime.editor().error().expect("error surfaced");
    assert!(error.contains("bad.png"));
    assert!(error.contains("bad header"));
}

#[tokio::test]
async fn removing_last_candidate_falls_back_to_stored_avatar() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;
    stage(&mut runtime, &[file("only.png", b"x")]).await;
    let only = runtime.editor().candidates().selected_id().expect("selected");

    runtime.remove_candidate(only);

    assert!(runtime.editor().candidates().is_empty());
    assert_eq!(runtime.editor().candidates().selected_id(), None);
    assert_eq!(
        runtime.editor().avatar_display(),
        AvatarDisplay::Stored("/a.png".into())
    );
    assert_eq!(runtime.editor().previews().live_count(), 0);
}

#[tokio::test]
async fn removing_selected_promotes_another_candidate() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;
    stage(
        &mut runtime,
        &[file("a.png", b"a"), file("b.png", b"b"), file("c.png", b"c")],
    )
    .await;
    let ids = runtime.editor().candidates().ids();

    runtime.remove_candidate(ids[2]);

    let selected = runtime.editor().candidates().selected_id();
    assert!(selected.is_some());
    assert_ne!(selected, Some(ids[2]));
    assert_eq!(selected, Some(ids[0]));
}

#[tokio::test]
async fn removing_unselected_candidate_keeps_display() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;
    stage(&mut runtime, &[file("a.png", b"a"), file("b.png", b"b")]).await;
    let ids = runtime.editor().candidates().ids();
    let shown = runtime.editor().avatar_display();

    runtime.remove_candidate(ids[0]);

    assert_eq!(runtime.editor().avatar_display(), shown);
    assert_eq!(runtime.editor().candidates().ids(), vec![ids[1]]);
}

#[tokio::test]
async fn selecting_candidate_changes_display_only() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;
    stage(&mut runtime, &[file("a.png", b"a"), file("b.png", b"b")]).await;
    let first = runtime.editor().candidates().ids()[0];
    runtime.drain_events();

    runtime.select_candidate(first);

    let editor = runtime.editor();
    let expected = editor.candidates().get(first).map(|c| c.preview_url().clone());
    assert_eq!(
        editor.avatar_display(),
        AvatarDisplay::Preview(expected.expect("candidate exists"))
    );
    assert_eq!(runtime.in_flight(), 0);
    assert_eq!(runtime.drain_events().len(), 1);
}

#[tokio::test]
async fn unknown_candidate_ids_are_ignored() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;
    stage(&mut runtime, &[file("a.png", b"a")]).await;
    let before = runtime.editor().candidates().ids();
    let stranger = profile_model::CandidateId::new();

    runtime.select_candidate(stranger);
    runtime.remove_candidate(stranger);

    assert_eq!(runtime.editor().candidates().ids(), before);
    assert_eq!(runtime.editor().candidates().selected_id(), Some(before[0]));
}

#[tokio::test]
async fn edited_fields_merge_into_submitted_profile() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;

    runtime.edit_field(ProfileField::FullName, "Alice");
    assert_eq!(runtime.editor().profile().unwrap().full_name, "Bob");
    runtime.save();
    runtime.run_until_idle().await;

    let updates = stubs.profiles.updates();
    assert_eq!(updates.len(), 1);
    let submitted = &updates[0];
    assert_eq!(submitted.profile.full_name, "Alice");
    assert_eq!(submitted.profile.website, bob().website);
    assert_eq!(submitted.profile.avatar_url, bob().avatar_url);
    assert_eq!(submitted.avatar, None);

    assert_eq!(runtime.editor().profile().unwrap().full_name, "Alice");
}

#[tokio::test]
async fn save_without_profile_is_a_no_op() {
    let stubs = StubServices::new();
    let mut runtime = EditorRuntime::new(common::editor(&stubs));
    runtime.load_profile("nobody@x.com");
    runtime.run_until_idle().await;
    assert!(runtime.editor().profile().is_none());

    runtime.save();
    runtime.run_until_idle().await;

    assert!(stubs.profiles.updates().is_empty());
    assert!(!runtime.editor().is_saving());
}

#[tokio::test]
async fn failed_save_keeps_canonical_profile() {
    let stubs = StubServices::new();
    stubs
        .profiles
        .fail_next_update(StoreError::Rejected {
            status: 422,
            message: "website must be a URL".into(),
        });
    let mut runtime = loaded_runtime(&stubs).await;

    runtime.edit_field(ProfileField::Website, "not a url");
    runtime.save();
    runtime.run_until_idle().await;

    let editor = runtime.editor();
    assert_eq!(editor.profile(), Some(bob()));
    assert_eq!(editor.draft().website, "not a url");
    assert!(editor.error().unwrap().contains("website must be a URL"));
    assert_eq!(editor.success_message(), None);
    assert!(!editor.is_saving());
}

#[tokio::test]
async fn second_save_while_saving_is_rejected() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;

    runtime.save();
    runtime.save();
    assert_eq!(runtime.in_flight(), 1);
    runtime.run_until_idle().await;

    assert_eq!(stubs.profiles.updates().len(), 1);
}

#[tokio::test]
async fn selected_candidate_stays_unsaved_after_commit() {
    let stubs = StubServices::new();
    let mut runtime = loaded_runtime(&stubs).await;
    assert!(!runtime.editor().has_unsaved_changes());

    stage(&mut runtime, &[file("a.png", b"a")]).await;
    runtime.edit_field(ProfileField::FullName, "Alice");
    assert!(runtime.editor().has_unsaved_changes());

    runtime.save();
    runtime.run_until_idle().await;

    let editor = runtime.editor();
    assert!(editor.success_message().is_some());
    assert_eq!(editor.draft().full_name, "Alice");
    assert!(editor.candidates().selected().is_some());
    assert!(editor.has_unsaved_changes());
}
