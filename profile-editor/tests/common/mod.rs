//! Shared fixtures for editor integration tests

#![allow(dead_code)]

use bytes::Bytes;
use profile_editor::domains::profile::{
    EditorSettings, ProfileContext, ProfileEditor, SelectedFile,
};
use profile_editor::infrastructure::testing::StubServices;
use profile_editor::EditorRuntime;
use profile_model::Profile;

pub const BOB: &str = "bob@x.com";

pub fn bob() -> Profile {
    Profile::new(BOB).with_full_name("Bob").with_avatar_url("/a.png")
}

pub fn file(name: &str, contents: &'static [u8]) -> SelectedFile {
    SelectedFile::new(name, Bytes::from_static(contents))
}

pub fn editor(stubs: &StubServices) -> ProfileEditor {
    ProfileEditor::new(
        ProfileContext::default(),
        stubs.services(),
        EditorSettings::default(),
    )
}

/// Runtime with bob's profile stored and already loaded
pub async fn loaded_runtime(stubs: &StubServices) -> EditorRuntime {
    stubs.profiles.insert(bob());
    let mut runtime = EditorRuntime::new(editor(stubs));
    runtime.load_profile(BOB);
    runtime.run_until_idle().await;
    runtime
}

/// Stage `files` one after another so candidate order matches input order
pub async fn stage(runtime: &mut EditorRuntime, files: &[SelectedFile]) {
    for file in files {
        runtime.select_file(Some(file.clone()));
        runtime.run_until_idle().await;
    }
}
