use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use parking_lot::{Mutex, RwLock};
use profile_model::{Profile, TransformOptions};
use tokio_util::sync::CancellationToken;

use super::CallJournal;
use crate::errors::{
    AuthError, AuthResult, StoreError, StoreResult, TransformError,
    TransformResult,
};
use crate::infrastructure::services::profile_store::sniff_format;
use crate::infrastructure::services::{
    ImageTransform, Navigator, ProfileStore, SessionService,
};

/// Scripted result for the next `TestImageTransform::compress` call
#[derive(Debug, Clone)]
pub enum StubOutcome {
    Succeed,
    /// Succeed once `Duration` has elapsed unless cancelled first
    SucceedAfter(Duration),
    Fail(TransformError),
}

#[derive(Debug)]
pub struct TestImageTransform {
    script: Mutex<VecDeque<StubOutcome>>,
    sources: Mutex<Vec<Bytes>>,
    tokens: Mutex<Vec<CancellationToken>>,
    journal: CallJournal,
}

impl TestImageTransform {
    pub fn new(journal: CallJournal) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            sources: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            journal,
        }
    }

    /// Queue the outcome of an upcoming call; unscripted calls succeed
    pub fn push_outcome(&self, outcome: StubOutcome) {
        self.script.lock().push_back(outcome);
    }

    /// What a successful call returns for `source`
    pub fn expected_output(source: &[u8]) -> Bytes {
        let mut out = BytesMut::with_capacity(source.len() + 5);
        out.put_slice(b"webp:");
        out.put_slice(source);
        out.freeze()
    }

    pub fn call_count(&self) -> usize {
        self.sources.lock().len()
    }

    /// Number of calls whose cancellation token has fired
    pub fn cancelled_count(&self) -> usize {
        self.tokens
            .lock()
            .iter()
            .filter(|token| token.is_cancelled())
            .count()
    }
}

#[async_trait]
impl ImageTransform for TestImageTransform {
    async fn compress(
        &self,
        source: Bytes,
        _options: &TransformOptions,
        cancel: CancellationToken,
    ) -> TransformResult<Bytes> {
        self.sources.lock().push(source.clone());
        self.tokens.lock().push(cancel.clone());
        self.journal.record("images.compress");

        let outcome = self
            .script
            .lock()
            .pop_front()
            .unwrap_or(StubOutcome::Succeed);

        match outcome {
            StubOutcome::Succeed => Ok(Self::expected_output(&source)),
            StubOutcome::SucceedAfter(delay) => {
                tokio::select! {
                    _ = cancel.cancelled() => Err(TransformError::Cancelled),
                    _ = tokio::time::sleep(delay) => {
                        Ok(Self::expected_output(&source))
                    }
                }
            }
            StubOutcome::Fail(err) => Err(err),
        }
    }
}

/// One `ProfileStore::update` call as seen by the stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpdate {
    pub profile: Profile,
    pub avatar: Option<Bytes>,
}

#[derive(Debug)]
pub struct TestProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
    updates: Mutex<Vec<RecordedUpdate>>,
    failures: Mutex<VecDeque<StoreError>>,
    update_delay: Mutex<Option<Duration>>,
    journal: CallJournal,
}

impl TestProfileStore {
    pub fn new(journal: CallJournal) -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            updates: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
            update_delay: Mutex::new(None),
            journal,
        }
    }

    pub fn insert(&self, profile: Profile) {
        self.profiles
            .write()
            .insert(profile.username.clone(), profile);
    }

    pub fn stored(&self, username: &str) -> Option<Profile> {
        self.profiles.read().get(username).cloned()
    }

    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().clone()
    }

    pub fn fail_next_update(&self, err: StoreError) {
        self.failures.lock().push_back(err);
    }

    /// Make every update take `delay` before answering
    pub fn set_update_delay(&self, delay: Duration) {
        *self.update_delay.lock() = Some(delay);
    }
}

#[async_trait]
impl ProfileStore for TestProfileStore {
    async fn get(&self, username: &str) -> StoreResult<Option<Profile>> {
        self.journal.record("profiles.get");
        Ok(self.stored(username))
    }

    async fn update(
        &self,
        profile: Profile,
        avatar: Option<Bytes>,
    ) -> StoreResult<()> {
        self.journal.record("profiles.update:start");
        self.updates.lock().push(RecordedUpdate {
            profile: profile.clone(),
            avatar: avatar.clone(),
        });

        let delay = *self.update_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().pop_front();
        if let Some(err) = failure {
            self.journal.record("profiles.update:failed");
            return Err(err);
        }

        let mut stored = profile;
        if let Some(avatar) = &avatar {
            let format = sniff_format(avatar).unwrap_or_default();
            stored.avatar_url =
                format!("/avatars/{}.{}", stored.username, format.extension());
        }
        self.insert(stored);
        self.journal.record("profiles.update:done");
        Ok(())
    }
}

#[derive(Debug)]
pub struct TestSessionService {
    sign_outs: Mutex<usize>,
    failures: Mutex<VecDeque<AuthError>>,
    journal: CallJournal,
}

impl TestSessionService {
    pub fn new(journal: CallJournal) -> Self {
        Self {
            sign_outs: Mutex::new(0),
            failures: Mutex::new(VecDeque::new()),
            journal,
        }
    }

    pub fn fail_next_sign_out(&self, err: AuthError) {
        self.failures.lock().push_back(err);
    }

    pub fn sign_out_count(&self) -> usize {
        *self.sign_outs.lock()
    }
}

#[async_trait]
impl SessionService for TestSessionService {
    async fn sign_out(&self) -> AuthResult<()> {
        *self.sign_outs.lock() += 1;
        self.journal.record("session.sign_out");

        let failure = self.failures.lock().pop_front();
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
    journal: CallJournal,
}

impl RecordingNavigator {
    pub fn new(journal: CallJournal) -> Self {
        Self {
            paths: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, path: &str) {
        self.journal.record(format!("navigate:{path}"));
        self.paths.lock().push(path.to_string());
    }
}
