use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::ports::{AvatarError, AvatarResolver};

/// Avatar resolver backed by a fixed identity table, for testing.
///
/// Unknown identities resolve to an empty URL. Identities registered with
/// [`fail`](Self::fail) return an error status, like an identity service
/// rejecting a malformed key suffix.
#[derive(Default)]
pub struct StaticAvatarResolver {
    avatars: RwLock<BTreeMap<String, String>>,
    failing: RwLock<BTreeSet<String>>,
    lookups: AtomicUsize,
}

impl StaticAvatarResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        identity: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<(), AvatarError> {
        self.avatars
            .write()
            .map_err(|_| AvatarError::LockPoisoned)?
            .insert(identity.into(), url.into());
        Ok(())
    }

    pub fn fail(&self, identity: impl Into<String>) -> Result<(), AvatarError> {
        self.failing
            .write()
            .map_err(|_| AvatarError::LockPoisoned)?
            .insert(identity.into());
        Ok(())
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl AvatarResolver for StaticAvatarResolver {
    fn avatar_url(&self, identity: &str) -> Result<String, AvatarError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let rejected = self
            .failing
            .read()
            .map_err(|_| AvatarError::LockPoisoned)?
            .contains(identity);
        if rejected {
            return Err(AvatarError::Status {
                code: 100,
                desc: format!("bad key suffix {identity:?}"),
            });
        }

        Ok(self
            .avatars
            .read()
            .map_err(|_| AvatarError::LockPoisoned)?
            .get(identity)
            .cloned()
            .unwrap_or_default())
    }
}
