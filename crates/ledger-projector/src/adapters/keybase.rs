//! Keybase avatar lookup for validator identities.

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::AvatarConfig;
use crate::ports::{AvatarError, AvatarResolver};

/// Length of a keybase key suffix. Other identities are not looked up.
pub const KEY_SUFFIX_LEN: usize = 16;

#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: LookupStatus,
    #[serde(default)]
    them: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct LookupStatus {
    code: i64,
    #[serde(default)]
    desc: String,
}

#[derive(Debug, Deserialize)]
struct LookupUser {
    #[serde(default)]
    pictures: Option<Pictures>,
}

#[derive(Debug, Deserialize)]
struct Pictures {
    #[serde(default)]
    primary: Option<Picture>,
}

#[derive(Debug, Deserialize)]
struct Picture {
    url: String,
}

impl LookupResponse {
    fn into_avatar_url(self) -> Result<String, AvatarError> {
        if self.status.code != 0 {
            return Err(AvatarError::Status {
                code: self.status.code,
                desc: self.status.desc,
            });
        }

        Ok(self
            .them
            .into_iter()
            .next()
            .and_then(|user| user.pictures)
            .and_then(|pictures| pictures.primary)
            .map(|picture| picture.url)
            .unwrap_or_default())
    }
}

/// Resolves avatars through the keybase user lookup API.
pub struct KeybaseAvatarResolver {
    client: Client,
    endpoint: String,
}

impl KeybaseAvatarResolver {
    pub fn new(config: &AvatarConfig) -> Result<Self, AvatarError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AvatarError::Http)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

impl AvatarResolver for KeybaseAvatarResolver {
    fn avatar_url(&self, identity: &str) -> Result<String, AvatarError> {
        if identity.len() != KEY_SUFFIX_LEN {
            return Ok(String::new());
        }

        let response: LookupResponse = self
            .client
            .get(format!("{}/user/lookup.json", self.endpoint))
            .query(&[("key_suffix", identity), ("fields", "pictures")])
            .send()?
            .json()
            .map_err(|e| AvatarError::Parse(e.to_string()))?;

        let url = response.into_avatar_url()?;
        debug!(identity, found = !url.is_empty(), "avatar lookup finished");
        Ok(url)
    }
}
