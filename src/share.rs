use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::error::StorageError;
use crate::models::poll::{Poll, PollSnapshot};
use crate::store::PollStore;

const PRODUCTION_BASE_URL: &str = "https://pollsharelive.vercel.app";
const DEVELOPMENT_BASE_URL: &str = "http://localhost:5173";

/// Query parameter carrying the base64-encoded poll state on share links.
pub const DATA_PARAM: &str = "data";

/// Base origin for shareable links. A configuration value, not a computed one:
/// the deployed origin in release builds, the local dev origin otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareConfig {
    pub base_url: String,
}

impl ShareConfig {
    pub fn production() -> Self {
        ShareConfig {
            base_url: PRODUCTION_BASE_URL.to_string(),
        }
    }

    pub fn development() -> Self {
        ShareConfig {
            base_url: DEVELOPMENT_BASE_URL.to_string(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ShareConfig::development()
        } else {
            ShareConfig::production()
        }
    }
}

/// Plain link to the poll's view route: `{base}/poll/{id}`.
pub fn shareable_url(config: &ShareConfig, id: &str) -> String {
    format!("{}/poll/{}", config.base_url, id)
}

/// Link that additionally embeds the poll's current state, so a recipient with
/// an empty store can still reconstruct the poll.
pub fn shareable_url_with_data(config: &ShareConfig, poll: &Poll) -> Result<String, StorageError> {
    let encoded = encode_snapshot(&poll.snapshot())?;
    Ok(format!(
        "{}/poll/{}?{}={}",
        config.base_url, poll.id, DATA_PARAM, encoded
    ))
}

pub fn encode_snapshot(snapshot: &PollSnapshot) -> Result<String, StorageError> {
    let json = serde_json::to_string(snapshot)?;
    Ok(URL_SAFE_NO_PAD.encode(json.as_bytes()))
}

/// Decodes the `data` parameter of a share link. Malformed payloads are logged
/// and dropped rather than surfaced as errors.
pub fn decode_embedded(data: &str) -> Option<PollSnapshot> {
    let bytes = match URL_SAFE_NO_PAD.decode(data.as_bytes()) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("Failed to base64-decode embedded poll data: {err}");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            log::warn!("Failed to parse embedded poll data: {err}");
            return None;
        }
    }
}

/// Loads the poll to display. The store is authoritative; data embedded in the
/// URL is consulted only when the store has no record, and a usable embedded
/// record is written into the store so later loads no longer depend on the
/// link. Returns `None` when neither source yields a valid poll, in which case
/// the caller redirects to the creation flow.
pub fn resolve_poll(store: &PollStore, id: &str, embedded: Option<&str>) -> Option<Poll> {
    if let Some(poll) = store.get(id) {
        return Some(poll);
    }

    let snapshot = embedded.and_then(decode_embedded)?;
    let poll = snapshot.into_poll(id);
    if !poll.is_consistent() {
        log::warn!("Discarding inconsistent embedded record for poll {id}");
        return None;
    }

    // Seed the store for future loads; the poll is still usable if this fails.
    if let Err(err) = store.save(id, &poll) {
        log::warn!("Failed to seed store from share link for poll {id}: {err}");
    }

    Some(poll)
}
