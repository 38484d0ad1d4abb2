//! PollShare core: poll creation and vote tallying, a key-value poll store,
//! and shareable links that can carry the poll's state to a recipient whose
//! store has never seen it.
//!
//! A poll is a draft while it only exists in memory; `PollStore::save`
//! publishes it, after which the only mutation is `Poll::cast_vote` followed by
//! a re-save. Presentation concerns (forms, charts, QR codes) live outside this
//! crate.

pub mod error;
pub mod models;
pub mod share;
pub mod store;

pub use error::{StorageError, ValidationError, VoteError};
pub use models::poll::{Poll, PollSnapshot, Voter};
pub use share::{resolve_poll, shareable_url, shareable_url_with_data, ShareConfig};
pub use store::PollStore;
