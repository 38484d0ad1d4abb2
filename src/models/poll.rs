use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, VoteError};

/// One accepted vote: who voted and which option they picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub name: String,
    pub option: String,
}

/// The sole persistent entity. Created once by the creation flow, persisted
/// immediately, then mutated in place by each accepted vote. `id`, `question`
/// and `options` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub votes: Vec<u32>, // index-aligned with options
    pub voters: Vec<Voter>,
    #[serde(rename = "createdAt")]
    pub created_at: i64, // epoch millis, validity check on load
}

/// Reduced projection embedded in share links. The poll id travels in the URL
/// path, not in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSnapshot {
    pub question: String,
    pub options: Vec<String>,
    pub votes: Vec<u32>,
    pub voters: Vec<Voter>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl Poll {
    /// Validates the creation input and builds a draft poll: fresh id and
    /// timestamp, zeroed tallies, no voters. The poll stays in memory until the
    /// caller publishes it through the store.
    pub fn new(question: &str, options: &[String]) -> Result<Self, ValidationError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        if options.len() < 2 {
            return Err(ValidationError::TooFewOptions {
                found: options.len(),
            });
        }

        let mut trimmed = Vec::with_capacity(options.len());
        for (index, option) in options.iter().enumerate() {
            let option = option.trim();
            if option.is_empty() {
                return Err(ValidationError::EmptyOption { index });
            }
            trimmed.push(option.to_string());
        }

        Ok(Poll {
            id: new_poll_id(),
            question: question.to_string(),
            votes: vec![0; trimmed.len()],
            options: trimmed,
            voters: Vec::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Records a single vote: bumps the tally for `option` and appends the
    /// voter. All checks run before any mutation, so a rejected vote leaves the
    /// poll exactly as it was. Performs no I/O; the caller persists the updated
    /// poll through the store.
    pub fn cast_vote(&mut self, name: &str, option: &str) -> Result<(), VoteError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VoteError::EmptyName);
        }

        let index = self
            .options
            .iter()
            .position(|candidate| candidate == option)
            .ok_or(VoteError::NoSelection)?;

        // One vote per name, compared case-insensitively.
        let lowered = name.to_lowercase();
        if self
            .voters
            .iter()
            .any(|voter| voter.name.to_lowercase() == lowered)
        {
            return Err(VoteError::DuplicateVoter);
        }

        self.votes[index] += 1;
        self.voters.push(Voter {
            name: name.to_string(),
            option: option.to_string(),
        });

        Ok(())
    }

    /// Total number of accepted votes.
    pub fn total_votes(&self) -> u32 {
        self.votes.iter().sum()
    }

    /// Last `count` voters, most recent first, for the recent-votes panel.
    pub fn recent_voters(&self, count: usize) -> Vec<&Voter> {
        self.voters.iter().rev().take(count).collect()
    }

    /// Structural validity check applied to records loaded from the store or a
    /// share link. Hand-edited or foreign data that breaks the tally alignment
    /// is treated as absent rather than trusted.
    pub fn is_consistent(&self) -> bool {
        if self.created_at <= 0 || self.question.is_empty() || self.options.len() < 2 {
            return false;
        }
        if self.votes.len() != self.options.len() {
            return false;
        }
        if self.total_votes() as usize != self.voters.len() {
            return false;
        }

        let mut seen: Vec<String> = Vec::with_capacity(self.voters.len());
        for voter in &self.voters {
            let lowered = voter.name.to_lowercase();
            if seen.contains(&lowered) {
                return false;
            }
            seen.push(lowered);
        }

        true
    }

    pub fn snapshot(&self) -> PollSnapshot {
        PollSnapshot {
            question: self.question.clone(),
            options: self.options.clone(),
            votes: self.votes.clone(),
            voters: self.voters.clone(),
            created_at: self.created_at,
        }
    }
}

impl PollSnapshot {
    /// Reattaches the id carried by the URL path to produce a full record.
    pub fn into_poll(self, id: &str) -> Poll {
        Poll {
            id: id.to_string(),
            question: self.question,
            options: self.options,
            votes: self.votes,
            voters: self.voters,
            created_at: self.created_at,
        }
    }
}

/// Client-generated identifier: base36 creation millis plus a random suffix
/// drawn from a v4 UUID. Unique with high probability, never verified against
/// other clients.
pub fn new_poll_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u128;
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", to_base36(millis), &suffix[..10])
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}
