use thiserror::Error;

use super::dto::RaffleKind;
use crate::twitter::error::FetchError;

#[derive(Debug, Error)]
pub enum RaffleError {
    #[error("Missing required parameters")]
    MissingParameters,
    #[error("Invalid tweet URL")]
    InvalidTweetUrl,
    #[error("Comments raffle feature is coming soon! Please use Likes or Retweets for now.")]
    UnsupportedRaffleType,
    #[error("Invalid raffle type")]
    InvalidRaffleType,
    #[error("Winner count must be between {min} and {max}")]
    InvalidWinnerCount { min: usize, max: usize },
    #[error("Backup count must be between {min} and {max}")]
    InvalidBackupCount { min: usize, max: usize },
    #[error("{}", no_participants_message(.0))]
    NoParticipants(RaffleKind),
    #[error("Not enough participants. Found {found}, need {needed}")]
    InsufficientParticipants { found: usize, needed: usize },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

fn no_participants_message(kind: &RaffleKind) -> &'static str {
    match kind {
        RaffleKind::Likes => {
            "No users found who liked this tweet. The tweet might be private or have no likes."
        }
        RaffleKind::Retweets => {
            "No users found who retweeted this tweet. The tweet might be private or have no retweets."
        }
        RaffleKind::Comments => "No users found who commented on this tweet.",
    }
}

impl RaffleError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RaffleError::Fetch(FetchError::RateLimited(_)))
    }
}
