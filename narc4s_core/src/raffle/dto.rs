use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use utoipa::ToSchema;

use super::error::RaffleError;
use crate::helpers::utils::extract_tweet_id;
use crate::twitter::dto::Participant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RaffleKind {
    Likes,
    Retweets,
    Comments,
}

impl RaffleKind {
    pub fn label(&self) -> &'static str {
        match self {
            RaffleKind::Likes => "Likes",
            RaffleKind::Retweets => "Retweets",
            RaffleKind::Comments => "Comments (soon)",
        }
    }
}

impl TryFrom<i64> for RaffleKind {
    type Error = RaffleError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RaffleKind::Likes),
            1 => Ok(RaffleKind::Retweets),
            2 => Ok(RaffleKind::Comments),
            _ => Err(RaffleError::InvalidRaffleType),
        }
    }
}

impl fmt::Display for RaffleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Body of `POST /api/process-raffle` as sent by the frontend.
///
/// Numeric fields arrive either as JSON numbers or numeric strings, so they
/// are kept loose here and checked when converting into a [`RaffleRequest`].
#[derive(Deserialize, Serialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRaffleRequest {
    #[schema(value_type = Option<Object>)]
    pub raffle_id: Option<Value>,
    pub tweet_url: Option<String>,
    /// `null` is kept as `Some(Value::Null)`; only an absent field is missing.
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<Object>)]
    pub raffle_type: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub winner_count: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub backup_count: Option<Value>,
    pub transaction_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RaffleRequest {
    pub raffle_id: Value,
    pub tweet_url: String,
    pub tweet_id: String,
    pub kind: RaffleKind,
    pub winner_count: usize,
    pub backup_count: usize,
    pub seed: Option<String>,
}

impl TryFrom<ProcessRaffleRequest> for RaffleRequest {
    type Error = RaffleError;

    fn try_from(request: ProcessRaffleRequest) -> Result<Self, Self::Error> {
        let raffle_id = request
            .raffle_id
            .filter(is_truthy)
            .ok_or(RaffleError::MissingParameters)?;
        let tweet_url = request
            .tweet_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(RaffleError::MissingParameters)?;
        let raffle_type = request.raffle_type.ok_or(RaffleError::MissingParameters)?;
        let winner_count = request
            .winner_count
            .filter(is_truthy)
            .ok_or(RaffleError::MissingParameters)?;

        let tweet_id = extract_tweet_id(&tweet_url).ok_or(RaffleError::InvalidTweetUrl)?;

        let kind = parse_int(&raffle_type)
            .ok_or(RaffleError::InvalidRaffleType)
            .and_then(RaffleKind::try_from)?;

        if kind == RaffleKind::Comments {
            return Err(RaffleError::UnsupportedRaffleType);
        }

        let winner_count = parse_int(&winner_count)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(RaffleError::InvalidWinnerCount {
                min: super::handler::MIN_WINNERS,
                max: super::handler::MAX_WINNERS,
            })?;

        let backup_count = match request.backup_count {
            None => 0,
            Some(value) => parse_int(&value)
                .and_then(|n| usize::try_from(n).ok())
                .ok_or(RaffleError::InvalidBackupCount {
                    min: super::handler::MIN_BACKUPS,
                    max: super::handler::MAX_BACKUPS,
                })?,
        };

        let seed = request
            .transaction_hash
            .filter(|hash| !hash.is_empty());

        Ok(Self {
            raffle_id,
            tweet_url,
            tweet_id,
            kind,
            winner_count,
            backup_count,
            seed,
        })
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Winners and backups drawn from one fetched participant pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub winners: Vec<Participant>,
    pub backups: Vec<Participant>,
    pub all_participants: Vec<Participant>,
    /// The seed string actually used, after the timestamp fallback
    pub seed: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEntry {
    pub id: String,
    pub username: String,
    pub twitter_url: String,
}

impl From<&Participant> for ParticipantEntry {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.clone(),
            username: participant.username.clone(),
            twitter_url: participant.profile_url(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRaffleResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub raffle_id: Value,
    pub tweet_url: String,
    pub total_participants: usize,
    pub raffle_type: String,
    pub winners: Vec<ParticipantEntry>,
    pub backups: Vec<ParticipantEntry>,
    pub all_participants: Vec<String>,
}

impl From<(RaffleRequest, SelectionResult)> for ProcessRaffleResponse {
    fn from(outcome: (RaffleRequest, SelectionResult)) -> Self {
        let (request, selection) = outcome;
        Self {
            success: true,
            raffle_id: request.raffle_id,
            tweet_url: request.tweet_url,
            total_participants: selection.all_participants.len(),
            raffle_type: request.kind.label().to_string(),
            winners: selection.winners.iter().map(ParticipantEntry::from).collect(),
            backups: selection.backups.iter().map(ParticipantEntry::from).collect(),
            all_participants: selection
                .all_participants
                .into_iter()
                .map(|p| p.username)
                .collect(),
        }
    }
}
