use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use reqwest::{Client, StatusCode};
use std::{collections::HashSet, time::Duration};

use super::dto::{Participant, TwitterUsersResponse};
use super::error::{FetchError, RateLimitReset};
use crate::raffle::dto::RaffleKind;

pub const DEFAULT_TWITTER_API_URL: &str = "https://api.twitter.com";

const MAX_RESULTS: &str = "100";
const USER_FIELDS: &str = "id,username,name";
const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// Source of raffle participants for a tweet.
#[async_trait]
pub trait ParticipantFetcher: Send + Sync {
    async fn fetch(
        &self,
        tweet_id: &str,
        kind: RaffleKind,
    ) -> Result<Vec<Participant>, FetchError>;
}

/// Twitter v2 API client using an app-only bearer token.
#[derive(Clone)]
pub struct TwitterFetcher {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl TwitterFetcher {
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
        })
    }

    fn endpoint(&self, tweet_id: &str, kind: RaffleKind) -> Option<String> {
        let resource = match kind {
            RaffleKind::Likes => "liking_users",
            RaffleKind::Retweets => "retweeted_by",
            RaffleKind::Comments => return None,
        };

        Some(format!("{}/2/tweets/{}/{}", self.base_url, tweet_id, resource))
    }
}

#[async_trait]
impl ParticipantFetcher for TwitterFetcher {
    async fn fetch(
        &self,
        tweet_id: &str,
        kind: RaffleKind,
    ) -> Result<Vec<Participant>, FetchError> {
        let url = self.endpoint(tweet_id, kind).ok_or_else(|| {
            FetchError::Upstream("comments raffles are not supported".to_string())
        })?;

        info!("Fetching {} for tweet {}...", kind.label(), tweet_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[("max_results", MAX_RESULTS), ("user.fields", USER_FIELDS)])
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching {} for tweet {}: {}", kind.label(), tweet_id, e);
                FetchError::from(e)
            })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset = response
                .headers()
                .get(RATE_LIMIT_RESET_HEADER)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.parse::<i64>().ok());

            let reset = RateLimitReset::from_reset_header(reset, Utc::now());
            warn!(
                "Twitter API rate limit exceeded. Reset at {} ({} minutes)",
                reset.reset_at, reset.wait_minutes
            );
            return Err(FetchError::RateLimited(reset));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Twitter API returned {}: {}", status, error_text);
            return Err(FetchError::Upstream(format!(
                "Twitter API returned {}: {}",
                status, error_text
            )));
        }

        let body: TwitterUsersResponse = response.json().await?;

        if let Some(errors) = body.errors.as_ref() {
            for e in errors {
                warn!(
                    "Twitter API reported an error for tweet {}: {} {}",
                    tweet_id,
                    e.title.as_deref().unwrap_or_default(),
                    e.detail.as_deref().unwrap_or_default()
                );
            }
        }

        let users = body.data.unwrap_or_default();

        if users.is_empty() {
            info!("No {} found for tweet {}", kind.label().to_lowercase(), tweet_id);
            return Ok(vec![]);
        }

        let mut seen = HashSet::new();
        let participants: Vec<Participant> = users
            .into_iter()
            .filter(|u| seen.insert(u.id.clone()))
            .map(Participant::from)
            .collect();

        debug!("Fetched {} participants", participants.len());

        Ok(participants)
    }
}
