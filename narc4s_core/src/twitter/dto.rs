use serde::{Deserialize, Serialize};

/// A single account taking part in a raffle.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            name: String::new(),
        }
    }

    pub fn profile_url(&self) -> String {
        format!("https://twitter.com/{}", self.username)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TwitterUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TwitterApiError {
    pub title: Option<String>,
    pub detail: Option<String>,
}

/// Envelope of `liking_users` / `retweeted_by`. `data` is omitted when
/// nobody engaged with the tweet.
#[derive(Debug, Serialize, Deserialize)]
pub struct TwitterUsersResponse {
    pub data: Option<Vec<TwitterUser>>,
    pub errors: Option<Vec<TwitterApiError>>,
}

impl From<TwitterUser> for Participant {
    fn from(user: TwitterUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
        }
    }
}
