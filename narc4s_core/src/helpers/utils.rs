use regex::Regex;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

static STATUS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:twitter\.com|x\.com)/\w+/status/(\d+)").expect("status url pattern")
});

static BARE_TWEET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{15,20})").expect("bare tweet id pattern"));

/// Pull the tweet id out of a twitter.com / x.com permalink.
///
/// Falls back to the first run of 15-20 digits so that pasted ids and
/// mobile share links still resolve.
pub fn extract_tweet_id(url: &str) -> Option<String> {
    if let Some(captures) = STATUS_URL.captures(url) {
        return Some(captures.get(1)?.as_str().to_string());
    }

    BARE_TWEET_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Milliseconds since the unix epoch
pub fn current_timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tweet_id() {
        // Both supported domains
        assert_eq!(
            extract_tweet_id("https://x.com/foo/status/42"),
            Some("42".to_string())
        );
        assert_eq!(
            extract_tweet_id("https://twitter.com/narc4s/status/1790000000000000001?s=20"),
            Some("1790000000000000001".to_string())
        );

        // Bare id
        assert_eq!(
            extract_tweet_id("1790000000000000001"),
            Some("1790000000000000001".to_string())
        );

        // Nothing usable
        assert_eq!(extract_tweet_id("https://example.com/foo/status/abc"), None);
        assert_eq!(extract_tweet_id("https://x.com/foo"), None);
        assert_eq!(extract_tweet_id(""), None);
    }

    #[test]
    fn test_short_digit_runs_need_a_permalink() {
        assert_eq!(extract_tweet_id("https://example.com/123456"), None);
        assert_eq!(
            extract_tweet_id("https://example.com/status/12345"),
            None
        );
    }

    #[test]
    fn test_current_timestamp_millis() {
        // Some time after 2023-11-14
        assert!(current_timestamp_millis() > 1_700_000_000_000);
    }
}
