use log::{debug, info};
use sha2::{Digest, Sha256};

use super::dto::{RaffleKind, SelectionResult};
use super::error::RaffleError;
use crate::helpers::utils::current_timestamp_millis;
use crate::twitter::dto::Participant;

/// Number of trailing seed characters that feed the ordering
pub const SEED_TAIL_LEN: usize = 8;

/// Seed to use for a draw. Without a transaction hash the current time in
/// milliseconds stands in. The hash is used verbatim, whitespace included.
pub fn resolve_seed(seed: Option<&str>) -> String {
    match seed.filter(|s| !s.is_empty()) {
        Some(seed) => seed.to_string(),
        None => current_timestamp_millis().to_string(),
    }
}

fn seed_tail(seed: &str) -> &str {
    let start = seed
        .char_indices()
        .rev()
        .nth(SEED_TAIL_LEN - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &seed[start..]
}

/// The value mixed into every participant hash.
///
/// The seed's last eight characters are read as a base-16 integer the way
/// JavaScript's `parseInt(tail, 16)` reads them: leading whitespace, an
/// optional sign and an optional `0x`/`0X` prefix are skipped, then hex
/// digits are consumed up to the first other character. The number is
/// rendered in decimal, or as `NaN` when no digit could be read.
pub fn seed_value(seed: &str) -> String {
    let tail = seed_tail(seed).trim_start();

    let (negative, unsigned) = match tail.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, tail.strip_prefix('+').unwrap_or(tail)),
    };

    let digits = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
        .unwrap_or(unsigned);

    let hex_len = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_hexdigit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    match u64::from_str_radix(&digits[..hex_len], 16) {
        Ok(value) if negative && value != 0 => format!("-{}", value),
        Ok(value) => value.to_string(),
        Err(_) => "NaN".to_string(),
    }
}

/// First 32 bits of `SHA-256(id ++ seed_value)`.
pub fn sort_key(participant_id: &str, seed_value: &str) -> u32 {
    let digest = Sha256::digest(format!("{}{}", participant_id, seed_value).as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Order the whole pool by sort key. Equal keys keep fetch order.
pub fn rank_participants(participants: &[Participant], seed: &str) -> Vec<Participant> {
    let value = seed_value(seed);

    let mut keyed: Vec<(u32, &Participant)> = participants
        .iter()
        .map(|p| (sort_key(&p.id, &value), p))
        .collect();
    keyed.sort_by_key(|(key, _)| *key);

    keyed.into_iter().map(|(_, p)| p.clone()).collect()
}

/// Draw winners then backups from the participant pool.
///
/// Backups are truncated when the pool runs out; winners never are.
pub fn select_winners(
    participants: &[Participant],
    kind: RaffleKind,
    seed: Option<&str>,
    winner_count: usize,
    backup_count: usize,
) -> Result<SelectionResult, RaffleError> {
    if participants.is_empty() {
        return Err(RaffleError::NoParticipants(kind));
    }

    if participants.len() < winner_count {
        return Err(RaffleError::InsufficientParticipants {
            found: participants.len(),
            needed: winner_count,
        });
    }

    let seed = resolve_seed(seed);
    info!(
        "Using seed tail {} ({})",
        seed_tail(&seed),
        seed_value(&seed)
    );

    let ranked = rank_participants(participants, &seed);

    let winners_end = winner_count.min(ranked.len());
    let backups_end = winners_end.saturating_add(backup_count).min(ranked.len());

    let winners = ranked[..winners_end].to_vec();
    let backups = ranked[winners_end..backups_end].to_vec();

    debug!(
        "Selected {} winners and {} backups",
        winners.len(),
        backups.len()
    );

    Ok(SelectionResult {
        winners,
        backups,
        all_participants: participants.to_vec(),
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pool() -> Vec<Participant> {
        vec![
            Participant::new("1001", "alice"),
            Participant::new("1002", "bob"),
            Participant::new("1003", "carol"),
            Participant::new("1004", "dave"),
            Participant::new("1005", "erin"),
        ]
    }

    fn usernames(participants: &[Participant]) -> Vec<&str> {
        participants.iter().map(|p| p.username.as_str()).collect()
    }

    #[test]
    fn test_seed_value() {
        assert_eq!(seed_value("abcd1234"), "2882343476");
        assert_eq!(seed_value("0x9f8e7d6cabcd1234"), "2882343476");
        assert_eq!(seed_value("1700000000000"), "0");
        // Hex prefix stops at the first non-hex character
        assert_eq!(seed_value("12g45678"), "18");
        assert_eq!(seed_value("zzzzzzzz"), "NaN");
        assert_eq!(seed_value("ff"), "255");
    }

    #[test]
    fn test_seed_value_reads_like_parse_int() {
        // 0x prefix inside the tail is skipped
        assert_eq!(seed_value("0x123456"), "1193046");
        assert_eq!(seed_value("0xabc"), "2748");
        assert_eq!(seed_value("0X999"), "2457");
        // Prefix with nothing after it parses nothing
        assert_eq!(seed_value("0x"), "NaN");
        assert_eq!(seed_value("0xg"), "NaN");
        // Leading whitespace and sign
        assert_eq!(seed_value("  -ff"), "-255");
        assert_eq!(seed_value("+1f"), "31");
        assert_eq!(seed_value("-0"), "0");
        assert_eq!(seed_value(" "), "NaN");
    }

    #[test]
    fn test_short_prefixed_seeds_order_differently() {
        let participants: Vec<Participant> = (1..=6)
            .map(|i| Participant::new(format!("10{}", i), format!("user{}", i)))
            .collect();

        let abc = rank_participants(&participants, "0xabc");
        let nine = rank_participants(&participants, "0x999");
        let orders: Vec<Vec<String>> = [abc, nine]
            .into_iter()
            .map(|ranked| ranked.into_iter().map(|p| p.id).collect())
            .collect();

        assert_ne!(seed_value("0xabc"), seed_value("0x999"));
        assert_ne!(orders[0], orders[1]);
    }

    #[test]
    fn test_sort_key() {
        // sha256("10012882343476") = 12b9db82...
        assert_eq!(sort_key("1001", "2882343476"), 0x12b9db82);
    }

    #[test]
    fn test_fixed_seed_fixture() {
        let result = select_winners(&pool(), RaffleKind::Likes, Some("abcd1234"), 2, 1).unwrap();

        assert_eq!(usernames(&result.winners), vec!["erin", "alice"]);
        assert_eq!(usernames(&result.backups), vec!["dave"]);
        assert_eq!(result.all_participants, pool());
        assert_eq!(result.seed, "abcd1234");
    }

    #[test]
    fn test_full_ranking_fixture() {
        let ranked = rank_participants(&pool(), "0xdeadbeef");
        assert_eq!(
            usernames(&ranked),
            vec!["carol", "erin", "alice", "bob", "dave"]
        );
    }

    #[test]
    fn test_determinism() {
        let first = select_winners(&pool(), RaffleKind::Likes, Some("0xfeed"), 2, 2).unwrap();
        for _ in 0..10 {
            let again = select_winners(&pool(), RaffleKind::Likes, Some("0xfeed"), 2, 2).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_disjoint_subsets_and_sizes() {
        let participants = pool();
        let ids: HashSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();

        for winner_count in 1..=participants.len() {
            for backup_count in 0..=6 {
                let result = select_winners(
                    &participants,
                    RaffleKind::Retweets,
                    Some("abcd1234"),
                    winner_count,
                    backup_count,
                )
                .unwrap();

                let winners: HashSet<&str> = result.winners.iter().map(|p| p.id.as_str()).collect();
                let backups: HashSet<&str> = result.backups.iter().map(|p| p.id.as_str()).collect();

                assert!(winners.is_disjoint(&backups));
                assert!(winners.is_subset(&ids));
                assert!(backups.is_subset(&ids));
                assert_eq!(result.winners.len(), winner_count);
                assert_eq!(
                    result.backups.len(),
                    backup_count.min(participants.len() - winner_count)
                );
            }
        }
    }

    #[test]
    fn test_seed_sensitivity() {
        let seeds = ["abcd1234", "0xdeadbeef", "1700000000000", "ffffffff", "00000001"];
        let orderings: HashSet<Vec<String>> = seeds
            .iter()
            .map(|seed| {
                rank_participants(&pool(), seed)
                    .into_iter()
                    .map(|p| p.id)
                    .collect()
            })
            .collect();

        assert!(orderings.len() > 1);
    }

    #[test]
    fn test_equal_keys_keep_fetch_order() {
        // Same id means same key
        let participants = vec![
            Participant::new("1", "first"),
            Participant::new("1", "second"),
            Participant::new("1", "third"),
        ];

        let ranked = rank_participants(&participants, "abcd1234");
        assert_eq!(usernames(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_no_participants() {
        let err = select_winners(&[], RaffleKind::Likes, Some("abcd1234"), 1, 0).unwrap_err();
        assert!(matches!(err, RaffleError::NoParticipants(RaffleKind::Likes)));
        assert!(err.to_string().contains("liked"));

        let err = select_winners(&[], RaffleKind::Retweets, None, 1, 0).unwrap_err();
        assert!(err.to_string().contains("retweeted"));
    }

    #[test]
    fn test_insufficient_participants() {
        let err = select_winners(&pool()[..3], RaffleKind::Likes, Some("abcd1234"), 10, 0)
            .unwrap_err();
        assert_eq!(err.to_string(), "Not enough participants. Found 3, need 10");
    }

    #[test]
    fn test_missing_seed_falls_back_to_timestamp() {
        let result = select_winners(&pool(), RaffleKind::Likes, None, 1, 0).unwrap();
        assert!(result.seed.parse::<u128>().is_ok());
        assert_eq!(result.winners.len(), 1);

        assert_eq!(resolve_seed(Some("")).len(), result.seed.len());
        assert_eq!(resolve_seed(Some("  ")), "  ");
        assert_eq!(resolve_seed(Some("0xabc")), "0xabc");
    }
}
