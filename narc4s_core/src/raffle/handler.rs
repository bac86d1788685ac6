use log::info;

use super::dto::{RaffleKind, RaffleRequest, SelectionResult};
use super::error::RaffleError;
use super::selector::select_winners;
use crate::twitter::fetcher::ParticipantFetcher;

pub const MIN_WINNERS: usize = 1;
pub const MAX_WINNERS: usize = 50;
pub const MIN_BACKUPS: usize = 0;
pub const MAX_BACKUPS: usize = 20;

/// Check a raffle request, fetch its participants and draw the result.
///
/// The tweet URL and raffle kind are first checked while building the
/// [`RaffleRequest`]; they are re-checked here for requests built directly.
/// Every validation failure returns before the fetcher is called.
pub async fn run_raffle(
    fetcher: &dyn ParticipantFetcher,
    request: &RaffleRequest,
) -> Result<SelectionResult, RaffleError> {
    let tweet_id = request.tweet_id.as_str();
    if tweet_id.is_empty() {
        return Err(RaffleError::InvalidTweetUrl);
    }

    if request.kind == RaffleKind::Comments {
        return Err(RaffleError::UnsupportedRaffleType);
    }

    if !(MIN_WINNERS..=MAX_WINNERS).contains(&request.winner_count) {
        return Err(RaffleError::InvalidWinnerCount {
            min: MIN_WINNERS,
            max: MAX_WINNERS,
        });
    }

    if !(MIN_BACKUPS..=MAX_BACKUPS).contains(&request.backup_count) {
        return Err(RaffleError::InvalidBackupCount {
            min: MIN_BACKUPS,
            max: MAX_BACKUPS,
        });
    }

    info!(
        "Processing raffle {} for tweet {}, type: {}",
        request.raffle_id, tweet_id, request.kind
    );
    info!(
        "Winners: {}, Backups: {}",
        request.winner_count, request.backup_count
    );

    let participants = fetcher.fetch(tweet_id, request.kind).await?;

    info!("Found {} users", participants.len());

    let selection = select_winners(
        &participants,
        request.kind,
        request.seed.as_deref(),
        request.winner_count,
        request.backup_count,
    )?;

    info!(
        "Raffle {} drew {} winners and {} backups",
        request.raffle_id,
        selection.winners.len(),
        selection.backups.len()
    );

    Ok(selection)
}
