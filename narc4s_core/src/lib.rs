pub mod helpers;
pub mod raffle;
pub mod twitter;
