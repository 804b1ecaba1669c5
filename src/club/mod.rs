pub mod payments;
pub mod player_stats;
pub mod standings;
pub mod votes;
pub mod validation;

pub use validation::ClubValidator;
