pub mod helpers;
pub mod matches;
pub mod payments;
pub mod players;
pub mod statistics;
pub mod teams;
pub mod tournaments;
pub mod users;
pub mod votes;
