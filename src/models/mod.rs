pub mod auth;
pub mod card;
pub mod club;
pub mod common;
pub mod fixture;
pub mod payment;
pub mod statistics;
pub mod user;
