#![allow(dead_code)]

pub mod club_helpers;
pub mod utils;
