//! Per-player aggregates over statistics records and cards.
//!
//! Goals and assists come from the scalar counters of every statistics record
//! the player belongs to. Records created before counters were filled in only
//! carry memberships, so a zero sum falls back to the number of memberships.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::card::{Card, CardKind};
use crate::models::club::Player;
use crate::models::fixture::Match;
use crate::models::statistics::{ClubOverview, Leader, MatchStatistics, PlayerStatLine, StatRelation};

fn sum_or_count(statistics: &[MatchStatistics], player_id: Uuid, relation: StatRelation) -> i64 {
    let rows = statistics
        .iter()
        .filter(|s| s.members(relation).contains(&player_id));

    let mut total: i64 = 0;
    let mut memberships: i64 = 0;
    for row in rows {
        memberships += 1;
        total += i64::from(match relation {
            StatRelation::Scorers => row.goals,
            _ => row.assists,
        });
    }

    if total > 0 {
        total
    } else {
        memberships
    }
}

pub fn stat_lines(players: &[Player], statistics: &[MatchStatistics], cards: &[Card]) -> Vec<PlayerStatLine> {
    let mut card_counts: HashMap<Uuid, (i64, i64)> = HashMap::new();
    for card in cards.iter().filter(|c| c.is_active()) {
        let entry = card_counts.entry(card.player_id).or_default();
        match card.kind {
            CardKind::Yellow => entry.0 += 1,
            CardKind::Red => entry.1 += 1,
        }
    }

    players
        .iter()
        .map(|player| {
            let (yellow_cards, red_cards) = card_counts.get(&player.id).copied().unwrap_or_default();
            PlayerStatLine {
                player_id: player.id,
                first_name: player.first_name.clone(),
                last_name: player.last_name.clone(),
                team_id: player.team_id,
                goals: sum_or_count(statistics, player.id, StatRelation::Scorers),
                assists: sum_or_count(statistics, player.id, StatRelation::Assisters),
                yellow_cards,
                red_cards,
            }
        })
        .collect()
}

/// First player with the strictly highest positive value.
fn leader(lines: &[PlayerStatLine], value: impl Fn(&PlayerStatLine) -> i64) -> Option<Leader> {
    let mut best: Option<&PlayerStatLine> = None;
    for line in lines {
        if value(line) > best.map_or(0, &value) {
            best = Some(line);
        }
    }
    best.map(|line| Leader {
        player_id: line.player_id,
        first_name: line.first_name.clone(),
        last_name: line.last_name.clone(),
        value: value(line),
    })
}

/// Share of scored matches that did not end in a draw, as a percentage with
/// two decimals.
pub fn win_percentage(matches: &[Match]) -> f64 {
    let scored: Vec<(i32, i32)> = matches.iter().filter_map(Match::final_score).collect();
    if scored.is_empty() {
        return 0.0;
    }
    let decided = scored.iter().filter(|(home, away)| home != away).count();
    let pct = decided as f64 / scored.len() as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

pub fn club_overview(
    players: &[Player],
    statistics: &[MatchStatistics],
    cards: &[Card],
    matches: &[Match],
) -> ClubOverview {
    let lines = stat_lines(players, statistics, cards);
    let active = cards.iter().filter(|c| c.is_active());
    let (yellow_cards_total, red_cards_total) = active.fold((0, 0), |(y, r), card| match card.kind {
        CardKind::Yellow => (y + 1, r),
        CardKind::Red => (y, r + 1),
    });

    ClubOverview {
        top_scorer: leader(&lines, |l| l.goals),
        top_assister: leader(&lines, |l| l.assists),
        most_yellow_cards: leader(&lines, |l| l.yellow_cards),
        most_red_cards: leader(&lines, |l| l.red_cards),
        yellow_cards_total,
        red_cards_total,
        win_percentage: win_percentage(matches),
        players: lines,
    }
}
