use std::collections::HashMap;

use uuid::Uuid;

use crate::models::club::Team;
use crate::models::fixture::Match;
use crate::models::statistics::StandingRow;

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

impl StandingRow {
    fn empty(team: &Team) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    fn record(&mut self, scored: i32, conceded: i32) {
        self.played += 1;
        self.goals_for += scored.max(0) as u32;
        self.goals_against += conceded.max(0) as u32;
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won += 1;
                self.points += POINTS_FOR_WIN;
            }
            std::cmp::Ordering::Equal => {
                self.drawn += 1;
                self.points += POINTS_FOR_DRAW;
            }
            std::cmp::Ordering::Less => self.lost += 1,
        }
    }
}

/// Build a tournament table.
///
/// Every participating team gets a row. Matches without both scores, and
/// matches involving teams outside `teams`, are ignored. Rows are ordered by
/// points, goal difference and goals scored, all descending, then by name.
pub fn compute_standings(teams: &[Team], matches: &[Match]) -> Vec<StandingRow> {
    let mut rows: HashMap<Uuid, StandingRow> = teams
        .iter()
        .map(|team| (team.id, StandingRow::empty(team)))
        .collect();

    for fixture in matches {
        let Some((home, away)) = fixture.final_score() else {
            continue;
        };
        if !rows.contains_key(&fixture.home_team_id) || !rows.contains_key(&fixture.away_team_id) {
            tracing::debug!("Skipping match {} with a team outside the tournament", fixture.id);
            continue;
        }
        if let Some(row) = rows.get_mut(&fixture.home_team_id) {
            row.record(home, away);
        }
        if let Some(row) = rows.get_mut(&fixture.away_team_id) {
            row.record(away, home);
        }
    }

    let mut table: Vec<StandingRow> = rows.into_values().collect();
    table.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
    table
}
