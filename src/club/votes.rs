//! Player-of-the-match tally.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::fixture::MatchVote;

/// Vote count for the leading player of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub player_id: Uuid,
    pub votes: i64,
}

/// The player with the most votes. A tie goes to the player whose first vote
/// came in earliest.
pub fn featured_player(votes: &[MatchVote]) -> Option<Tally> {
    let mut counts: HashMap<Uuid, (i64, usize)> = HashMap::new();
    let mut ordered: Vec<&MatchVote> = votes.iter().collect();
    ordered.sort_by_key(|v| v.created_at);

    for (position, vote) in ordered.iter().enumerate() {
        let entry = counts.entry(vote.player_id).or_insert((0, position));
        entry.0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (a_votes, a_first)), (_, (b_votes, b_first))| {
            a_votes.cmp(b_votes).then(b_first.cmp(a_first))
        })
        .map(|(player_id, (votes, _))| Tally { player_id, votes })
}
