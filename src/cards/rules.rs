//! Card limits and second-yellow escalation.
//!
//! Every function here works on the cards of a single (match, player) pair
//! and ignores voided cards.

use uuid::Uuid;

use crate::cards::error::CardError;
use crate::models::card::{Card, CardKind};

pub const MAX_ACTIVE_YELLOWS: usize = 2;
pub const MAX_ACTIVE_REDS: usize = 1;

pub fn active_count(cards: &[Card], kind: CardKind) -> usize {
    cards.iter().filter(|c| c.is_active_of(kind)).count()
}

/// Check whether another card of `kind` may be added to this pair.
pub fn check_issue(
    cards: &[Card],
    match_id: Uuid,
    player_id: Uuid,
    kind: CardKind,
    minute: Option<i32>,
) -> Result<(), CardError> {
    if let Some(m) = minute {
        if m < 0 {
            return Err(CardError::InvalidMinute(m));
        }
    }

    match kind {
        CardKind::Red if active_count(cards, CardKind::Red) >= MAX_ACTIVE_REDS => {
            Err(CardError::DuplicateCard { match_id, player_id })
        }
        CardKind::Yellow if active_count(cards, CardKind::Yellow) >= MAX_ACTIVE_YELLOWS => {
            Err(CardError::TooManyCards { match_id, player_id })
        }
        _ => Ok(()),
    }
}

/// Active yellows ordered by issuance time. Ties keep the input order, which
/// stores supply in insertion order.
pub fn yellows_by_issuance(cards: &[Card]) -> Vec<&Card> {
    let mut yellows: Vec<&Card> = cards
        .iter()
        .filter(|c| c.is_active_of(CardKind::Yellow))
        .collect();
    yellows.sort_by_key(|c| c.issued_at);
    yellows
}

/// A red card owed after a second yellow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalation {
    pub minute: Option<i32>,
}

/// Decide whether `just_issued` (already part of `cards`) tips the pair into
/// a sending-off.
///
/// The red takes the minute of the second yellow by issuance time, falling
/// back to the minute of the card just issued.
pub fn escalation_after(cards: &[Card], just_issued: &Card) -> Option<Escalation> {
    if just_issued.kind != CardKind::Yellow {
        return None;
    }

    let yellows = yellows_by_issuance(cards);
    if yellows.len() < MAX_ACTIVE_YELLOWS || active_count(cards, CardKind::Red) > 0 {
        return None;
    }

    // Minute 0 is a recorded minute and is kept, not treated as missing.
    let minute = yellows
        .get(1)
        .and_then(|second| second.minute)
        .or(just_issued.minute);

    Some(Escalation { minute })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn card(kind: CardKind, minute: Option<i32>, offset_secs: i64) -> Card {
        Card {
            id: Uuid::new_v4(),
            match_id: Uuid::nil(),
            player_id: Uuid::nil(),
            kind,
            minute,
            issued_at: Utc.with_ymd_and_hms(2025, 4, 1, 20, 0, 0).unwrap()
                + Duration::seconds(offset_secs),
            voided: false,
            void_reason: None,
        }
    }

    fn voided(mut c: Card) -> Card {
        c.voided = true;
        c.void_reason = Some("entered by mistake".into());
        c
    }

    #[test]
    fn red_is_rejected_when_an_active_red_exists() {
        let cards = vec![card(CardKind::Red, Some(60), 0)];
        let err = check_issue(&cards, Uuid::nil(), Uuid::nil(), CardKind::Red, Some(80)).unwrap_err();
        assert!(matches!(err, CardError::DuplicateCard { .. }));
    }

    #[test]
    fn voided_red_does_not_block_a_new_red() {
        let cards = vec![voided(card(CardKind::Red, Some(60), 0))];
        assert!(check_issue(&cards, Uuid::nil(), Uuid::nil(), CardKind::Red, Some(80)).is_ok());
    }

    #[test]
    fn third_yellow_is_rejected() {
        let cards = vec![
            card(CardKind::Yellow, Some(10), 0),
            card(CardKind::Yellow, Some(50), 1),
        ];
        let err = check_issue(&cards, Uuid::nil(), Uuid::nil(), CardKind::Yellow, Some(70)).unwrap_err();
        assert!(matches!(err, CardError::TooManyCards { .. }));
    }

    #[test]
    fn negative_minute_is_rejected() {
        let err = check_issue(&[], Uuid::nil(), Uuid::nil(), CardKind::Yellow, Some(-1)).unwrap_err();
        assert!(matches!(err, CardError::InvalidMinute(-1)));
        assert!(check_issue(&[], Uuid::nil(), Uuid::nil(), CardKind::Yellow, Some(0)).is_ok());
    }

    #[test]
    fn first_yellow_does_not_escalate() {
        let first = card(CardKind::Yellow, Some(10), 0);
        assert_eq!(escalation_after(&[first.clone()], &first), None);
    }

    #[test]
    fn second_yellow_escalates_with_its_minute() {
        let first = card(CardKind::Yellow, Some(10), 0);
        let second = card(CardKind::Yellow, Some(50), 1);
        let cards = vec![first, second.clone()];
        assert_eq!(escalation_after(&cards, &second), Some(Escalation { minute: Some(50) }));
    }

    #[test]
    fn no_escalation_when_red_already_shown() {
        let red = card(CardKind::Red, Some(5), 0);
        let first = card(CardKind::Yellow, Some(10), 1);
        let second = card(CardKind::Yellow, Some(50), 2);
        let cards = vec![red, first, second.clone()];
        assert_eq!(escalation_after(&cards, &second), None);
    }

    #[test]
    fn minute_falls_back_to_the_card_just_issued() {
        // The trigger is backdated, so the minuteless yellow sorts second.
        let first = card(CardKind::Yellow, Some(10), 0);
        let minuteless = card(CardKind::Yellow, None, 5);
        let trigger = card(CardKind::Yellow, Some(77), 2);
        let cards = vec![voided(first), minuteless, trigger.clone()];
        assert_eq!(escalation_after(&cards, &trigger), Some(Escalation { minute: Some(77) }));
    }

    #[test]
    fn second_by_issuance_wins_over_the_trigger() {
        let existing = card(CardKind::Yellow, Some(5), 100);
        // Recorded later but backdated before the existing card.
        let trigger = card(CardKind::Yellow, Some(40), 0);
        let cards = vec![existing, trigger.clone()];
        assert_eq!(escalation_after(&cards, &trigger), Some(Escalation { minute: Some(5) }));
    }

    #[test]
    fn minute_zero_counts_as_present() {
        let first = card(CardKind::Yellow, Some(30), 0);
        let second = card(CardKind::Yellow, Some(0), 1);
        let cards = vec![first, second.clone()];
        assert_eq!(escalation_after(&cards, &second), Some(Escalation { minute: Some(0) }));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let a = card(CardKind::Yellow, Some(1), 0);
        let b = card(CardKind::Yellow, Some(2), 0);
        let cards = vec![a.clone(), b.clone()];
        let ordered = yellows_by_issuance(&cards);
        assert_eq!(ordered[0].id, a.id);
        assert_eq!(ordered[1].id, b.id);
    }
}
