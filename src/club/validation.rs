use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::club::{CreatePlayerRequest, CreateTournamentRequest, UpdatePlayerRequest};
use crate::models::fixture::CreateMatchRequest;
use crate::models::statistics::{StatRelation, StatisticsForm};

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_NATIONAL_ID_LENGTH: usize = 8;
pub const MAX_SCORE: i32 = 99;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Input checks for club records, run before anything touches the database.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClubValidator;

impl ClubValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn sanitize(&self, input: &str) -> String {
        input.chars().filter(|&c| c != '\0').collect::<String>().trim().to_string()
    }

    /// Trimmed, non-empty name of at most 100 characters with some alphanumeric content.
    pub fn validate_name(&self, field: &str, name: &str) -> Result<String, AppError> {
        let sanitized = self.sanitize(name);
        if sanitized.is_empty() {
            return Err(AppError::Validation(format!("{} cannot be empty", field)));
        }
        if sanitized.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "{} too long (maximum {} characters)",
                field, MAX_NAME_LENGTH
            )));
        }
        if !sanitized.chars().any(|c| c.is_alphanumeric()) {
            return Err(AppError::Validation(format!(
                "{} must contain alphanumeric characters",
                field
            )));
        }
        Ok(sanitized)
    }

    pub fn validate_national_id(&self, national_id: &str) -> Result<String, AppError> {
        let sanitized = self.sanitize(national_id);
        if sanitized.is_empty() {
            return Err(AppError::Validation("National id cannot be empty".into()));
        }
        if sanitized.chars().count() > MAX_NATIONAL_ID_LENGTH {
            return Err(AppError::Validation(format!(
                "National id too long (maximum {} characters)",
                MAX_NATIONAL_ID_LENGTH
            )));
        }
        if !sanitized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::Validation(
                "National id may only contain letters and digits".into(),
            ));
        }
        Ok(sanitized)
    }

    /// Sign-up credentials. Returns the trimmed username and email.
    pub fn validate_account(&self, username: &str, email: &str, password: &str) -> Result<(String, String), AppError> {
        let username = self.sanitize(username);
        if username.is_empty() || username.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation("Username must be between 1 and 100 characters".into()));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(AppError::Validation("Username cannot contain spaces".into()));
        }

        let email = self.sanitize(email);
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
            None => false,
        };
        if !valid_email {
            return Err(AppError::Validation("Invalid email address".into()));
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok((username, email))
    }

    pub fn validate_shirt_number(&self, shirt_number: Option<i32>) -> Result<(), AppError> {
        match shirt_number {
            Some(n) if !(1..=99).contains(&n) => Err(AppError::Validation(format!(
                "Shirt number must be between 1 and 99, got {}",
                n
            ))),
            _ => Ok(()),
        }
    }

    pub fn validate_birth_date(&self, birth_date: Option<NaiveDate>, today: NaiveDate) -> Result<(), AppError> {
        match birth_date {
            Some(dob) if dob > today => Err(AppError::Validation(
                "Birth date cannot be in the future".into(),
            )),
            _ => Ok(()),
        }
    }

    pub fn validate_create_player(&self, request: &CreatePlayerRequest, today: NaiveDate) -> Result<(), AppError> {
        self.validate_name("First name", &request.first_name)?;
        self.validate_name("Last name", &request.last_name)?;
        self.validate_national_id(&request.national_id)?;
        self.validate_shirt_number(request.shirt_number)?;
        self.validate_birth_date(request.birth_date, today)
    }

    pub fn validate_update_player(&self, request: &UpdatePlayerRequest, today: NaiveDate) -> Result<(), AppError> {
        if let Some(first_name) = &request.first_name {
            self.validate_name("First name", first_name)?;
        }
        if let Some(last_name) = &request.last_name {
            self.validate_name("Last name", last_name)?;
        }
        self.validate_shirt_number(request.shirt_number)?;
        self.validate_birth_date(request.birth_date, today)
    }

    pub fn validate_score(&self, side: &str, score: i32) -> Result<(), AppError> {
        if score < 0 {
            return Err(AppError::Validation(format!("{} score cannot be negative: {}", side, score)));
        }
        if score > MAX_SCORE {
            return Err(AppError::Validation(format!(
                "{} score too high: {} (max {})",
                side, score, MAX_SCORE
            )));
        }
        Ok(())
    }

    pub fn validate_create_match(&self, request: &CreateMatchRequest) -> Result<(), AppError> {
        if request.home_team_id == request.away_team_id {
            return Err(AppError::Validation("A team cannot play against itself".into()));
        }
        if request.home_score.is_some() != request.away_score.is_some() {
            return Err(AppError::Validation("Both scores must be given together".into()));
        }
        if let Some(home) = request.home_score {
            self.validate_score("Home", home)?;
        }
        if let Some(away) = request.away_score {
            self.validate_score("Away", away)?;
        }
        Ok(())
    }

    pub fn validate_team_ids(&self, team_ids: &[Uuid]) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for team_id in team_ids {
            if team_id.is_nil() {
                return Err(AppError::Validation("Nil UUID not allowed for team ID".into()));
            }
            if !seen.insert(team_id) {
                return Err(AppError::Validation(format!("Duplicate team ID found: {}", team_id)));
            }
        }
        Ok(())
    }

    pub fn validate_create_tournament(&self, request: &CreateTournamentRequest) -> Result<String, AppError> {
        let name = self.validate_name("Tournament name", &request.name)?;
        if let Some(end) = request.end_date {
            if end < request.start_date {
                return Err(AppError::Validation("End date cannot be before start date".into()));
            }
        }
        self.validate_team_ids(&request.team_ids)?;
        Ok(name)
    }

    pub fn validate_statistics(&self, form: &StatisticsForm) -> Result<(), AppError> {
        if form.goals < 0 || form.assists < 0 {
            return Err(AppError::Validation("Goals and assists cannot be negative".into()));
        }
        for relation in StatRelation::ALL {
            let members = form.members(relation);
            let unique: HashSet<&Uuid> = members.iter().collect();
            if unique.len() != members.len() {
                return Err(AppError::Validation(format!(
                    "Duplicate player in {}",
                    relation
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ClubValidator {
        ClubValidator::new()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn names_are_trimmed_and_checked() {
        assert_eq!(validator().validate_name("Team name", "  Furia Nocturna FC ").unwrap(), "Furia Nocturna FC");
        assert!(validator().validate_name("Team name", "   ").is_err());
        assert!(validator().validate_name("Team name", "---").is_err());
        assert!(validator().validate_name("Team name", &"a".repeat(101)).is_err());
    }

    #[test]
    fn national_id_is_limited_to_eight_characters() {
        assert_eq!(validator().validate_national_id("12345678").unwrap(), "12345678");
        assert!(validator().validate_national_id("123456789").is_err());
        assert!(validator().validate_national_id("12-345").is_err());
    }

    #[test]
    fn accounts_need_a_username_an_email_and_a_long_password() {
        assert_eq!(
            validator().validate_account(" marta ", "marta@club.test", "long-enough").unwrap(),
            ("marta".to_string(), "marta@club.test".to_string())
        );
        assert!(validator().validate_account("", "marta@club.test", "long-enough").is_err());
        assert!(validator().validate_account("marta v", "marta@club.test", "long-enough").is_err());
        assert!(validator().validate_account("marta", "marta.club.test", "long-enough").is_err());
        assert!(validator().validate_account("marta", "marta@localhost", "long-enough").is_err());
        assert!(validator().validate_account("marta", "marta@club.test", "short").is_err());
    }

    #[test]
    fn shirt_numbers_run_from_one_to_ninety_nine() {
        assert!(validator().validate_shirt_number(Some(1)).is_ok());
        assert!(validator().validate_shirt_number(Some(99)).is_ok());
        assert!(validator().validate_shirt_number(None).is_ok());
        assert!(validator().validate_shirt_number(Some(0)).is_err());
        assert!(validator().validate_shirt_number(Some(100)).is_err());
    }

    #[test]
    fn birth_date_cannot_be_in_the_future() {
        let tomorrow = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(validator().validate_birth_date(Some(tomorrow), today()).is_err());
        assert!(validator().validate_birth_date(Some(today()), today()).is_ok());
    }

    #[test]
    fn match_needs_two_teams_and_sane_scores() {
        let team = Uuid::new_v4();
        let mut request = CreateMatchRequest {
            home_team_id: team,
            away_team_id: team,
            match_date: today(),
            tournament_id: None,
            home_score: None,
            away_score: None,
        };
        assert!(validator().validate_create_match(&request).is_err());

        request.away_team_id = Uuid::new_v4();
        assert!(validator().validate_create_match(&request).is_ok());

        request.home_score = Some(3);
        assert!(validator().validate_create_match(&request).is_err());
        request.away_score = Some(100);
        assert!(validator().validate_create_match(&request).is_err());
        request.away_score = Some(-1);
        assert!(validator().validate_create_match(&request).is_err());
        request.away_score = Some(2);
        assert!(validator().validate_create_match(&request).is_ok());
    }

    #[test]
    fn tournament_dates_and_teams() {
        let team = Uuid::new_v4();
        let mut request = CreateTournamentRequest {
            name: "Apertura".into(),
            start_date: today(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 1),
            team_ids: vec![],
        };
        assert!(validator().validate_create_tournament(&request).is_err());

        request.end_date = None;
        request.team_ids = vec![team, team];
        assert!(validator().validate_create_tournament(&request).is_err());

        request.team_ids = vec![team];
        assert_eq!(validator().validate_create_tournament(&request).unwrap(), "Apertura");
    }

    #[test]
    fn statistics_reject_duplicates_and_negatives() {
        let p = Uuid::new_v4();
        let form = StatisticsForm { booked: vec![p, p], ..Default::default() };
        assert!(validator().validate_statistics(&form).is_err());

        let form = StatisticsForm { goals: -1, ..Default::default() };
        assert!(validator().validate_statistics(&form).is_err());

        let form = StatisticsForm { goals: 2, scorers: vec![p], booked: vec![p], ..Default::default() };
        assert!(validator().validate_statistics(&form).is_ok());
    }
}
