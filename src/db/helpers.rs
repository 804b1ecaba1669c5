//! Database query helper functions to reduce boilerplate error handling.
//!
//! These helpers simplify common patterns like:
//! - Fetching a required record (NotFound if missing)
//! - Ensuring a record doesn't exist (Conflict if it does)
//!
//! # Usage
//!
//! ```ignore
//! let team = require_record(teams::find_team(pool, team_id).await, "Team")?;
//! ensure_not_exists(teams::find_team_by_name(pool, &name).await, "Team name already taken")?;
//! ```

use crate::error::AppError;

/// Unwrap an optional database result, returning NotFound if None.
pub fn require_record<T>(
    result: Result<Option<T>, sqlx::Error>,
    what: &str,
) -> Result<T, AppError> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(AppError::not_found(what)),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// Ensure a record does NOT exist, returning Conflict if it does.
pub fn ensure_not_exists<T>(
    result: Result<Option<T>, sqlx::Error>,
    conflict_message: &str,
) -> Result<(), AppError> {
    match result {
        Ok(Some(_)) => Err(AppError::Conflict(conflict_message.to_string())),
        Ok(None) => Ok(()),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// Fail with NotFound when an update or delete touched no rows.
pub fn require_affected(rows_affected: u64, what: &str) -> Result<(), AppError> {
    if rows_affected == 0 {
        return Err(AppError::not_found(what));
    }
    Ok(())
}

/// Decode a TEXT column into one of the model enums.
pub fn parse_column<T>(value: &str, column: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse().map_err(|e: String| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::card::CardKind;

    #[test]
    fn missing_record_is_not_found() {
        let err = require_record::<i32>(Ok(None), "Player").unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Player not found"));
        assert_eq!(require_record(Ok(Some(7)), "Player").unwrap(), 7);
    }

    #[test]
    fn existing_record_conflicts() {
        let err = ensure_not_exists(Ok(Some(())), "Team name already taken").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(ensure_not_exists::<()>(Ok(None), "unused").is_ok());
    }

    #[test]
    fn zero_rows_affected_is_not_found() {
        assert!(require_affected(0, "Payment").is_err());
        assert!(require_affected(1, "Payment").is_ok());
    }

    #[test]
    fn bad_column_text_is_a_decode_error() {
        assert_eq!(parse_column::<CardKind>("red", "kind").unwrap(), CardKind::Red);
        let err = parse_column::<CardKind>("green", "kind").unwrap_err();
        assert!(matches!(err, sqlx::Error::ColumnDecode { .. }));
    }
}
