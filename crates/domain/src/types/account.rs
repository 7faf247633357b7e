//! Account summary record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parse::{ensure_object, parse_i64};
use crate::errors::{CityPermitError, Result};

/// Account data including remaining time and active reservations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier (the permit media code)
    pub id: i64,
    /// Remaining parking balance, in minutes
    pub remaining_time: i64,
    /// Number of currently active reservations
    pub active_reservation_count: usize,
}

impl Account {
    /// Build an account from a permit media mapping
    ///
    /// A missing `ActiveReservations` field counts as zero reservations; any
    /// non-list value is a shape violation.
    ///
    /// # Errors
    ///
    /// Returns `Parse` on any field-shape violation.
    pub fn from_permit_media(permit_media: &Value) -> Result<Self> {
        let data = ensure_object(permit_media, "permit_media")?;

        let active_reservation_count = match data.get("ActiveReservations") {
            None | Some(Value::Null) => 0,
            Some(Value::Array(items)) => items.len(),
            Some(_) => {
                return Err(CityPermitError::Parse(
                    "expected permit_media.ActiveReservations list".into(),
                ))
            }
        };

        Ok(Self {
            id: parse_i64(data.get("Code"), "permit_media.Code")?,
            remaining_time: parse_i64(data.get("Balance"), "permit_media.Balance")?,
            active_reservation_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_permit_media_fields() {
        let media = json!({
            "Code": "32600",
            "Balance": 6996,
            "ActiveReservations": [{"ReservationID": 1}],
        });

        let account = Account::from_permit_media(&media).unwrap();
        assert_eq!(account.id, 32600);
        assert_eq!(account.remaining_time, 6996);
        assert_eq!(account.active_reservation_count, 1);
    }

    #[test]
    fn missing_reservations_count_as_zero() {
        let media = json!({"Code": 1, "Balance": 0});
        let account = Account::from_permit_media(&media).unwrap();
        assert_eq!(account.active_reservation_count, 0);
    }

    #[test]
    fn non_list_reservations_fail_closed() {
        let media = json!({"Code": 1, "Balance": 0, "ActiveReservations": "nope"});
        assert!(matches!(
            Account::from_permit_media(&media),
            Err(CityPermitError::Parse(_))
        ));
    }
}
