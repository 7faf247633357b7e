//! Reservation record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parse::{ensure_array, ensure_object, parse_i64, parse_str};
use crate::errors::{CityPermitError, Result};
use crate::utils::time::normalize_timestamp;

/// Reservation data for a license plate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Reservation identifier
    pub id: i64,
    /// License plate the reservation was made for
    pub license_plate: String,
    /// Display name of the license plate
    pub name: String,
    /// Reservation start, canonical UTC (`…Z`, seconds precision)
    pub start_time: String,
    /// Reservation end, canonical UTC (`…Z`, seconds precision)
    pub end_time: String,
}

impl Reservation {
    /// Build a reservation from a permit media reservation mapping
    ///
    /// # Errors
    ///
    /// Returns `Parse` on any field-shape violation or unparseable timestamp.
    pub fn from_value(value: &Value) -> Result<Self> {
        let data = ensure_object(value, "reservation")?;

        let license_plate = data
            .get("LicensePlate")
            .filter(|plate| plate.is_object())
            .ok_or_else(|| {
                CityPermitError::Parse("expected reservation.LicensePlate object".into())
            })?;

        let valid_from = parse_str(data.get("ValidFrom"), "reservation.ValidFrom")?;
        let valid_until = parse_str(data.get("ValidUntil"), "reservation.ValidUntil")?;

        Ok(Self {
            id: parse_i64(data.get("ReservationID"), "reservation.ReservationID")?,
            license_plate: parse_str(
                license_plate.get("Value"),
                "reservation.LicensePlate.Value",
            )?,
            name: parse_str(
                license_plate.get("DisplayValue"),
                "reservation.LicensePlate.DisplayValue",
            )?,
            start_time: normalize_timestamp(&valid_from, "reservation.ValidFrom")?,
            end_time: normalize_timestamp(&valid_until, "reservation.ValidUntil")?,
        })
    }

    /// Build the reservation list from a permit media mapping
    ///
    /// A missing or `null` `ActiveReservations` field is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `Parse` when the field is not a list or an item is malformed.
    pub fn list_from_permit_media(permit_media: &Value) -> Result<Vec<Self>> {
        let data = ensure_object(permit_media, "permit_media")?;
        match data.get("ActiveReservations") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(items) => ensure_array(items, "reservations")?
                .iter()
                .map(Self::from_value)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reservation_item() -> Value {
        json!({
            "ReservationID": 1_844_553,
            "ValidFrom": "2025-12-23T00:47:00",
            "ValidUntil": "2025-12-23T23:59:00",
            "LicensePlate": {"DisplayValue": "AA11BB", "Value": "AA11BB"},
            "Units": 359,
        })
    }

    #[test]
    fn maps_fields_and_normalizes_times() {
        let reservation = Reservation::from_value(&reservation_item()).unwrap();
        assert_eq!(reservation.id, 1_844_553);
        assert_eq!(reservation.license_plate, "AA11BB");
        assert_eq!(reservation.name, "AA11BB");
        assert_eq!(reservation.start_time, "2025-12-23T00:47:00Z");
        assert_eq!(reservation.end_time, "2025-12-23T23:59:00Z");
    }

    #[test]
    fn requires_license_plate_object() {
        let mut item = reservation_item();
        item["LicensePlate"] = json!("AA11BB");
        assert!(matches!(
            Reservation::from_value(&item),
            Err(CityPermitError::Parse(_))
        ));
    }

    #[test]
    fn list_tolerates_missing_reservations() {
        let media = json!({"Code": "1"});
        assert!(Reservation::list_from_permit_media(&media).unwrap().is_empty());

        let media = json!({"ActiveReservations": null});
        assert!(Reservation::list_from_permit_media(&media).unwrap().is_empty());
    }

    #[test]
    fn list_rejects_non_list_reservations() {
        let media = json!({"ActiveReservations": {"ReservationID": 1}});
        assert!(Reservation::list_from_permit_media(&media).is_err());
    }
}
