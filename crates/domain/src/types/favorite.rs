//! Favorite license plate record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parse::{ensure_array, ensure_object, parse_optional_str, parse_str};
use crate::errors::Result;

/// Favorite license plate data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// License plate value
    pub license_plate: String,
    /// Optional display name for the plate
    pub name: Option<String>,
}

impl Favorite {
    /// Build a favorite from a permit media license plate mapping
    ///
    /// # Errors
    ///
    /// Returns `Parse` on any field-shape violation.
    pub fn from_value(value: &Value) -> Result<Self> {
        let data = ensure_object(value, "favorite")?;
        Ok(Self {
            license_plate: parse_str(data.get("Value"), "favorite.Value")?,
            name: parse_optional_str(data.get("Name"), "favorite.Name")?,
        })
    }

    /// Build the favorite list from a permit media mapping
    ///
    /// A missing or `null` `LicensePlates` field is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `Parse` when the field is not a list or an item is malformed.
    pub fn list_from_permit_media(permit_media: &Value) -> Result<Vec<Self>> {
        let data = ensure_object(permit_media, "permit_media")?;
        match data.get("LicensePlates") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(items) => ensure_array(items, "favorites")?
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

    #[test]
    fn maps_fields_with_optional_name() {
        let favorite = Favorite::from_value(&json!({"Value": "AA11BBCC", "Name": "Test"})).unwrap();
        assert_eq!(favorite.license_plate, "AA11BBCC");
        assert_eq!(favorite.name.as_deref(), Some("Test"));

        let unnamed = Favorite::from_value(&json!({"Value": "AA11BBCC", "Name": null})).unwrap();
        assert_eq!(unnamed.name, None);
    }

    #[test]
    fn requires_plate_value() {
        assert!(Favorite::from_value(&json!({"Name": "Test"})).is_err());
    }

    #[test]
    fn lists_favorites_from_permit_media() {
        let media = json!({
            "LicensePlates": [
                {"Value": "AA11BBCC", "Name": "Test"},
                {"Value": "ZZ99XX", "Name": null},
            ]
        });

        let favorites = Favorite::list_from_permit_media(&media).unwrap();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[1].name, None);
    }
}
