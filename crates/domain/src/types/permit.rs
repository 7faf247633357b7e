//! Permit payload navigation
//!
//! Most endpoints answer with a full permit payload: either a single
//! `Permit` object or a `Permits` array. Each permit carries a
//! `PermitMedias` list whose first entry holds the account's balance,
//! reservations, favorites, and the media identifiers other calls must echo
//! back.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parse::{ensure_array, ensure_object, parse_i64, parse_str};
use crate::errors::{CityPermitError, Result};

/// Locate the permit and its first permit media inside a response payload
///
/// Accepts both response shapes (`Permit` object, or non-empty `Permits`
/// array whose first entry is taken).
///
/// # Errors
///
/// Returns `Parse` when the payload carries neither shape, or the permit has
/// no media entries.
pub fn extract_permit_media(payload: &Value) -> Result<(&Value, &Value)> {
    let root = ensure_object(payload, "response")?;
    let permit = if let Some(permit) = root.get("Permit") {
        ensure_object(permit, "permit")?;
        permit
    } else if let Some(permits) = root.get("Permits") {
        let first = ensure_array(permits, "permits")?
            .first()
            .ok_or_else(|| CityPermitError::Parse("expected permit list to have items".into()))?;
        ensure_object(first, "permit")?;
        first
    } else {
        return Err(CityPermitError::Parse("expected permit data in response".into()));
    };

    let medias = permit
        .get("PermitMedias")
        .ok_or_else(|| CityPermitError::Parse("expected permit.PermitMedias list".into()))?;
    let permit_media = ensure_array(medias, "permit.PermitMedias")?
        .first()
        .ok_or_else(|| CityPermitError::Parse("expected permit media list to have items".into()))?;
    ensure_object(permit_media, "permit_media")?;

    Ok((permit, permit_media))
}

/// Check whether a payload carries permit data at all
///
/// Used to decide whether a write response should refresh cached media
/// defaults; payloads without permit data are left alone.
pub fn carries_permit(payload: &Value) -> bool {
    payload
        .as_object()
        .is_some_and(|root| root.contains_key("Permit") || root.contains_key("Permits"))
}

/// The permit media identifiers echoed back on every write call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDefaults {
    /// Permit media type identifier
    pub type_id: i64,
    /// Permit media code (the account's media number)
    pub code: String,
}

impl MediaDefaults {
    /// Scrape the media identifiers from a permit media mapping
    ///
    /// # Errors
    ///
    /// Returns `Parse` when `TypeID` is not an integer or `Code` is not a
    /// string.
    pub fn from_permit_media(permit_media: &Value) -> Result<Self> {
        let data = ensure_object(permit_media, "permit_media")?;
        Ok(Self {
            type_id: parse_i64(data.get("TypeID"), "permit_media.TypeID")?,
            code: parse_str(data.get("Code"), "permit_media.Code")?,
        })
    }
}
