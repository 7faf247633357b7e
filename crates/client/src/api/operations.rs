//! Per-endpoint operations for the CityPermit service
//!
//! Thin wrappers that build a request descriptor per call, hand it to the
//! executor, and map the decoded payload into typed records. Most endpoints
//! answer with a full permit payload; the permit media identifiers scraped
//! from those payloads are cached and echoed back on every write call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use citypermit_domain::types::permit::{carries_permit, extract_permit_media};
use citypermit_domain::utils::time::format_timestamp;
use citypermit_domain::{
    Account, CityPermitError, Favorite, MediaDefaults, Reservation, Result, Zone,
};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::client::{ApiClient, RequestDescriptor};

const PERMIT_BASE_PATH: &str = "/login/getbase";
const RESERVATION_CREATE_PATH: &str = "/reservation/create";
const RESERVATION_END_PATH: &str = "/reservation/end";
const FAVORITE_UPSERT_PATH: &str = "/permitmedialicenseplate/upsert";
const FAVORITE_REMOVE_PATH: &str = "/permitmedialicenseplate/remove";

/// Parameters for creating a reservation
///
/// Media identifiers left `None` are filled from the cached defaults (the
/// permit is fetched first when the cache is empty). `date_from` defaults to
/// the current time.
#[derive(Debug, Clone, Default)]
pub struct CreateReservation {
    /// License plate to reserve for
    pub license_plate: String,
    /// Optional display name sent with the plate
    pub license_plate_name: Option<String>,
    /// Reservation start; `None` means now
    pub date_from: Option<DateTime<Utc>>,
    /// Optional reservation end
    pub date_until: Option<DateTime<Utc>>,
    /// Permit media type override
    pub permit_media_type_id: Option<i64>,
    /// Permit media code override
    pub permit_media_code: Option<String>,
}

impl CreateReservation {
    /// Reservation request for a plate, everything else defaulted
    pub fn new(license_plate: impl Into<String>) -> Self {
        Self { license_plate: license_plate.into(), ..Self::default() }
    }
}

/// High-level operations for the CityPermit service
pub struct CityPermitApi {
    client: Arc<ApiClient>,
    defaults: RwLock<Option<MediaDefaults>>,
}

impl CityPermitApi {
    /// Create a new operations instance
    ///
    /// # Arguments
    ///
    /// * `client` - Authenticated request executor
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, defaults: RwLock::new(None) }
    }

    /// Fetch the account summary
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the payload is malformed
    #[instrument(skip(self))]
    pub async fn account(&self) -> Result<Account> {
        let (_permit, permit_media) = self.fetch_permit().await?;
        Account::from_permit_media(&permit_media)
    }

    /// Return the paid parking block for the current day, if any
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the payload is malformed
    #[instrument(skip(self))]
    pub async fn zone(&self) -> Result<Option<Zone>> {
        let (permit, _permit_media) = self.fetch_permit().await?;
        Zone::from_permit(&permit)
    }

    /// Return all reservations for the current account
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the payload is malformed
    #[instrument(skip(self))]
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        let (_permit, permit_media) = self.fetch_permit().await?;
        let reservations = Reservation::list_from_permit_media(&permit_media)?;
        debug!(count = reservations.len(), "reservations listed");
        Ok(reservations)
    }

    /// Create a new reservation
    ///
    /// The response is a full permit payload; the reservation matching the
    /// requested plate and times is returned, falling back to the first
    /// active reservation when the service rounded the times.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response carries no active
    /// reservations
    #[instrument(skip(self, request), fields(license_plate = %request.license_plate))]
    pub async fn create_reservation(&self, request: CreateReservation) -> Result<Reservation> {
        let defaults = self
            .ensure_media_defaults(request.permit_media_type_id, request.permit_media_code.clone())
            .await?;
        let date_from = request.date_from.unwrap_or_else(Utc::now);

        let mut payload = json!({
            "permitMediaTypeID": defaults.type_id,
            "permitMediaCode": defaults.code,
            "DateFrom": format_timestamp(&date_from),
            "LicensePlate": {
                "Value": request.license_plate,
                "Name": request.license_plate_name,
            },
        });
        if let Some(date_until) = request.date_until {
            payload["DateUntil"] = json!(format_timestamp(&date_until));
        }

        let descriptor =
            RequestDescriptor::new(Method::POST, RESERVATION_CREATE_PATH).with_body(payload);
        let data = self.client.execute(&descriptor).await?.unwrap_or(Value::Null);

        let reservation =
            pick_reservation(&data, &request.license_plate, &date_from, request.date_until)?;
        debug!(reservation_id = reservation.id, "reservation created");
        Ok(reservation)
    }

    /// End an active reservation by its identifier
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self))]
    pub async fn end_reservation(
        &self,
        reservation_id: i64,
        permit_media_type_id: Option<i64>,
        permit_media_code: Option<String>,
    ) -> Result<()> {
        let defaults =
            self.ensure_media_defaults(permit_media_type_id, permit_media_code).await?;
        let payload = json!({
            "ReservationID": reservation_id,
            "permitMediaTypeID": defaults.type_id,
            "permitMediaCode": defaults.code,
        });

        let descriptor =
            RequestDescriptor::new(Method::POST, RESERVATION_END_PATH).with_body(payload);
        let data = self.client.execute(&descriptor).await?;
        self.refresh_defaults_if_present(data.as_ref()).await?;
        debug!(reservation_id, "reservation ended");
        Ok(())
    }

    /// Delete a reservation by ending it
    ///
    /// Pure alias for [`Self::end_reservation`]: same endpoint, same payload.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    pub async fn delete_reservation(&self, reservation_id: i64) -> Result<()> {
        self.end_reservation(reservation_id, None, None).await
    }

    /// Return all favorite license plates for the current account
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the payload is malformed
    #[instrument(skip(self))]
    pub async fn list_favorites(&self) -> Result<Vec<Favorite>> {
        let (_permit, permit_media) = self.fetch_permit().await?;
        Favorite::list_from_permit_media(&permit_media)
    }

    /// Create a favorite license plate
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self), fields(license_plate = %license_plate))]
    pub async fn create_favorite(
        &self,
        name: Option<&str>,
        license_plate: &str,
    ) -> Result<Favorite> {
        self.upsert_favorite(name, license_plate).await?;
        Ok(Favorite { license_plate: license_plate.to_string(), name: name.map(str::to_string) })
    }

    /// Update an existing favorite by removing it and recreating it
    ///
    /// The service has no native update call. The stored favorite for the
    /// plate is removed first (with the name the service knows it by); a
    /// failing removal short-circuits, leaving the create step unattempted.
    ///
    /// # Errors
    ///
    /// Returns error if the removal or the recreation fails
    #[instrument(skip(self), fields(license_plate = %license_plate))]
    pub async fn update_favorite(
        &self,
        name: Option<&str>,
        license_plate: &str,
    ) -> Result<Favorite> {
        let favorites = self.list_favorites().await?;
        let existing = favorites.iter().find(|favorite| favorite.license_plate == license_plate);

        if let Some(existing) = existing {
            self.delete_favorite(existing.name.as_deref(), license_plate).await?;
        }

        self.upsert_favorite(name, license_plate).await?;
        Ok(Favorite { license_plate: license_plate.to_string(), name: name.map(str::to_string) })
    }

    /// Delete a favorite by its license plate
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    #[instrument(skip(self), fields(license_plate = %license_plate))]
    pub async fn delete_favorite(&self, name: Option<&str>, license_plate: &str) -> Result<()> {
        let defaults = self.ensure_media_defaults(None, None).await?;
        let payload = json!({
            "permitMediaTypeID": defaults.type_id,
            "permitMediaCode": defaults.code,
            "licensePlate": license_plate,
            "name": name,
        });

        let descriptor =
            RequestDescriptor::new(Method::POST, FAVORITE_REMOVE_PATH).with_body(payload);
        let data = self.client.execute(&descriptor).await?;
        self.refresh_defaults_if_present(data.as_ref()).await
    }

    async fn upsert_favorite(&self, name: Option<&str>, license_plate: &str) -> Result<()> {
        let defaults = self.ensure_media_defaults(None, None).await?;
        let payload = json!({
            "permitMediaTypeID": defaults.type_id,
            "permitMediaCode": defaults.code,
            "licensePlate": {
                "Value": license_plate,
                "Name": name,
            },
            "updateLicensePlate": null,
        });

        let descriptor =
            RequestDescriptor::new(Method::POST, FAVORITE_UPSERT_PATH).with_body(payload);
        let data = self.client.execute(&descriptor).await?;
        self.refresh_defaults_if_present(data.as_ref()).await
    }

    /// Fetch the permit payload and refresh the media-defaults cache
    async fn fetch_permit(&self) -> Result<(Value, Value)> {
        let descriptor = RequestDescriptor::new(Method::POST, PERMIT_BASE_PATH);
        let payload = self.client.execute(&descriptor).await?.unwrap_or(Value::Null);

        let (permit, permit_media) = extract_permit_media(&payload)?;
        let permit = permit.clone();
        let permit_media = permit_media.clone();

        *self.defaults.write().await = Some(MediaDefaults::from_permit_media(&permit_media)?);
        Ok((permit, permit_media))
    }

    /// Resolve the media identifiers for a write payload
    ///
    /// Explicit values win; missing ones come from the cache, fetching the
    /// permit first when the cache is empty.
    async fn ensure_media_defaults(
        &self,
        type_id: Option<i64>,
        code: Option<String>,
    ) -> Result<MediaDefaults> {
        if let (Some(type_id), Some(code)) = (type_id, code.clone()) {
            return Ok(MediaDefaults { type_id, code });
        }

        let cached = match self.defaults.read().await.clone() {
            Some(defaults) => defaults,
            None => {
                self.fetch_permit().await?;
                self.defaults.read().await.clone().ok_or_else(|| {
                    CityPermitError::Parse("missing permit media defaults".into())
                })?
            }
        };

        Ok(MediaDefaults {
            type_id: type_id.unwrap_or(cached.type_id),
            code: code.unwrap_or(cached.code),
        })
    }

    /// Refresh the media-defaults cache from a write response, when it
    /// carries permit data at all
    async fn refresh_defaults_if_present(&self, payload: Option<&Value>) -> Result<()> {
        let Some(payload) = payload else {
            return Ok(());
        };
        if !carries_permit(payload) {
            return Ok(());
        }

        let (_permit, permit_media) = extract_permit_media(payload)?;
        *self.defaults.write().await = Some(MediaDefaults::from_permit_media(permit_media)?);
        Ok(())
    }
}

/// Pick the created reservation out of a permit payload
///
/// Matches by plate and the normalized requested times, falling back to the
/// first active reservation.
fn pick_reservation(
    payload: &Value,
    license_plate: &str,
    date_from: &DateTime<Utc>,
    date_until: Option<DateTime<Utc>>,
) -> Result<Reservation> {
    let (_permit, permit_media) = extract_permit_media(payload)?;
    let reservations = Reservation::list_from_permit_media(permit_media)?;
    if reservations.is_empty() {
        return Err(CityPermitError::Parse("no active reservations in response".into()));
    }

    let wanted_start = format_timestamp(date_from);
    let wanted_end = date_until.as_ref().map(format_timestamp);
    let matched = reservations.iter().find(|reservation| {
        reservation.license_plate == license_plate
            && reservation.start_time == wanted_start
            && wanted_end.as_ref().map_or(true, |end| &reservation.end_time == end)
    });

    Ok(matched.unwrap_or(&reservations[0]).clone())
}
