//! Parking zone record

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parse::{ensure_array, ensure_object, parse_str};
use crate::errors::{CityPermitError, Result};
use crate::utils::time::{format_timestamp, parse_timestamp};

/// Parking zone data with the paid block for the current day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone code
    pub id: String,
    /// Start of today's paid block, canonical UTC
    pub start_time: String,
    /// End of today's paid block, canonical UTC
    pub end_time: String,
}

impl Zone {
    /// Build a zone from a permit mapping
    ///
    /// Scans `BlockTimes` for paid (`IsFree != true`) blocks starting today;
    /// "today" is evaluated in each block's own UTC offset. Returns `None`
    /// when no paid block falls on the current day.
    ///
    /// # Errors
    ///
    /// Returns `Parse` on any field-shape violation or unparseable block
    /// timestamp.
    pub fn from_permit(permit: &Value) -> Result<Option<Self>> {
        let data = ensure_object(permit, "permit")?;
        let zone_code = parse_str(data.get("ZoneCode"), "permit.ZoneCode")?;

        let block_times = data
            .get("BlockTimes")
            .ok_or_else(|| CityPermitError::Parse("expected permit.BlockTimes list".into()))?;

        let mut paid_blocks = Vec::new();
        for item in ensure_array(block_times, "permit.BlockTimes")? {
            let block = ensure_object(item, "permit.BlockTimes item")?;
            if block.get("IsFree") == Some(&Value::Bool(true)) {
                continue;
            }

            let start_raw = parse_str(block.get("ValidFrom"), "block.ValidFrom")?;
            let end_raw = parse_str(block.get("ValidUntil"), "block.ValidUntil")?;
            let start = parse_timestamp(&start_raw, "block.ValidFrom")?;
            let end = parse_timestamp(&end_raw, "block.ValidUntil")?;

            let today = Utc::now().with_timezone(start.offset()).date_naive();
            if start.date_naive() != today {
                continue;
            }
            paid_blocks.push((start, end));
        }

        let Some((start, end)) = paid_blocks.into_iter().min_by_key(|(start, _)| *start) else {
            return Ok(None);
        };

        Ok(Some(Self {
            id: zone_code,
            start_time: format_timestamp(&start.to_utc()),
            end_time: format_timestamp(&end.to_utc()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};

    use super::*;

    fn permit_with_blocks(blocks: Vec<Value>) -> Value {
        json!({"ZoneCode": "zone 4", "BlockTimes": blocks})
    }

    fn block(start: &str, end: &str, is_free: bool) -> Value {
        json!({"ValidFrom": start, "ValidUntil": end, "IsFree": is_free})
    }

    fn today_at(hour: u32) -> String {
        let date = Utc::now().date_naive();
        format!("{}T{:02}:00:00Z", date, hour)
    }

    #[test]
    fn returns_todays_paid_block() {
        let permit = permit_with_blocks(vec![block(&today_at(18), &today_at(23), false)]);

        let zone = Zone::from_permit(&permit).unwrap().unwrap();
        assert_eq!(zone.id, "zone 4");
        assert_eq!(zone.start_time, today_at(18));
        assert_eq!(zone.end_time, today_at(23));
    }

    #[test]
    fn skips_free_blocks() {
        let permit = permit_with_blocks(vec![block(&today_at(8), &today_at(12), true)]);
        assert_eq!(Zone::from_permit(&permit).unwrap(), None);
    }

    #[test]
    fn skips_blocks_on_other_days() {
        let yesterday = (Utc::now() - Duration::days(1)).date_naive();
        let permit = permit_with_blocks(vec![block(
            &format!("{yesterday}T18:00:00Z"),
            &format!("{yesterday}T23:00:00Z"),
            false,
        )]);
        assert_eq!(Zone::from_permit(&permit).unwrap(), None);
    }

    #[test]
    fn picks_earliest_paid_block() {
        let permit = permit_with_blocks(vec![
            block(&today_at(20), &today_at(23), false),
            block(&today_at(9), &today_at(12), false),
        ]);

        let zone = Zone::from_permit(&permit).unwrap().unwrap();
        assert_eq!(zone.start_time, today_at(9));
    }

    #[test]
    fn missing_block_times_fail_closed() {
        let permit = json!({"ZoneCode": "zone 4"});
        assert!(Zone::from_permit(&permit).is_err());
    }
}
