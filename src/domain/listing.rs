// src/domain/listing.rs

use crate::mls::models::{MediaRecord, RawProperty};
use chrono::{DateTime, NaiveDate};
use serde::Serialize;

/// One image belonging to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    pub media_url: String,
    pub media_key: String,
}

/// A provider listing, flattened and normalized once at the gateway boundary.
/// Everything downstream reads these fields directly instead of probing the
/// raw payload for alternative spellings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingRecord {
    pub listing_key: String,

    // Address
    pub street_number: String,
    pub street_name: String,
    pub street_suffix: String,
    pub unit_number: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub unparsed_address: String,

    // Details
    pub list_price: Option<f64>,
    pub close_price: Option<f64>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub living_area_range: String,
    pub building_area_total: Option<f64>,
    pub property_type: String,
    pub property_sub_type: String,
    pub public_remarks: String,

    // Status vocabulary
    pub standard_status: String,
    pub mls_status: String,
    pub transaction_type: String,

    pub listing_contract_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub open_house_date: Option<NaiveDate>,
    pub open_house_start_time: String,
    pub open_house_end_time: String,
}

impl ListingRecord {
    /// Creates a clean `ListingRecord` from the raw provider model.
    /// Only the listing key is required; everything else defaults.
    pub fn from_raw(raw: RawProperty) -> Result<Self, String> {
        let listing_key = clean(raw.listing_key);
        if listing_key.is_empty() {
            return Err("Missing or empty ListingKey".to_string());
        }

        Ok(ListingRecord {
            listing_key,
            street_number: clean(raw.street_number),
            street_name: clean(raw.street_name),
            street_suffix: clean(raw.street_suffix),
            unit_number: clean(raw.unit_number),
            city: clean(raw.city),
            province: clean(raw.state_or_province),
            postal_code: clean(raw.postal_code),
            unparsed_address: clean(raw.unparsed_address),
            list_price: raw.list_price.filter(|p| p.is_finite()),
            close_price: raw.close_price.filter(|p| p.is_finite()),
            bedrooms: count(raw.bedrooms_total),
            bathrooms: count(raw.bathrooms_total),
            living_area_range: clean(raw.living_area_range),
            building_area_total: raw.building_area_total.filter(|a| a.is_finite() && *a > 0.0),
            property_type: clean(raw.property_type),
            property_sub_type: clean(raw.property_sub_type),
            public_remarks: clean(raw.public_remarks),
            standard_status: clean(raw.standard_status),
            mls_status: clean(raw.mls_status),
            transaction_type: clean(raw.transaction_type),
            listing_contract_date: raw.listing_contract_date.as_deref().and_then(parse_date),
            latitude: raw.latitude.filter(|v| v.is_finite()),
            longitude: raw.longitude.filter(|v| v.is_finite()),
            open_house_date: raw.open_house_date.as_deref().and_then(parse_date),
            open_house_start_time: clean(raw.open_house_start_time),
            open_house_end_time: clean(raw.open_house_end_time),
        })
    }
}

/// Converts a media row into an image, skipping rows without a URL.
pub fn image_entry(m: &MediaRecord) -> Option<ImageEntry> {
    let url = m.media_url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
    Some(ImageEntry {
        media_url: url.to_string(),
        media_key: m.media_key.clone().unwrap_or_default(),
    })
}

fn clean(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn count(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.floor() as u32,
        _ => 0,
    }
}

/// Accepts plain `YYYY-MM-DD` dates and full RFC 3339 timestamps.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
