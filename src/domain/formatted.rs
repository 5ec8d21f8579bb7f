// src/domain/formatted.rs

use crate::domain::listing::{ImageEntry, ListingRecord};
use crate::domain::slug::property_slug;
use crate::domain::status::display_status;
use chrono::NaiveDate;
use serde::Serialize;

/// The flat shape the front end renders for a card or detail page.
/// Every field has a default, so formatting a sparse record never fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedProperty {
    pub listing_key: String,
    pub slug: String,

    // === Address ===
    pub address: String,
    pub street_number: String,
    pub street_name: String,
    pub unit_number: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,

    // === Details ===
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: String,
    pub property_type: String,
    pub property_sub_type: String,
    pub transaction_type: String,
    pub standard_status: String,
    pub days_on_market: i64,

    // === Images ===
    pub image_url: Option<String>,
    pub images: Vec<ImageEntry>,

    // === Computed labels ===
    #[serde(rename = "formatted_status")]
    pub formatted_status: String,
    #[serde(rename = "has_open_house")]
    pub has_open_house: bool,
}

/// Formats one listing with the images resolved for it.
pub fn format(
    record: &ListingRecord,
    primary: Option<&str>,
    images: &[ImageEntry],
    today: NaiveDate,
) -> FormattedProperty {
    let price = record
        .list_price
        .or(record.close_price)
        .map(|p| p.round() as i64)
        .unwrap_or(0);

    FormattedProperty {
        listing_key: record.listing_key.clone(),
        slug: property_slug(record),
        address: display_address(record),
        street_number: record.street_number.clone(),
        street_name: record.street_name.clone(),
        unit_number: record.unit_number.clone(),
        city: record.city.clone(),
        province: record.province.clone(),
        postal_code: record.postal_code.clone(),
        latitude: record.latitude.unwrap_or(0.0),
        longitude: record.longitude.unwrap_or(0.0),
        price,
        bedrooms: record.bedrooms,
        bathrooms: record.bathrooms,
        area: area(record),
        property_type: record.property_type.clone(),
        property_sub_type: record.property_sub_type.clone(),
        transaction_type: record.transaction_type.clone(),
        standard_status: record.standard_status.clone(),
        days_on_market: days_on_market(record.listing_contract_date, today),
        image_url: primary.map(str::to_string),
        images: images.to_vec(),
        formatted_status: display_status(
            &record.mls_status,
            &record.standard_status,
            &record.transaction_type,
        ),
        has_open_house: has_open_house(record, today),
    }
}

/// Whole days since the contract date, never negative.
pub fn days_on_market(listed: Option<NaiveDate>, today: NaiveDate) -> i64 {
    listed
        .map(|date| (today - date).num_days().max(0))
        .unwrap_or(0)
}

pub fn has_open_house(record: &ListingRecord, today: NaiveDate) -> bool {
    if record.open_house_date.is_some_and(|date| date >= today) {
        return true;
    }
    !record.open_house_start_time.is_empty() || !record.open_house_end_time.is_empty()
}

fn display_address(record: &ListingRecord) -> String {
    if !record.unparsed_address.is_empty() {
        return record.unparsed_address.clone();
    }

    let street = [
        record.street_number.as_str(),
        record.street_name.as_str(),
        record.street_suffix.as_str(),
    ]
    .iter()
    .filter(|s| !s.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ");

    let street = if record.unit_number.is_empty() || street.is_empty() {
        street
    } else {
        format!("{} - {}", record.unit_number, street)
    };

    [street.as_str(), record.city.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn area(record: &ListingRecord) -> String {
    if !record.living_area_range.is_empty() {
        return record.living_area_range.clone();
    }
    record
        .building_area_total
        .map(|a| format!("{}", a.round() as i64))
        .unwrap_or_default()
}
