// src/domain/slug.rs

use crate::domain::listing::ListingRecord;

/// URL slug for a listing, e.g. `65-bremner-blvd-toronto-c1234567`.
/// The listing key is always the last segment so it can be recovered.
pub fn property_slug(record: &ListingRecord) -> String {
    let parts = [
        record.street_number.as_str(),
        record.street_name.as_str(),
        record.street_suffix.as_str(),
        record.city.as_str(),
        record.listing_key.as_str(),
    ];
    slugify(&parts.join(" "))
}

pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    out
}

/// Recovers the listing key from either a slug or a bare key.
/// Keys are alphanumeric, at least six characters, and contain a digit.
pub fn listing_key_from_slug(slug: &str) -> Option<String> {
    let candidate = slug.trim().trim_matches('/').rsplit('-').next()?;

    let looks_like_key = candidate.len() >= 6
        && candidate.chars().all(|c| c.is_ascii_alphanumeric())
        && candidate.chars().any(|c| c.is_ascii_digit());

    looks_like_key.then(|| candidate.to_ascii_uppercase())
}
