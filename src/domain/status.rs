// src/domain/status.rs

use crate::mls::FilterClause;

/// The one search intent a request resolves to, however the caller spelled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalStatus {
    ForSaleActive,
    ForLeaseActive,
    Sold,
    Leased,
}

impl CanonicalStatus {
    /// Lease-side statuses use rental price defaults.
    pub fn is_rental(self) -> bool {
        matches!(self, CanonicalStatus::ForLeaseActive | CanonicalStatus::Leased)
    }

    /// Provider clauses selecting listings in this status.
    ///
    /// Sold and leased listings both end up `Closed` in `StandardStatus`, so the
    /// sold clause must not narrow on `TransactionType`, and the leased clause
    /// only accepts `Closed` when the transaction was a lease.
    pub fn clauses(self) -> Vec<FilterClause> {
        match self {
            CanonicalStatus::ForSaleActive => vec![
                FilterClause::eq("StandardStatus", "Active"),
                FilterClause::eq("TransactionType", "For Sale"),
            ],
            CanonicalStatus::ForLeaseActive => vec![
                FilterClause::eq("StandardStatus", "Active"),
                FilterClause::eq("TransactionType", "For Lease"),
            ],
            CanonicalStatus::Sold => vec![FilterClause::any_of(vec![
                FilterClause::eq("MlsStatus", "Sold"),
                FilterClause::eq("StandardStatus", "Sold"),
                FilterClause::eq("StandardStatus", "Closed"),
            ])],
            CanonicalStatus::Leased => vec![FilterClause::any_of(vec![
                FilterClause::contains("MlsStatus", "Lease"),
                FilterClause::all_of(vec![
                    FilterClause::eq("StandardStatus", "Closed"),
                    FilterClause::eq("TransactionType", "For Lease"),
                ]),
            ])],
        }
    }
}

/// Historical status (`propertyStatus`), when recognised, wins over the
/// display status. Anything unrecognised ends up as an active sale search.
pub fn resolve_status(
    property_status: Option<&str>,
    status: &str,
) -> (CanonicalStatus, Vec<FilterClause>) {
    let canonical = property_status
        .and_then(historical_status)
        .unwrap_or_else(|| display_status_intent(status));
    (canonical, canonical.clauses())
}

fn historical_status(value: &str) -> Option<CanonicalStatus> {
    match value.trim().to_lowercase().as_str() {
        "sold" => Some(CanonicalStatus::Sold),
        "leased" | "rented" => Some(CanonicalStatus::Leased),
        _ => None,
    }
}

fn display_status_intent(value: &str) -> CanonicalStatus {
    match value.trim().to_lowercase().as_str() {
        "for sale" => CanonicalStatus::ForSaleActive,
        "for rent" | "for lease" => CanonicalStatus::ForLeaseActive,
        "sold" => CanonicalStatus::Sold,
        "leased" | "rented" => CanonicalStatus::Leased,
        _ => CanonicalStatus::ForSaleActive,
    }
}

/// Human label for a listing's status.
///
/// Precedence: `MlsStatus` first, then `StandardStatus` (with `Closed` and
/// `Off Market` split by `TransactionType`), then `TransactionType` alone,
/// then the title-cased `StandardStatus`.
pub fn display_status(mls_status: &str, standard_status: &str, transaction_type: &str) -> String {
    let mls = mls_status.trim().to_lowercase();
    let standard = standard_status.trim().to_lowercase();
    let is_lease = transaction_type.to_lowercase().contains("lease");

    if mls.contains("sold") {
        return "Sold".to_string();
    }
    if mls.contains("leased") || mls.contains("rented") || mls.contains("lease") {
        return "Leased".to_string();
    }

    match standard.as_str() {
        "sold" => return "Sold".to_string(),
        "leased" | "rented" => return "Leased".to_string(),
        "lease" => return "For Rent".to_string(),
        "pending" => return "Pending".to_string(),
        "closed" | "off market" => {
            return if is_lease { "Leased" } else { "Sold" }.to_string();
        }
        "active" => {
            return if is_lease { "For Rent" } else { "For Sale" }.to_string();
        }
        _ => {}
    }

    match transaction_type.trim().to_lowercase().as_str() {
        "for lease" | "for rent" => return "For Rent".to_string(),
        "for sale" => return "For Sale".to_string(),
        _ => {}
    }

    title_case(standard_status)
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
