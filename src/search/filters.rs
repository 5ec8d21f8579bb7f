// src/search/filters.rs

use crate::domain::status::{resolve_status, CanonicalStatus};
use crate::mls::{FilterClause, OrderBy, ProviderQuery};
use crate::search::location::resolve_location;
use crate::search::request::{SearchRequest, MAX_PAGE_SIZE};
use crate::search::viewport::{city_for_bounds, FALLBACK_CITY};

/// Fields requested for search cards and map pins.
pub const PROPERTY_SELECT: &[&str] = &[
    "ListingKey",
    "StreetNumber",
    "StreetName",
    "StreetSuffix",
    "UnitNumber",
    "City",
    "StateOrProvince",
    "PostalCode",
    "UnparsedAddress",
    "ListPrice",
    "ClosePrice",
    "BedroomsTotal",
    "BathroomsTotalInteger",
    "LivingAreaRange",
    "BuildingAreaTotal",
    "StandardStatus",
    "MlsStatus",
    "TransactionType",
    "PropertyType",
    "PropertySubType",
    "ListingContractDate",
    "Latitude",
    "Longitude",
    "OpenHouseDate",
    "OpenHouseStartTime",
    "OpenHouseEndTime",
];

pub const SALE_PRICE_FLOOR: i64 = 50_000;
pub const RENTAL_PRICE_FLOOR: i64 = 1;
pub const RENTAL_PRICE_CEILING: i64 = 10_000;
pub const MIN_CALLER_PRICE: i64 = 2;
/// A rental max above this is a sale-search ceiling leaking across.
pub const LEAKED_SALE_CEILING: i64 = 50_000;

/// Buildings that share one street name and are searched as a pair.
/// (street number as typed, street name prefix, numbers to match)
const SHARED_ADDRESS_BUILDINGS: &[(&str, &str, &[&str])] = &[("15 & 35", "mercer", &["15", "35"])];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Newest,
    PriceHigh,
    PriceLow,
    Bedrooms,
    Bathrooms,
    Sqft,
}

impl SortKey {
    /// Unknown or missing keys sort newest first.
    pub fn parse(value: Option<&str>) -> Self {
        let key = value
            .map(|v| v.trim().to_lowercase().replace('_', "-"))
            .unwrap_or_default();
        match key.as_str() {
            "price-high" => SortKey::PriceHigh,
            "price-low" => SortKey::PriceLow,
            "bedrooms" => SortKey::Bedrooms,
            "bathrooms" => SortKey::Bathrooms,
            "sqft" => SortKey::Sqft,
            _ => SortKey::Newest,
        }
    }

    pub fn order_by(self) -> OrderBy {
        match self {
            SortKey::Newest => OrderBy::desc("ListingContractDate"),
            SortKey::PriceHigh => OrderBy::desc("ListPrice"),
            SortKey::PriceLow => OrderBy::asc("ListPrice"),
            SortKey::Bedrooms => OrderBy::desc("BedroomsTotal"),
            SortKey::Bathrooms => OrderBy::desc("BathroomsTotalInteger"),
            SortKey::Sqft => OrderBy::desc("BuildingAreaTotal"),
        }
    }
}

/// Translates a search request into one provider query.
///
/// Clause order is fixed: status, location, property type, price, bedrooms,
/// bathrooms.
pub fn build_query(request: &SearchRequest) -> ProviderQuery {
    let (status, mut filters) = resolve_status(request.property_status.as_deref(), &request.status);

    filters.extend(location_clauses(request));
    filters.extend(property_type_clause(&request.property_types));
    filters.extend(price_clauses(status, request.price_min, request.price_max));

    if request.bedrooms > 0 {
        filters.push(FilterClause::ge("BedroomsTotal", request.bedrooms));
    }
    if request.bathrooms > 0 {
        filters.push(FilterClause::ge("BathroomsTotalInteger", request.bathrooms));
    }

    let query = ProviderQuery::new(filters, PROPERTY_SELECT);
    let query = apply_paging(query, request.page(), request.page_size());
    apply_sort(query, SortKey::parse(request.sort.as_deref()))
}

pub fn apply_paging(mut query: ProviderQuery, page: u32, page_size: u32) -> ProviderQuery {
    let page = page.max(1);
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    query.top = page_size;
    query.skip = (page - 1).saturating_mul(page_size);
    query.count = true;
    query
}

pub fn apply_sort(mut query: ProviderQuery, key: SortKey) -> ProviderQuery {
    query.order_by = Some(key.order_by());
    query
}

fn location_clauses(request: &SearchRequest) -> Vec<FilterClause> {
    if let Some((number, name)) = request.building() {
        return building_clauses(number, name);
    }

    let resolved = resolve_location(&request.query);
    if !resolved.is_empty() {
        return resolved;
    }

    let city = request
        .viewport_bounds
        .as_ref()
        .map(city_for_bounds)
        .unwrap_or(FALLBACK_CITY);
    vec![FilterClause::contains("City", city)]
}

/// Exact building search. Free text and neighbourhoods are ignored here.
fn building_clauses(number: &str, name: &str) -> Vec<FilterClause> {
    let number_clause = shared_address_numbers(number, name)
        .map(|numbers| {
            FilterClause::any_of(
                numbers
                    .iter()
                    .map(|n| FilterClause::eq("StreetNumber", *n))
                    .collect(),
            )
        })
        .unwrap_or_else(|| FilterClause::eq("StreetNumber", number));

    vec![
        number_clause,
        FilterClause::contains("StreetName", name),
        FilterClause::contains("City", FALLBACK_CITY),
    ]
}

fn shared_address_numbers(number: &str, name: &str) -> Option<&'static [&'static str]> {
    let number = number.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = name.trim().to_lowercase();
    SHARED_ADDRESS_BUILDINGS
        .iter()
        .find(|(typed, prefix, _)| *typed == number && name.starts_with(prefix))
        .map(|(_, _, numbers)| *numbers)
}

fn property_type_clause(types: &[String]) -> Option<FilterClause> {
    let types: Vec<&str> = types
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();

    match types.as_slice() {
        [] => None,
        [single] => Some(FilterClause::eq("PropertySubType", *single)),
        many => Some(FilterClause::Or(
            many.iter()
                .map(|t| FilterClause::eq("PropertySubType", *t))
                .collect(),
        )),
    }
}

/// Price window for a status.
///
/// Bounds of zero or less count as absent. With no caller bounds, sales start at 50,000 and everything else sits in
/// 1..=10,000. With caller bounds, the minimum is at least 2 (the status floor
/// when omitted) and a rental maximum above 50,000 is pulled back to 10,000.
pub fn price_clauses(
    status: CanonicalStatus,
    min: Option<i64>,
    max: Option<i64>,
) -> Vec<FilterClause> {
    let min = min.filter(|m| *m > 0);
    let max = max.filter(|m| *m > 0);

    if min.is_none() && max.is_none() {
        return match status {
            CanonicalStatus::ForSaleActive => {
                vec![FilterClause::ge("ListPrice", SALE_PRICE_FLOOR)]
            }
            _ => vec![
                FilterClause::ge("ListPrice", RENTAL_PRICE_FLOOR),
                FilterClause::le("ListPrice", RENTAL_PRICE_CEILING),
            ],
        };
    }

    let floor = match status {
        CanonicalStatus::ForSaleActive => SALE_PRICE_FLOOR,
        _ => RENTAL_PRICE_FLOOR,
    };
    let min = min.map(|m| m.max(MIN_CALLER_PRICE)).unwrap_or(floor);

    let max = max.map(|m| {
        if status.is_rental() && m > LEAKED_SALE_CEILING {
            RENTAL_PRICE_CEILING
        } else {
            m
        }
    });

    let mut clauses = vec![FilterClause::ge("ListPrice", min)];
    if let Some(max) = max {
        clauses.push(FilterClause::le("ListPrice", max));
    }
    clauses
}
