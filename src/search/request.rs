// src/search/request.rs

use crate::errors::ServerError;
use crate::search::viewport::ViewportBounds;
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 50;

/// What the front end posts to `/api/search`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub query: String,
    pub status: String,
    /// Historical status ("Sold" / "Leased"); overrides `status` when set.
    pub property_status: Option<String>,
    pub property_types: Vec<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub sort: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub viewport_bounds: Option<ViewportBounds>,
    /// "listings" turns on the extra map page fetch.
    pub search_type: Option<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            status: "For Sale".to_string(),
            property_status: None,
            property_types: Vec::new(),
            price_min: None,
            price_max: None,
            bedrooms: 0,
            bathrooms: 0,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            street_number: None,
            street_name: None,
            viewport_bounds: None,
            search_type: None,
        }
    }
}

impl SearchRequest {
    pub fn validate(&self) -> Result<(), ServerError> {
        if let Some(bounds) = &self.viewport_bounds {
            bounds.validate()?;
        }
        if let (Some(min), Some(max)) = (self.price_min, self.price_max) {
            if max > 0 && min > max {
                return Err(ServerError::BadRequest(
                    "priceMin must not exceed priceMax".into(),
                ));
            }
        }

        let has_number = non_empty(self.street_number.as_deref()).is_some();
        let has_name = non_empty(self.street_name.as_deref()).is_some();
        if has_number != has_name {
            return Err(ServerError::BadRequest(
                "streetNumber and streetName must be given together".into(),
            ));
        }
        Ok(())
    }

    /// 1-based page, with 0 read as the first page.
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn is_listings_search(&self) -> bool {
        self.search_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("listings"))
    }

    /// Exact building search, when both parts are present.
    pub fn building(&self) -> Option<(&str, &str)> {
        Some((
            non_empty(self.street_number.as_deref())?,
            non_empty(self.street_name.as_deref())?,
        ))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
