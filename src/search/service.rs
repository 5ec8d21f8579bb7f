// src/search/service.rs

use crate::domain::formatted::{format, FormattedProperty};
use crate::domain::listing::ListingRecord;
use crate::errors::ServerError;
use crate::mls::{FilterClause, ProviderGateway, ProviderQuery};
use crate::search::filters::{build_query, PROPERTY_SELECT};
use crate::search::images::{ImageAggregator, ImageSize};
use crate::search::request::SearchRequest;
use chrono::NaiveDate;
use serde::Serialize;

/// Photos returned with a property detail.
const DETAIL_IMAGE_LIMIT: usize = 50;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub properties: Vec<FormattedProperty>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_properties: Option<Vec<FormattedProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PropertyDetail {
    pub success: bool,
    pub property: FormattedProperty,
    pub description: String,
}

/// Runs searches and detail lookups against one provider.
pub struct SearchService<'a> {
    gateway: &'a dyn ProviderGateway,
    images: ImageAggregator<'a>,
}

impl<'a> SearchService<'a> {
    pub fn new(gateway: &'a dyn ProviderGateway, images: ImageAggregator<'a>) -> Self {
        Self { gateway, images }
    }

    /// One provider attempt for the requested page. A listings search on page
    /// one also fetches page two, so the map can show twice the page size.
    pub fn search(
        &self,
        request: &SearchRequest,
        today: NaiveDate,
    ) -> Result<SearchResponse, ServerError> {
        request.validate()?;

        let query = build_query(request);
        let page = self
            .gateway
            .query_properties(&query)
            .map_err(|e| ServerError::Provider(format!("Search failed: {e}")))?;

        let page_len = page.records.len();
        let mut records = page.records;

        let wants_map_page = request.is_listings_search() && request.page() == 1;
        if wants_map_page && (page_len as u64) < page.total {
            records.extend(self.fetch_map_page(&query));
        }

        let keys: Vec<String> = records.iter().map(|r| r.listing_key.clone()).collect();
        let images = self.images.attach_images(&keys, ImageSize::Large);
        let warning = (images.failed_batches > 0).then(|| {
            format!(
                "Images unavailable for {} batch(es); placeholders shown",
                images.failed_batches
            )
        });

        let mut formatted: Vec<FormattedProperty> = records
            .iter()
            .map(|r| {
                let found = images.get(&r.listing_key);
                format(r, found.primary.as_deref(), &found.images, today)
            })
            .collect();

        let map_properties = if wants_map_page {
            Some(formatted.clone())
        } else {
            None
        };
        formatted.truncate(page_len);

        let has_more = (query.skip as u64) + (page_len as u64) < page.total;
        log::info!(
            "🔎 search {:?} page {} -> {} of {}",
            request.query,
            request.page(),
            page_len,
            page.total
        );

        Ok(SearchResponse {
            success: true,
            properties: formatted,
            total: page.total,
            page: request.page(),
            page_size: request.page_size(),
            has_more,
            map_properties,
            warning,
        })
    }

    /// Second request for the map. Its failure only costs the extra pins.
    fn fetch_map_page(&self, query: &ProviderQuery) -> Vec<ListingRecord> {
        match self.gateway.query_properties(&query.next_page()) {
            Ok(next) => next.records,
            Err(e) => {
                log::warn!("⚠️ Map page fetch failed: {e}");
                Vec::new()
            }
        }
    }

    /// A single listing with its full photo set.
    pub fn property_detail(
        &self,
        listing_key: &str,
        today: NaiveDate,
    ) -> Result<PropertyDetail, ServerError> {
        let mut select = PROPERTY_SELECT.to_vec();
        select.push("PublicRemarks");

        let mut query =
            ProviderQuery::new(vec![FilterClause::eq("ListingKey", listing_key)], &select);
        query.top = 1;

        let page = self
            .gateway
            .query_properties(&query)
            .map_err(|e| ServerError::Provider(format!("Property lookup failed: {e}")))?;
        let record = page.records.into_iter().next().ok_or(ServerError::NotFound)?;

        let key = vec![record.listing_key.clone()];
        let mut images = self
            .images
            .attach_images(&key, ImageSize::Largest)
            .get(&record.listing_key);
        images.images.truncate(DETAIL_IMAGE_LIMIT);

        Ok(PropertyDetail {
            success: true,
            property: format(&record, images.primary.as_deref(), &images.images, today),
            description: record.public_remarks.clone(),
        })
    }
}
