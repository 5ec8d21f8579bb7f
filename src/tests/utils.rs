use crate::config::{Config, ImageConfig, ProviderConfig};
use crate::domain::listing::ListingRecord;
use crate::mls::gateway::PropertyPage;
use crate::mls::{MediaRecord, ProviderError, ProviderGateway, ProviderQuery};
use crate::router::AppState;
use crate::search::images::image_pool;
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;
use std::sync::Mutex;
use std::time::Duration;

/// In-memory provider. Records every query it receives.
#[derive(Default)]
pub struct FakeGateway {
    pub properties: Vec<ListingRecord>,
    pub media: Vec<MediaRecord>,
    pub fail_properties: bool,
    /// Fail only queries past the first page (`$skip > 0`).
    pub fail_paged_queries: bool,
    /// Any media request naming one of these keys fails.
    pub failing_media_keys: Vec<String>,
    pub property_log: Mutex<Vec<ProviderQuery>>,
    pub media_log: Mutex<Vec<ProviderQuery>>,
}

impl FakeGateway {
    pub fn property_queries(&self) -> Vec<ProviderQuery> {
        self.property_log.lock().unwrap().clone()
    }

    pub fn media_calls(&self) -> usize {
        self.media_log.lock().unwrap().len()
    }
}

impl ProviderGateway for FakeGateway {
    fn query_properties(&self, query: &ProviderQuery) -> Result<PropertyPage, ProviderError> {
        self.property_log.lock().unwrap().push(query.clone());
        if self.fail_properties || (self.fail_paged_queries && query.skip > 0) {
            return Err(ProviderError::Status {
                status: 503,
                body: "upstream unavailable".into(),
            });
        }

        let filter = query.filter_string();
        let matching: Vec<ListingRecord> = self
            .properties
            .iter()
            .filter(|p| {
                !filter.contains("ListingKey eq")
                    || filter.contains(&format!("ListingKey eq '{}'", p.listing_key))
            })
            .cloned()
            .collect();

        let top = if query.top == 0 {
            usize::MAX
        } else {
            query.top as usize
        };
        Ok(PropertyPage {
            total: matching.len() as u64,
            records: matching
                .into_iter()
                .skip(query.skip as usize)
                .take(top)
                .collect(),
        })
    }

    fn query_media(&self, query: &ProviderQuery) -> Result<Vec<MediaRecord>, ProviderError> {
        self.media_log.lock().unwrap().push(query.clone());
        let filter = query.filter_string();

        if let Some(key) = self
            .failing_media_keys
            .iter()
            .find(|k| filter.contains(&format!("'{k}'")))
        {
            return Err(ProviderError::Network(format!("media for {key} timed out")));
        }

        Ok(self
            .media
            .iter()
            .filter(|m| {
                m.resource_record_key
                    .as_deref()
                    .is_some_and(|k| filter.contains(&format!("'{k}'")))
            })
            .cloned()
            .collect())
    }
}

pub fn media(key: &str, url: &str, order: i64) -> MediaRecord {
    MediaRecord {
        resource_record_key: Some(key.to_string()),
        media_key: Some(format!("{key}-{order}")),
        media_url: Some(url.to_string()),
        order: Some(order),
        image_size_description: None,
        media_category: Some("Photo".to_string()),
    }
}

/// An active Toronto condo listing.
pub fn listing(key: &str) -> ListingRecord {
    ListingRecord {
        listing_key: key.to_string(),
        street_number: "65".to_string(),
        street_name: "Bremner".to_string(),
        street_suffix: "Blvd".to_string(),
        city: "Toronto".to_string(),
        province: "ON".to_string(),
        postal_code: "M5J 0A7".to_string(),
        list_price: Some(849_000.0),
        bedrooms: 2,
        bathrooms: 2,
        property_type: "Residential Condo & Other".to_string(),
        property_sub_type: "Condo Apartment".to_string(),
        standard_status: "Active".to_string(),
        transaction_type: "For Sale".to_string(),
        latitude: Some(43.6415),
        longitude: Some(-79.3832),
        ..Default::default()
    }
}

pub fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        max_workers: 1,
        provider: ProviderConfig {
            base_url: "http://localhost/odata".to_string(),
            token: "test-token".to_string(),
            connect_timeout: Duration::from_secs(1),
            timeout: Duration::from_secs(1),
        },
        images: ImageConfig::default(),
    }
}

pub fn test_pool() -> rayon::ThreadPool {
    image_pool(2).expect("image pool")
}

pub fn test_state(gateway: FakeGateway) -> AppState {
    AppState {
        config: test_config(),
        gateway: Box::new(gateway),
        image_pool: test_pool(),
    }
}

pub fn get(uri: &str) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

pub fn post_json(uri: &str, body: &str) -> Request {
    let mut req = Request::new(Body::from(body.to_string()));
    *req.method_mut() = Method::POST;
    *req.uri_mut() = uri.parse().unwrap();
    req.headers_mut()
        .insert("Content-Type", "application/json".parse().unwrap());
    req
}

/// Reads a response body back into JSON.
pub fn body_json(resp: Response) -> serde_json::Value {
    let mut buf = Vec::new();
    resp.into_body()
        .reader()
        .read_to_end(&mut buf)
        .expect("read body");
    serde_json::from_slice(&buf).expect("json body")
}
