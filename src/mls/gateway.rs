// gateway.rs
use crate::config::ProviderConfig;
use crate::domain::listing::ListingRecord;
use crate::mls::models::{MediaRecord, ODataPage, RawProperty};
use crate::mls::odata::ProviderQuery;
use crate::mls::ProviderError;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use url::Url;

const USER_AGENT: &str = concat!("listing_search/", env!("CARGO_PKG_VERSION"));

/// One page of property results plus the provider's total match count.
#[derive(Debug, Default)]
pub struct PropertyPage {
    pub records: Vec<ListingRecord>,
    pub total: u64,
}

/// The MLS provider as the search core sees it. Implementations must be
/// shareable across the image fan-out threads.
pub trait ProviderGateway: Send + Sync {
    fn query_properties(&self, query: &ProviderQuery) -> Result<PropertyPage, ProviderError>;
    fn query_media(&self, query: &ProviderQuery) -> Result<Vec<MediaRecord>, ProviderError>;
}

/// Live gateway against the AMPRE OData endpoint.
pub struct AmpreGateway {
    client: Client,
    base_url: Url,
    token: String,
}

impl AmpreGateway {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        if config.token.trim().is_empty() {
            return Err(ProviderError::Config("AMPRE_API_TOKEN is empty".into()));
        }

        // `Url::join` replaces the last segment unless the base ends in '/'.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| ProviderError::Config(format!("Invalid AMPRE_API_URL {base}: {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    fn get_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &ProviderQuery,
    ) -> Result<ODataPage<T>, ProviderError> {
        let url = self
            .base_url
            .join(resource)
            .map_err(|e| ProviderError::Config(e.to_string()))?;
        let params = query.to_params();

        log::debug!("AMPRE {resource} request: {params:?}");
        let start = std::time::Instant::now();

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, mime::APPLICATION_JSON.as_ref())
            .query(&params)
            .send()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text.chars().take(500).collect(),
            });
        }

        log::debug!("AMPRE {resource} answered {status} in {:?}", start.elapsed());

        serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

impl ProviderGateway for AmpreGateway {
    fn query_properties(&self, query: &ProviderQuery) -> Result<PropertyPage, ProviderError> {
        let page: ODataPage<RawProperty> = self.get_page("Property", query)?;
        let fetched = page.value.len() as u64;
        Ok(normalize_page(page.value, page.count.unwrap_or(fetched)))
    }

    fn query_media(&self, query: &ProviderQuery) -> Result<Vec<MediaRecord>, ProviderError> {
        let page: ODataPage<MediaRecord> = self.get_page("Media", query)?;
        Ok(page.value)
    }
}

/// Normalizes raw rows, skipping (and logging) ones that cannot be identified.
pub fn normalize_page(raw: Vec<RawProperty>, total: u64) -> PropertyPage {
    let records = raw
        .into_iter()
        .filter_map(|r| match ListingRecord::from_raw(r) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping provider record: {e}");
                None
            }
        })
        .collect();

    PropertyPage { records, total }
}
