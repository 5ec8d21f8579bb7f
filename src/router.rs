use crate::config::Config;
use crate::domain::slug::listing_key_from_slug;
use crate::errors::ServerError;
use crate::mls::ProviderGateway;
use crate::responses::{json_ok, ResultResp};
use crate::search::images::{ImageAggregator, ImageSize, MAX_BATCH_KEYS};
use crate::search::request::SearchRequest;
use crate::search::service::SearchService;
use crate::search::viewport::{city_for_bounds, ViewportBounds};
use astra::Request;
use serde::Deserialize;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

/// Largest JSON body accepted from the client.
const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Shared by every worker thread.
pub struct AppState {
    pub config: Config,
    pub gateway: Box<dyn ProviderGateway>,
    /// Shared by all requests, so its size bounds media calls server-wide.
    pub image_pool: rayon::ThreadPool,
}

impl AppState {
    fn images(&self) -> ImageAggregator<'_> {
        ImageAggregator::new(
            self.gateway.as_ref(),
            &self.image_pool,
            self.config.images.batch_size,
            &self.config.images.placeholder_url,
        )
    }

    fn service(&self) -> SearchService<'_> {
        SearchService::new(self.gateway.as_ref(), self.images())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageBatchRequest {
    #[serde(default)]
    listing_keys: Vec<String>,
    size: Option<String>,
    limit: Option<usize>,
}

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    log::debug!("{method} {path}");

    match (method.as_str(), path.as_str()) {
        ("GET", "/health") => json_ok(&json!({ "status": "ok" })),

        ("POST", "/api/search") => {
            let request: SearchRequest = read_json(&mut req)?;
            let response = state.service().search(&request, today())?;
            json_ok(&response)
        }

        ("POST", "/api/images/batch") => {
            let body: ImageBatchRequest = read_json(&mut req)?;
            let keys = clean_keys(body.listing_keys)?;
            let images = state.images().image_lists(
                &keys,
                ImageSize::parse(body.size.as_deref()),
                body.limit,
            );
            json_ok(&json!({ "success": true, "images": images }))
        }

        ("GET", "/api/images") => {
            let params = parse_query(&req);
            let keys = params
                .get("keys")
                .map(|v| v.split(',').map(str::to_string).collect())
                .unwrap_or_default();
            let keys = clean_keys(keys)?;
            let images: BTreeMap<String, String> = state.images().primary_images(
                &keys,
                ImageSize::parse(params.get("size").map(String::as_str)),
            );
            json_ok(&json!({ "success": true, "images": images }))
        }

        ("GET", "/api/viewport-city") => {
            let bounds = viewport_from_query(&parse_query(&req))?;
            json_ok(&json!({ "city": city_for_bounds(&bounds) }))
        }

        ("GET", p) if p.starts_with("/api/properties/") => {
            let slug = &p["/api/properties/".len()..];
            let key = listing_key_from_slug(slug).ok_or(ServerError::NotFound)?;
            let detail = state.service().property_detail(&key, today())?;
            json_ok(&detail)
        }

        _ => Err(ServerError::NotFound),
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn read_json<T: serde::de::DeserializeOwned>(req: &mut Request) -> Result<T, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Could not read request body: {e}")))?;

    serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// Trims, drops blanks and duplicates, and enforces the batch limit.
fn clean_keys(raw: Vec<String>) -> Result<Vec<String>, ServerError> {
    let mut keys: Vec<String> = Vec::with_capacity(raw.len());
    for key in raw {
        let key = key.trim();
        if !key.is_empty() && !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }

    if keys.is_empty() {
        return Err(ServerError::BadRequest(
            "At least one listing key is required".into(),
        ));
    }
    if keys.len() > MAX_BATCH_KEYS {
        return Err(ServerError::BadRequest(format!(
            "At most {MAX_BATCH_KEYS} listing keys per request"
        )));
    }
    Ok(keys)
}

fn viewport_from_query(params: &HashMap<String, String>) -> Result<ViewportBounds, ServerError> {
    let coord = |name: &str| -> Result<f64, ServerError> {
        params
            .get(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .ok_or_else(|| ServerError::BadRequest(format!("Missing or invalid '{name}'")))
    };

    let bounds = ViewportBounds {
        north: coord("north")?,
        south: coord("south")?,
        east: coord("east")?,
        west: coord("west")?,
    };
    bounds.validate()?;
    Ok(bounds)
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}
