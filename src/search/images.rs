// src/search/images.rs

use crate::domain::listing::{image_entry, ImageEntry};
use crate::mls::{FilterClause, MediaRecord, OrderBy, ProviderGateway, ProviderQuery};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::{BTreeMap, HashMap, HashSet};
use url::Url;

pub const MIN_IMAGE_URL_LEN: usize = 20;
pub const MAX_BATCH_KEYS: usize = 20;
/// Media rows requested per listing in one call.
const MEDIA_ROWS_PER_LISTING: u32 = 50;

const MEDIA_SELECT: &[&str] = &[
    "ResourceRecordKey",
    "MediaKey",
    "MediaURL",
    "Order",
    "ImageSizeDescription",
    "MediaCategory",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Thumbnail,
    Medium,
    Large,
    Largest,
}

impl ImageSize {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("thumbnail") | Some("small") => ImageSize::Thumbnail,
            Some("medium") => ImageSize::Medium,
            Some("largest") | Some("original") => ImageSize::Largest,
            _ => ImageSize::Large,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ImageSize::Thumbnail => "Thumbnail",
            ImageSize::Medium => "Medium",
            ImageSize::Large => "Large",
            ImageSize::Largest => "Largest",
        }
    }
}

/// Images resolved for one listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingImages {
    pub primary: Option<String>,
    pub images: Vec<ImageEntry>,
}

/// Result of enriching a page: images per listing key, plus whether any
/// batch had to be given up on.
#[derive(Debug, Default)]
pub struct PageImages {
    pub by_key: HashMap<String, ListingImages>,
    pub failed_batches: usize,
}

impl PageImages {
    pub fn get(&self, key: &str) -> ListingImages {
        self.by_key.get(key).cloned().unwrap_or_default()
    }
}

/// Starts with http(s), parses as a URL, and is not suspiciously short.
pub fn is_valid_image_url(url: &str) -> bool {
    let url = url.trim();
    (url.starts_with("https://") || url.starts_with("http://"))
        && url.len() >= MIN_IMAGE_URL_LEN
        && Url::parse(url).is_ok()
}

/// Provider query for the media of a set of listings.
pub fn media_query(keys: &[String], size: ImageSize) -> ProviderQuery {
    let key_clause = FilterClause::any_of(
        keys.iter()
            .map(|k| FilterClause::eq("ResourceRecordKey", k.as_str()))
            .collect(),
    );
    let mut query = ProviderQuery::new(
        vec![
            key_clause,
            FilterClause::eq("ImageSizeDescription", size.description()),
            FilterClause::eq("MediaCategory", "Photo"),
        ],
        MEDIA_SELECT,
    );
    query.top = (keys.len() as u32).max(1) * MEDIA_ROWS_PER_LISTING;
    query.order_by = Some(OrderBy::asc("Order"));
    query
}

/// Chooses one primary image per listing, in page order.
///
/// A URL already used as another listing's primary is swapped for the next
/// valid unused URL of the same listing. With no alternative left the
/// duplicate stays.
pub fn assign_primaries(
    keys: &[String],
    images: &HashMap<String, Vec<ImageEntry>>,
) -> HashMap<String, Option<String>> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = HashMap::with_capacity(keys.len());

    for key in keys {
        let valid: Vec<&str> = images
            .get(key)
            .map(|list| {
                list.iter()
                    .map(|i| i.media_url.as_str())
                    .filter(|u| is_valid_image_url(u))
                    .collect()
            })
            .unwrap_or_default();

        let chosen = match valid.first() {
            None => None,
            Some(first) if !used.contains(*first) => Some(first.to_string()),
            Some(first) => match valid.iter().find(|u| !used.contains(**u)) {
                Some(alt) => Some(alt.to_string()),
                None => {
                    log::warn!("Listing {key} reuses primary image {first}: no unused alternative");
                    Some(first.to_string())
                }
            },
        };

        if let Some(url) = &chosen {
            used.insert(url.clone());
        }
        out.insert(key.clone(), chosen);
    }

    out
}

/// Build the pool that media batches run on. Its size caps the number of
/// media requests in flight across all callers sharing it.
pub fn image_pool(max_concurrency: usize) -> Result<ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(max_concurrency.max(1))
        .thread_name(|i| format!("image-fetch-{i}"))
        .build()
}

pub struct ImageAggregator<'a> {
    gateway: &'a dyn ProviderGateway,
    pool: &'a ThreadPool,
    batch_size: usize,
    placeholder_url: &'a str,
}

impl<'a> ImageAggregator<'a> {
    pub fn new(
        gateway: &'a dyn ProviderGateway,
        pool: &'a ThreadPool,
        batch_size: usize,
        placeholder_url: &'a str,
    ) -> Self {
        Self {
            gateway,
            pool,
            batch_size: batch_size.max(1),
            placeholder_url,
        }
    }

    /// Images and a deduplicated primary for every listing on a page.
    /// Keys are in page order; failures leave those listings without images.
    pub fn attach_images(&self, keys: &[String], size: ImageSize) -> PageImages {
        let (lists, failed_batches) = self.fetch_lists(keys, size);
        let primaries = assign_primaries(keys, &lists);

        let by_key = keys
            .iter()
            .map(|key| {
                let images = lists.get(key).cloned().unwrap_or_default();
                let primary = primaries.get(key).cloned().flatten();
                (key.clone(), ListingImages { primary, images })
            })
            .collect();

        PageImages {
            by_key,
            failed_batches,
        }
    }

    /// Ordered valid image URLs per key. Every requested key is present; an
    /// empty list means no images (or that the lookup failed).
    pub fn image_lists(
        &self,
        keys: &[String],
        size: ImageSize,
        limit: Option<usize>,
    ) -> BTreeMap<String, Vec<String>> {
        let (lists, _) = self.fetch_lists(keys, size);

        keys.iter()
            .map(|key| {
                let urls = lists
                    .get(key)
                    .map(|list| {
                        list.iter()
                            .map(|i| i.media_url.clone())
                            .take(limit.unwrap_or(usize::MAX))
                            .collect()
                    })
                    .unwrap_or_default();
                (key.clone(), urls)
            })
            .collect()
    }

    /// One image per key in a single round trip, with the placeholder standing
    /// in for anything the provider has no usable image for.
    pub fn primary_images(&self, keys: &[String], size: ImageSize) -> BTreeMap<String, String> {
        let lists = match self.gateway.query_media(&media_query(keys, size)) {
            Ok(rows) => group_media(keys, size, rows),
            Err(e) => {
                log::warn!("⚠️ Single image lookup failed for {} keys: {e}", keys.len());
                HashMap::new()
            }
        };
        let primaries = assign_primaries(keys, &lists);

        keys.iter()
            .map(|key| {
                let url = primaries
                    .get(key)
                    .cloned()
                    .flatten()
                    .unwrap_or_else(|| self.placeholder_url.to_string());
                (key.clone(), url)
            })
            .collect()
    }

    /// Runs the batches on the shared pool and joins them. Dedup happens
    /// afterwards, so no batch touches shared state.
    fn fetch_lists(
        &self,
        keys: &[String],
        size: ImageSize,
    ) -> (HashMap<String, Vec<ImageEntry>>, usize) {
        if keys.is_empty() {
            return (HashMap::new(), 0);
        }

        let gateway = self.gateway;
        let results: Vec<Option<HashMap<String, Vec<ImageEntry>>>> = self.pool.install(|| {
            keys.par_chunks(self.batch_size)
                .map(|batch| match gateway.query_media(&media_query(batch, size)) {
                    Ok(rows) => Some(group_media(batch, size, rows)),
                    Err(e) => {
                        log::warn!("⚠️ Image batch {:?} failed: {e}", batch);
                        None
                    }
                })
                .collect()
        });

        let mut lists = HashMap::new();
        let mut failed = 0;
        for result in results {
            match result {
                Some(batch) => lists.extend(batch),
                None => failed += 1,
            }
        }
        (lists, failed)
    }
}

/// Groups media rows by listing, keeping provider order within a listing.
///
/// Rows for keys that were not asked for, rows labelled as another size or a
/// non-photo category, and rows without a valid URL are dropped.
fn group_media(
    keys: &[String],
    size: ImageSize,
    rows: Vec<MediaRecord>,
) -> HashMap<String, Vec<ImageEntry>> {
    let wanted: HashSet<&str> = keys.iter().map(String::as_str).collect();
    let labelled = |value: &Option<String>, expected: &str| {
        value
            .as_deref()
            .map_or(true, |v| v.trim().eq_ignore_ascii_case(expected))
    };

    let mut rows: Vec<MediaRecord> = rows
        .into_iter()
        .filter(|r| {
            r.resource_record_key
                .as_deref()
                .is_some_and(|k| wanted.contains(k))
                && labelled(&r.image_size_description, size.description())
                && labelled(&r.media_category, "Photo")
        })
        .collect();
    rows.sort_by_key(|r| r.order.unwrap_or(i64::MAX));

    let mut grouped: HashMap<String, Vec<ImageEntry>> = HashMap::new();
    for row in &rows {
        let (Some(key), Some(entry)) = (row.resource_record_key.as_ref(), image_entry(row)) else {
            continue;
        };
        if !is_valid_image_url(&entry.media_url) {
            continue;
        }
        let list = grouped.entry(key.clone()).or_default();
        if !list.iter().any(|e| e.media_url == entry.media_url) {
            list.push(entry);
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mls::gateway::PropertyPage;
    use crate::mls::ProviderError;
    use crate::tests::utils::{media, test_pool, FakeGateway};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const PLACEHOLDER: &str = "https://example.com/images/placeholder.jpg";

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    fn entries(urls: &[&str]) -> Vec<ImageEntry> {
        urls.iter()
            .map(|u| ImageEntry {
                media_url: u.to_string(),
                media_key: String::new(),
            })
            .collect()
    }

    #[test]
    fn url_validity() {
        assert!(is_valid_image_url("https://cdn.example.com/photo.jpg"));
        assert!(!is_valid_image_url("ftp://cdn.example.com/photo.jpg"));
        assert!(!is_valid_image_url("https://a.co/x"));
        assert!(!is_valid_image_url("https://exa mple.com/photo.jpg"));
        assert!(!is_valid_image_url(""));
    }

    #[test]
    fn duplicate_primary_is_substituted() {
        let shared = "https://cdn.example.com/shared-lobby.jpg";
        let alt = "https://cdn.example.com/a2-kitchen.jpg";
        let mut images = HashMap::new();
        images.insert("A1".to_string(), entries(&[shared]));
        images.insert("A2".to_string(), entries(&[shared, alt]));

        let primaries = assign_primaries(&keys(&["A1", "A2"]), &images);
        assert_eq!(primaries["A1"].as_deref(), Some(shared));
        assert_eq!(primaries["A2"].as_deref(), Some(alt));
    }

    #[test]
    fn duplicate_kept_when_no_alternative() {
        let shared = "https://cdn.example.com/shared-lobby.jpg";
        let mut images = HashMap::new();
        images.insert("A1".to_string(), entries(&[shared]));
        images.insert("A2".to_string(), entries(&["bad", shared]));

        let primaries = assign_primaries(&keys(&["A1", "A2", "A3"]), &images);
        assert_eq!(primaries["A2"].as_deref(), Some(shared));
        assert_eq!(primaries["A3"], None);
    }

    #[test]
    fn primaries_are_unique_when_alternatives_exist() {
        let mut images = HashMap::new();
        for (i, key) in ["K1", "K2", "K3", "K4"].iter().enumerate() {
            let own = format!("https://cdn.example.com/{key}-own.jpg");
            let mut list = vec![
                "https://cdn.example.com/common-1.jpg".to_string(),
                "https://cdn.example.com/common-2.jpg".to_string(),
            ];
            list.insert(i.min(2), own);
            images.insert(
                key.to_string(),
                list.into_iter()
                    .map(|u| ImageEntry {
                        media_url: u,
                        media_key: String::new(),
                    })
                    .collect(),
            );
        }

        let page = keys(&["K1", "K2", "K3", "K4"]);
        let primaries = assign_primaries(&page, &images);
        let chosen: HashSet<_> = primaries.values().flatten().collect();
        assert_eq!(chosen.len(), page.len());
    }

    #[test]
    fn attach_images_batches_and_dedupes() {
        let shared = "https://cdn.example.com/shared-lobby.jpg";
        let gateway = FakeGateway {
            media: vec![
                media("A1", shared, 1),
                media("A2", shared, 1),
                media("A2", "https://cdn.example.com/a2-second.jpg", 2),
                media("A3", "https://cdn.example.com/a3-first.jpg", 1),
                media("ZZ", "https://cdn.example.com/not-requested.jpg", 1),
            ],
            ..Default::default()
        };
        let pool = test_pool();
        let aggregator = ImageAggregator::new(&gateway, &pool, 2, PLACEHOLDER);

        let page = aggregator.attach_images(&keys(&["A1", "A2", "A3"]), ImageSize::Large);
        assert_eq!(page.failed_batches, 0);
        assert_eq!(gateway.media_calls(), 2);
        assert_eq!(page.get("A1").primary.as_deref(), Some(shared));
        assert_eq!(
            page.get("A2").primary.as_deref(),
            Some("https://cdn.example.com/a2-second.jpg")
        );
        assert_eq!(page.get("A2").images.len(), 2);
        assert!(!page.by_key.contains_key("ZZ"));
    }

    #[test]
    fn failed_batch_leaves_listings_empty() {
        let gateway = FakeGateway {
            media: vec![
                media("A1", "https://cdn.example.com/a1.jpg", 1),
                media("B1", "https://cdn.example.com/b1.jpg", 1),
            ],
            failing_media_keys: vec!["B1".to_string()],
            ..Default::default()
        };
        let pool = test_pool();
        let aggregator = ImageAggregator::new(&gateway, &pool, 1, PLACEHOLDER);

        let page = aggregator.attach_images(&keys(&["A1", "B1"]), ImageSize::Large);
        assert_eq!(page.failed_batches, 1);
        assert_eq!(
            page.get("A1").primary.as_deref(),
            Some("https://cdn.example.com/a1.jpg")
        );
        assert_eq!(page.get("B1"), ListingImages::default());
    }

    #[test]
    fn image_lists_contain_every_key() {
        let gateway = FakeGateway {
            media: vec![
                media("A1", "https://cdn.example.com/a1-1.jpg", 1),
                media("A1", "https://cdn.example.com/a1-2.jpg", 2),
                media("A1", "https://cdn.example.com/a1-3.jpg", 3),
            ],
            ..Default::default()
        };
        let pool = test_pool();
        let aggregator = ImageAggregator::new(&gateway, &pool, 4, PLACEHOLDER);

        let lists = aggregator.image_lists(&keys(&["A1", "NOPE"]), ImageSize::Medium, Some(2));
        assert_eq!(lists.len(), 2);
        assert_eq!(
            lists["A1"],
            vec![
                "https://cdn.example.com/a1-1.jpg".to_string(),
                "https://cdn.example.com/a1-2.jpg".to_string()
            ]
        );
        assert!(lists["NOPE"].is_empty());
    }

    #[test]
    fn primary_images_fall_back_to_placeholder() {
        let gateway = FakeGateway {
            media: vec![media("A1", "https://cdn.example.com/a1.jpg", 1)],
            ..Default::default()
        };
        let pool = test_pool();
        let aggregator = ImageAggregator::new(&gateway, &pool, 4, PLACEHOLDER);

        let urls = aggregator.primary_images(&keys(&["A1", "B2"]), ImageSize::Thumbnail);
        assert_eq!(urls["A1"], "https://cdn.example.com/a1.jpg");
        assert_eq!(urls["B2"], PLACEHOLDER);
        assert_eq!(gateway.media_calls(), 1);

        let failing = FakeGateway {
            failing_media_keys: vec!["A1".to_string()],
            ..Default::default()
        };
        let pool = test_pool();
        let aggregator = ImageAggregator::new(&failing, &pool, 4, PLACEHOLDER);
        let urls = aggregator.primary_images(&keys(&["A1"]), ImageSize::Thumbnail);
        assert_eq!(urls["A1"], PLACEHOLDER);
    }

    /// Media gateway that is slow and remembers the most calls it had open
    /// at once.
    #[derive(Default)]
    struct SlowMediaGateway {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl ProviderGateway for SlowMediaGateway {
        fn query_properties(&self, _: &ProviderQuery) -> Result<PropertyPage, ProviderError> {
            Ok(PropertyPage::default())
        }

        fn query_media(&self, _: &ProviderQuery) -> Result<Vec<MediaRecord>, ProviderError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[test]
    fn media_requests_in_flight_are_capped_by_the_pool() {
        let gateway = SlowMediaGateway::default();
        let pool = image_pool(2).unwrap();
        let aggregator = ImageAggregator::new(&gateway, &pool, 4, PLACEHOLDER);

        let page_keys: Vec<String> = (0..100).map(|i| format!("K{i:03}")).collect();
        let page = aggregator.attach_images(&page_keys, ImageSize::Large);

        assert_eq!(page.failed_batches, 0);
        assert_eq!(page.by_key.len(), 100);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 25);
        assert!(gateway.peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn rows_of_other_sizes_or_categories_are_ignored() {
        let mut wrong_size = media("A1", "https://cdn.example.com/a1-thumb.jpg", 1);
        wrong_size.image_size_description = Some("Thumbnail".to_string());
        let mut floor_plan = media("A1", "https://cdn.example.com/a1-plan.jpg", 2);
        floor_plan.media_category = Some("Floor Plan".to_string());
        let mut labelled = media("A1", "https://cdn.example.com/a1-large.jpg", 3);
        labelled.image_size_description = Some("large".to_string());

        let gateway = FakeGateway {
            media: vec![
                wrong_size,
                floor_plan,
                labelled,
                media("A1", "https://cdn.example.com/a1-unlabelled.jpg", 4),
                media("A1", "notaurl", 5),
            ],
            ..Default::default()
        };
        let pool = test_pool();
        let aggregator = ImageAggregator::new(&gateway, &pool, 4, PLACEHOLDER);

        let page = aggregator.attach_images(&keys(&["A1"]), ImageSize::Large);
        let urls: Vec<_> = page
            .get("A1")
            .images
            .iter()
            .map(|i| i.media_url.clone())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/a1-large.jpg".to_string(),
                "https://cdn.example.com/a1-unlabelled.jpg".to_string()
            ]
        );
    }

    #[test]
    fn media_query_filters_keys_and_size() {
        let query = media_query(&keys(&["A1", "A2"]), ImageSize::Largest);
        assert_eq!(
            query.filter_string(),
            "(ResourceRecordKey eq 'A1' or ResourceRecordKey eq 'A2') and ImageSizeDescription eq 'Largest' and MediaCategory eq 'Photo'"
        );
        assert_eq!(query.top, 100);
    }
}
