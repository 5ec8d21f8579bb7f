// src/search/location.rs

use crate::mls::FilterClause;
use crate::search::neighborhoods;
use once_cell::sync::Lazy;
use regex::Regex;

/// Free-text queries longer than this are never treated as neighbourhood names.
const MAX_NEIGHBORHOOD_WORDS: usize = 5;

static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([A-Z]\d[A-Z])\s?(\d[A-Z]\d)\b").expect("postal code pattern")
});

static POSTAL_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z]\d[A-Z](\s?\d[A-Z]\d)?$").expect("postal query pattern")
});

static STREET_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+[A-Za-z]?)\s+(.+)$").expect("street address pattern")
});

const STREET_ABBREVIATIONS: &[(&str, &str)] = &[
    ("blvd", "Boulevard"),
    ("ave", "Avenue"),
    ("st", "Street"),
    ("rd", "Road"),
    ("dr", "Drive"),
    ("crt", "Court"),
    ("pl", "Place"),
    ("sq", "Square"),
    ("ter", "Terrace"),
];

/// Turns a free-text location into provider clauses. The clauses are meant to
/// be ANDed with the rest of the query. An empty query yields no clauses.
pub fn resolve_location(query: &str) -> Vec<FilterClause> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let parts: Vec<&str> = query
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() >= 2 {
        return address_clauses(&parts);
    }

    if query.eq_ignore_ascii_case("toronto") {
        return vec![FilterClause::contains("City", "Toronto")];
    }

    let word_count = query.split_whitespace().count();
    if word_count <= MAX_NEIGHBORHOOD_WORDS && !is_postal_code(query) {
        return neighborhood_clauses(query);
    }

    vec![FilterClause::any_of(vec![
        FilterClause::contains("UnparsedAddress", query),
        FilterClause::contains("City", query),
        FilterClause::contains("PostalCode", normalize_postal(query)),
        FilterClause::contains("StreetName", query),
    ])]
}

/// "65 Bremner Blvd, Toronto, ON M5J 0A7" style input.
fn address_clauses(parts: &[&str]) -> Vec<FilterClause> {
    let street = parts[0];
    let mut clauses = Vec::new();

    match STREET_ADDRESS.captures(street) {
        Some(caps) => {
            let expanded = format!("{} {}", &caps[1], expand_abbreviations(&caps[2]));
            let mut alternatives = vec![FilterClause::contains("UnparsedAddress", expanded.clone())];
            if expanded != street {
                alternatives.push(FilterClause::contains("UnparsedAddress", street));
            }
            clauses.push(FilterClause::any_of(alternatives));
        }
        None => clauses.push(FilterClause::contains("UnparsedAddress", street)),
    }

    if let Some(postal) = parts.iter().find_map(|p| extract_postal_code(p)) {
        clauses.push(FilterClause::contains("PostalCode", postal));
    }

    clauses
}

fn neighborhood_clauses(query: &str) -> Vec<FilterClause> {
    let Some(hood) = neighborhoods::lookup(query) else {
        return vec![FilterClause::any_of(vec![
            FilterClause::contains("UnparsedAddress", query),
            FilterClause::contains("City", query),
            FilterClause::contains("StreetName", query),
        ])];
    };

    let alternatives: Vec<FilterClause> = hood
        .postal_prefixes
        .iter()
        .map(|p| FilterClause::contains("PostalCode", *p))
        .chain(
            hood.streets
                .iter()
                .map(|s| FilterClause::contains("StreetName", *s)),
        )
        .collect();

    let mut clauses = Vec::new();
    if !alternatives.is_empty() {
        clauses.push(FilterClause::any_of(alternatives));
    }
    clauses.push(FilterClause::contains("City", hood.city));
    clauses
}

/// Expands street-type abbreviations ("Blvd" -> "Boulevard"). The first word
/// of a multi-word name is left alone so "St Clair Ave" keeps its "St".
pub fn expand_abbreviations(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let skip_first = words.len() > 1;

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i == 0 && skip_first {
                return word.to_string();
            }
            let bare = word.trim_end_matches('.').to_lowercase();
            STREET_ABBREVIATIONS
                .iter()
                .find(|(abbr, _)| *abbr == bare)
                .map(|(_, full)| full.to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Finds a Canadian postal code ("M5J 0A7", "m5j0a7") and returns it as
/// upper case with the single space the provider stores.
pub fn extract_postal_code(text: &str) -> Option<String> {
    POSTAL_CODE
        .captures(text)
        .map(|caps| format!("{} {}", &caps[1], &caps[2]).to_uppercase())
}

/// A full postal code or just its forward sortation area ("M5J").
pub fn is_postal_code(text: &str) -> bool {
    POSTAL_QUERY.is_match(text.trim())
}

fn normalize_postal(text: &str) -> String {
    extract_postal_code(text).unwrap_or_else(|| text.to_string())
}
