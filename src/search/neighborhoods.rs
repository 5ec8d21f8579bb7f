// src/search/neighborhoods.rs
//
// Named neighbourhoods people type into the search box, mapped to the city the
// provider files them under plus the postal-code prefixes and streets that
// best approximate them. Data only; extend the table, not the lookup.

pub struct Neighborhood {
    pub name: &'static str,
    pub city: &'static str,
    pub postal_prefixes: &'static [&'static str],
    pub streets: &'static [&'static str],
}

const fn hood(
    name: &'static str,
    city: &'static str,
    postal_prefixes: &'static [&'static str],
    streets: &'static [&'static str],
) -> Neighborhood {
    Neighborhood {
        name,
        city,
        postal_prefixes,
        streets,
    }
}

pub static NEIGHBORHOODS: &[Neighborhood] = &[
    // Downtown Toronto
    hood("Yorkville", "Toronto", &["M4Y", "M5R", "M4W"], &["Cumberland", "Yorkville", "Hazelton", "Scollard", "Bellair"]),
    hood("The Annex", "Toronto", &["M5R", "M5S"], &["Bloor", "Spadina", "Brunswick", "Huron", "Madison"]),
    hood("Liberty Village", "Toronto", &["M6K"], &["Liberty", "East Liberty", "Western Battery", "Atlantic", "Hanna"]),
    hood("King West", "Toronto", &["M5V"], &["King", "Wellington", "Portland", "Bathurst", "Niagara"]),
    hood("Entertainment District", "Toronto", &["M5V"], &["King", "John", "Peter", "Richmond", "Duncan"]),
    hood("CityPlace", "Toronto", &["M5V"], &["Fort York", "Bremner", "Spadina", "Navy Wharf", "Dan Leckie"]),
    hood("Fort York", "Toronto", &["M5V"], &["Fort York", "Bathurst", "Grand Magazine", "Iceboat"]),
    hood("Harbourfront", "Toronto", &["M5J", "M5V"], &["Queens Quay", "Harbour", "Lower Simcoe", "York", "Bay"]),
    hood("South Core", "Toronto", &["M5J"], &["Bremner", "York", "Lake Shore", "Harbour"]),
    hood("Financial District", "Toronto", &["M5H", "M5J", "M5X", "M5L"], &["Bay", "King", "Adelaide", "Richmond", "York"]),
    hood("Distillery District", "Toronto", &["M5A"], &["Mill", "Parliament", "Cherry", "Front", "Trinity"]),
    hood("St. Lawrence", "Toronto", &["M5E", "M5A"], &["Front", "The Esplanade", "Market", "Jarvis", "Church"]),
    hood("Church and Wellesley", "Toronto", &["M4Y"], &["Church", "Wellesley", "Alexander", "Maitland", "Isabella"]),
    hood("Bay Street Corridor", "Toronto", &["M5G", "M5S"], &["Bay", "Gerrard", "College", "Grenville", "Wellesley"]),
    hood("Regent Park", "Toronto", &["M5A"], &["Dundas", "Regent", "Sumach", "River", "Shuter"]),
    hood("Corktown", "Toronto", &["M5A"], &["King", "Eastern", "Sumach", "Power", "Adelaide"]),
    hood("Cabbagetown", "Toronto", &["M4X", "M5A"], &["Parliament", "Carlton", "Winchester", "Sumach", "Wellesley"]),
    hood("Moss Park", "Toronto", &["M5A", "M5B"], &["Queen", "Shuter", "Jarvis", "Sherbourne"]),
    hood("Kensington Market", "Toronto", &["M5T"], &["Augusta", "Kensington", "Baldwin", "Nassau", "Spadina"]),
    hood("Chinatown", "Toronto", &["M5T"], &["Spadina", "Dundas", "Huron", "Baldwin"]),
    hood("Queen West", "Toronto", &["M5V", "M6J"], &["Queen", "Ossington", "Bathurst", "Niagara"]),
    hood("West Queen West", "Toronto", &["M6J", "M6K"], &["Queen", "Dovercourt", "Gladstone", "Beaconsfield"]),
    hood("Trinity Bellwoods", "Toronto", &["M6J"], &["Queen", "Crawford", "Shaw", "Strachan", "Gore Vale"]),
    hood("Little Italy", "Toronto", &["M6G"], &["College", "Clinton", "Grace", "Manning", "Montrose"]),
    hood("Little Portugal", "Toronto", &["M6J"], &["Dundas", "Ossington", "Dovercourt", "Shaw"]),
    // East end
    hood("Leslieville", "Toronto", &["M4M"], &["Queen", "Eastern", "Logan", "Carlaw", "Jones"]),
    hood("Riverdale", "Toronto", &["M4K", "M4M"], &["Broadview", "Danforth", "Pape", "Logan", "Withrow"]),
    hood("The Danforth", "Toronto", &["M4K", "M4J"], &["Danforth", "Pape", "Chester", "Broadview", "Logan"]),
    hood("The Beaches", "Toronto", &["M4E", "M4L"], &["Queen", "Kingston", "Lee", "Woodbine", "Beech"]),
    hood("East York", "Toronto", &["M4B", "M4C", "M4G", "M4H", "M4J"], &[]),
    hood("Scarborough", "Toronto", &["M1"], &[]),
    // West end
    hood("Parkdale", "Toronto", &["M6K", "M6R"], &["Queen", "King", "Jameson", "Dunn", "Cowan"]),
    hood("Roncesvalles", "Toronto", &["M6R"], &["Roncesvalles", "Howard Park", "Fern", "Geoffrey", "Galley"]),
    hood("High Park", "Toronto", &["M6P", "M6R", "M6S"], &["Bloor", "High Park", "Parkside", "Indian", "Quebec"]),
    hood("The Junction", "Toronto", &["M6P"], &["Dundas", "Keele", "Annette", "Pacific", "Clendenan"]),
    hood("Bloor West Village", "Toronto", &["M6S"], &["Bloor", "Runnymede", "Windermere", "Jane", "Riverview"]),
    hood("Swansea", "Toronto", &["M6S"], &["Windermere", "Ellis", "Riverside", "Morningside"]),
    hood("Humber Bay", "Toronto", &["M8V"], &["Lake Shore", "Marine Parade", "Park Lawn", "Shore Breeze"]),
    hood("Mimico", "Toronto", &["M8V"], &["Lake Shore", "Royal York", "Mimico", "Superior"]),
    hood("Etobicoke", "Toronto", &["M8", "M9"], &[]),
    // Midtown and north
    hood("Forest Hill", "Toronto", &["M5P", "M4V", "M5N"], &["Spadina", "Forest Hill", "Russell Hill", "Old Forest Hill", "Lonsdale"]),
    hood("Rosedale", "Toronto", &["M4W"], &["Crescent", "Roxborough", "Chestnut Park", "Glen", "Park"]),
    hood("Summerhill", "Toronto", &["M4T", "M4W"], &["Summerhill", "Shaftesbury", "Yonge", "Alcorn"]),
    hood("Deer Park", "Toronto", &["M4V", "M4T"], &["St Clair", "Delisle", "Heath", "Deer Park"]),
    hood("Wychwood", "Toronto", &["M6C"], &["Wychwood", "Christie", "Bathurst", "Benson"]),
    hood("Davisville", "Toronto", &["M4S"], &["Davisville", "Merton", "Balliol", "Mount Pleasant", "Yonge"]),
    hood("Yonge and Eglinton", "Toronto", &["M4P", "M4S", "M4R"], &["Eglinton", "Yonge", "Roehampton", "Broadway", "Erskine"]),
    hood("Lawrence Park", "Toronto", &["M4N", "M5M"], &["Lawrence", "Mildenhall", "Dawlish", "St Ives"]),
    hood("Leaside", "Toronto", &["M4G"], &["Bayview", "Laird", "Millwood", "Bessborough", "Sutherland"]),
    hood("Yorkdale", "Toronto", &["M6A"], &["Dufferin", "Yorkdale", "Lawrence"]),
    hood("Don Mills", "Toronto", &["M3B", "M3C"], &["Don Mills", "Lawrence", "The Donway", "York Mills"]),
    hood("North York", "Toronto", &["M2", "M3"], &[]),
    hood("North York Centre", "Toronto", &["M2N"], &["Yonge", "Sheppard", "Finch", "Empress", "Park Home"]),
    hood("Willowdale", "Toronto", &["M2N", "M2M", "M2R"], &["Yonge", "Willowdale", "Bayview", "Drewry"]),
    hood("Bayview Village", "Toronto", &["M2K"], &["Bayview", "Sheppard", "Bayview Mews"]),
    // Beyond the 416
    hood("Port Credit", "Mississauga", &["L5G", "L5H"], &["Lakeshore", "Hurontario", "Port", "Elizabeth"]),
    hood("Square One", "Mississauga", &["L5B"], &["Burnhamthorpe", "Confederation", "City Centre", "Duke of York"]),
    hood("Unionville", "Markham", &["L3R", "L6G"], &["Main Street Unionville", "Kennedy", "Enterprise"]),
    hood("Vaughan Metropolitan Centre", "Vaughan", &["L4K"], &["Jane", "Highway 7", "Millway", "Interchange"]),
    hood("Thornhill", "Vaughan", &["L4J", "L3T"], &["Yonge", "Centre", "Bathurst", "Clark"]),
    hood("Old Oakville", "Oakville", &["L6J", "L6K"], &["Lakeshore", "Navy", "Trafalgar", "Church"]),
    hood("Bronte", "Oakville", &["L6L"], &["Bronte", "Lakeshore", "Marine"]),
];

/// Case-insensitive lookup. A leading "the" and punctuation are ignored, so
/// "annex", "The Annex" and "the-annex" all match.
pub fn lookup(name: &str) -> Option<&'static Neighborhood> {
    let wanted = normalize(name);
    if wanted.is_empty() {
        return None;
    }
    NEIGHBORHOODS.iter().find(|n| normalize(n.name) == wanted)
}

fn normalize(name: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();

    let words = match words.first().map(String::as_str) {
        Some("the") if words.len() > 1 => &words[1..],
        _ => &words[..],
    };
    words.join(" ")
}
