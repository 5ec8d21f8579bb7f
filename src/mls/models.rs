use serde::Deserialize;

// Property (RESO data dictionary names, as AMPRE returns them)
//  ├── ListingKey
//  ├── address
//  │    ├── StreetNumber / StreetName / StreetSuffix / UnitNumber
//  │    ├── City / StateOrProvince / PostalCode
//  │    └── UnparsedAddress
//  ├── ListPrice / ClosePrice
//  ├── BedroomsTotal / BathroomsTotalInteger
//  ├── LivingAreaRange / BuildingAreaTotal
//  ├── StandardStatus / MlsStatus / TransactionType
//  ├── PropertyType / PropertySubType
//  ├── ListingContractDate
//  ├── Latitude / Longitude
//  ├── OpenHouseDate / OpenHouseStartTime / OpenHouseEndTime
//  └── Media[] (only when expanded)
//
// Some feeds hand back lower-camel keys, hence the aliases.

#[derive(Debug, Default, Deserialize)]
pub struct RawProperty {
    #[serde(rename = "ListingKey", alias = "listingKey")]
    pub listing_key: Option<String>,

    #[serde(rename = "StreetNumber", alias = "streetNumber")]
    pub street_number: Option<String>,
    #[serde(rename = "StreetName", alias = "streetName")]
    pub street_name: Option<String>,
    #[serde(rename = "StreetSuffix", alias = "streetSuffix")]
    pub street_suffix: Option<String>,
    #[serde(rename = "UnitNumber", alias = "unitNumber")]
    pub unit_number: Option<String>,
    #[serde(rename = "City", alias = "city")]
    pub city: Option<String>,
    #[serde(rename = "StateOrProvince", alias = "stateOrProvince")]
    pub state_or_province: Option<String>,
    #[serde(rename = "PostalCode", alias = "postalCode")]
    pub postal_code: Option<String>,
    #[serde(rename = "UnparsedAddress", alias = "unparsedAddress")]
    pub unparsed_address: Option<String>,

    #[serde(rename = "ListPrice", alias = "listPrice")]
    pub list_price: Option<f64>,
    #[serde(rename = "ClosePrice", alias = "closePrice")]
    pub close_price: Option<f64>,

    #[serde(rename = "BedroomsTotal", alias = "bedroomsTotal")]
    pub bedrooms_total: Option<f64>,
    #[serde(rename = "BathroomsTotalInteger", alias = "bathroomsTotalInteger")]
    pub bathrooms_total: Option<f64>,
    #[serde(rename = "LivingAreaRange", alias = "livingAreaRange")]
    pub living_area_range: Option<String>,
    #[serde(rename = "BuildingAreaTotal", alias = "buildingAreaTotal")]
    pub building_area_total: Option<f64>,

    #[serde(rename = "StandardStatus", alias = "standardStatus")]
    pub standard_status: Option<String>,
    #[serde(rename = "MlsStatus", alias = "mlsStatus")]
    pub mls_status: Option<String>,
    #[serde(rename = "TransactionType", alias = "transactionType")]
    pub transaction_type: Option<String>,
    #[serde(rename = "PropertyType", alias = "propertyType")]
    pub property_type: Option<String>,
    #[serde(rename = "PropertySubType", alias = "propertySubType")]
    pub property_sub_type: Option<String>,

    #[serde(rename = "ListingContractDate", alias = "listingContractDate")]
    pub listing_contract_date: Option<String>,

    #[serde(rename = "Latitude", alias = "latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", alias = "longitude")]
    pub longitude: Option<f64>,

    #[serde(rename = "OpenHouseDate", alias = "openHouseDate")]
    pub open_house_date: Option<String>,
    #[serde(rename = "OpenHouseStartTime", alias = "openHouseStartTime")]
    pub open_house_start_time: Option<String>,
    #[serde(rename = "OpenHouseEndTime", alias = "openHouseEndTime")]
    pub open_house_end_time: Option<String>,

    #[serde(rename = "PublicRemarks", alias = "publicRemarks")]
    pub public_remarks: Option<String>,
}

/// One row of the AMPRE `Media` resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "ResourceRecordKey", alias = "resourceRecordKey")]
    pub resource_record_key: Option<String>,
    #[serde(rename = "MediaKey", alias = "mediaKey")]
    pub media_key: Option<String>,
    #[serde(rename = "MediaURL", alias = "mediaURL", alias = "mediaUrl")]
    pub media_url: Option<String>,
    #[serde(rename = "Order", alias = "order")]
    pub order: Option<i64>,
    #[serde(rename = "ImageSizeDescription", alias = "imageSizeDescription")]
    pub image_size_description: Option<String>,
    #[serde(rename = "MediaCategory", alias = "mediaCategory")]
    pub media_category: Option<String>,
}

/// OData collection envelope: `{ "@odata.count": n, "value": [...] }`.
#[derive(Debug, Deserialize)]
pub struct ODataPage<T> {
    #[serde(rename = "@odata.count")]
    pub count: Option<u64>,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}
