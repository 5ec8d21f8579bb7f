pub mod gateway;
pub mod models;
pub mod odata;
mod provider_error;

pub use gateway::{AmpreGateway, ProviderGateway};
pub use models::MediaRecord;
pub use odata::{FilterClause, OrderBy, ProviderQuery};
pub use provider_error::ProviderError;
