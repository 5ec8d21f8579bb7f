pub mod filters;
pub mod images;
pub mod location;
pub mod neighborhoods;
pub mod request;
pub mod service;
pub mod viewport;
