pub mod formatted;
pub mod listing;
pub mod slug;
pub mod status;
