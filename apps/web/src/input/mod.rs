pub mod data_url;
pub mod handlers;
pub mod validation;
