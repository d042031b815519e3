pub(crate) mod assets_errors;
pub(crate) mod assets_model;
pub(crate) mod assets_service;

pub use assets_errors::AssetError;
pub use assets_model::{Asset, Currency};
pub use assets_service::AssetService;
