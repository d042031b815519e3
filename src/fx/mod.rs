pub(crate) mod fx_errors;
pub(crate) mod fx_service;
pub(crate) mod fx_traits;

pub use fx_errors::FxError;
pub use fx_service::{AwesomeApiSource, FxService};
pub use fx_traits::RateSource;
