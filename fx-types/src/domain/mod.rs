//! Domain models for the rate gateway.

pub mod currency;
pub mod page;
pub mod policy;
pub mod rates;

pub use currency::CurrencyCode;
pub use page::{PageSpec, PagedResult, paginate};
pub use policy::ExclusionPolicy;
pub use rates::{DateSeries, HistoricalSeries, RateSnapshot, RateTable};
