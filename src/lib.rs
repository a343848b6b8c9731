pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod locator;
pub mod logging;
pub mod normalize;
pub mod report;
pub mod scrape;
pub mod season;
pub mod table;
pub mod types;

pub use aggregate::{aggregate, Aggregation, Grouped, SelectionOptions, Selector};
pub use error::{Result, TransferError};
pub use types::{SourceKind, TransferRecord};
