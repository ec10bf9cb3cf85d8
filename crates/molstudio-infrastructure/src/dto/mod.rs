//! Wire DTOs for the backend's JSON contract.
//!
//! The backend speaks snake_case JSON with loosely typed timestamps and
//! execution times in seconds. These types absorb that and convert into the
//! domain model, normalizing values on the way.

mod record;
mod timestamp;

pub use record::{ExperimentDto, GenerationRecordDto, SingleModelResultDto, listing_into_domain};
pub use timestamp::parse_timestamp;
