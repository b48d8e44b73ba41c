// Library root for the pitch-tracking pipeline: schema validation, derived
// fields, grouped aggregation, selection partitioning, and view projection.
//
// Everything in this crate is synchronous and pure. The loaded `Dataset` is
// immutable and is meant to be shared by reference (`Arc<Dataset>`) across
// any number of concurrent view requests.

pub mod aggregate;
pub mod dataset;
pub mod derived;
pub mod error;
pub mod pitch;
pub mod schema;
pub mod selection;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::CoreError;
