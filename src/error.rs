use thiserror::Error;

/// A broken contract with an external data source. Always fatal: the run
/// aborts rather than guessing what the source meant.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("station name {0:?} does not end with {suffix:?}", suffix = crate::stations::STATION_NAME_SUFFIX)]
    StationName(String),
    #[error("record {0} has an empty address")]
    EmptyAddress(usize),
    #[error("search response for {address:?} breaks the contract: {reason}")]
    Search { address: String, reason: String },
}

/// The merge dropped or fanned out rows. Indicates a join-logic defect,
/// never a data problem, so it aborts the run.
#[derive(Debug, Error, PartialEq)]
#[error("merge produced {merged} rows from {records} records")]
pub struct CardinalityError {
    pub records: usize,
    pub merged: usize,
}

/// Failure of a single address lookup. Transport failures and bodies that
/// are not JSON at all are soft (the batch records a null location and
/// moves on); schema failures are not.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Transport(String),
    #[error("lookup returned a malformed body: {0}")]
    Malformed(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
