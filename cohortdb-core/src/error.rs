//! Query error taxonomy.
//!
//! Only malformed requests, cancellation and internal faults are
//! errors. Absence of data (unknown assembly, cohort, sample or panel
//! names, regions with no variants, no genotype class selected) is a
//! successful empty result so that callers can tell "nothing there"
//! apart from "bad request".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// The request is malformed; nothing was computed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request was cancelled before completion.
    #[error("query cancelled")]
    Cancelled,

    /// Storage or worker failure; the whole request fails rather than
    /// returning a partial result.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type QueryResult<T> = Result<T, QueryError>;
