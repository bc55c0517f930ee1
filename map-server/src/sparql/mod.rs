//! SPARQL boundary: query construction, HTTP transport and row typing.
//!
//! All remote data comes from the LINDAS linked-data endpoint as SPARQL 1.1
//! SELECT results. Queries are built by [`query`], executed by
//! [`SparqlClient`], and converted into domain records by [`convert`]
//! immediately at this boundary so no untyped rows travel further in.

mod client;
pub mod convert;
mod error;
pub mod query;
mod results;

pub use client::{SparqlClient, SparqlConfig};
pub use error::SparqlError;
pub use results::{Row, SelectResponse, Term};
