//! Short-distance map server.
//!
//! A web application that draws the Swiss public-transport "short
//! distance" fare relations on a map: where you are not allowed to buy
//! the cheap short-distance ticket, how far those hops actually are, and
//! how they distribute across zoning plans. Data comes from the LINDAS
//! SPARQL endpoint.

pub mod analysis;
pub mod cache;
pub mod domain;
pub mod sparql;
pub mod stations;
pub mod view;
pub mod web;
