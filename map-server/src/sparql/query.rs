//! SPARQL query construction.
//!
//! Pure functions mapping (entity type, parameters) → SELECT query text for
//! the LINDAS endpoint. Free-text search tokens are escaped before being
//! templated into string literals; station IDs and plan URIs are validated
//! newtypes, so every parameter reaching these functions is already safe to
//! interpolate.

use crate::domain::{PlanUri, StationId};

/// Prefixes shared by the station queries.
const STATION_PREFIXES: &str = "\
PREFIX geo:    <http://www.w3.org/2003/01/geo/wgs84_pos#>
PREFIX gtfs:   <http://vocab.gtfs.org/terms#>
PREFIX schema: <http://schema.org/>
PREFIX ld:     <https://ld.geo.admin.ch/def/transportation/>
";

/// Prefixes shared by the short-distance relation queries.
const RELATION_PREFIXES: &str = "\
PREFIX schema:  <http://schema.org/>
PREFIX rdfs:    <http://www.w3.org/2000/01/rdf-schema#>
PREFIX otd:     <http://lod.opentransportdata.swiss/vocab/>
PREFIX dcterms: <http://purl.org/dc/terms/>
PREFIX geos:    <http://www.opengis.net/ont/geosparql#>
PREFIX geof:    <http://www.opengis.net/def/function/geosparql/>
PREFIX unit:    <http://qudt.org/vocab/unit#>
PREFIX xsd:     <http://www.w3.org/2001/XMLSchema#>
";

/// Base URI of the DIDOK station register.
const DIDOK_BASE: &str = "http://lod.opentransportdata.swiss/didok/";

/// Triple patterns binding `?arrival`/`?departure` coordinates and a
/// distance in metres, shared by the relation queries.
const DISTANCE_BINDING: &str = "\
    ?departure geos:hasGeometry ?departureGeom .
    ?arrival   geos:hasGeometry ?arrivalGeom .
    BIND(xsd:integer(geof:distance(?departureGeom, ?arrivalGeom, unit:Meter)) AS ?distance)
";

/// All GTFS stops with name, position and the ID extracted from the stop URI.
pub fn all_stations() -> String {
    format!(
        "{STATION_PREFIXES}
SELECT ?id ?name ?lat ?lng {{
    ?stop a gtfs:Stop ;
          schema:name ?name ;
          geo:lat ?lat ;
          geo:long ?lng ;
          ld:operatingPointType ?type .
    BIND(STRAFTER(STR(?stop), \"stop/\") AS ?id)
}}"
    )
}

/// Stations whose name contains every whitespace-separated token of
/// `terms`, case-insensitively, ordered by name.
pub fn stations_matching(terms: &str) -> String {
    let filters: String = tokenize(terms)
        .map(|token| {
            format!(
                "    FILTER(CONTAINS(LCASE(?name), LCASE(\"{}\")))\n",
                escape_literal(token)
            )
        })
        .collect();

    format!(
        "{STATION_PREFIXES}
SELECT ?id ?name ?lat ?lng {{
    ?stop a gtfs:Stop ;
          schema:name ?name ;
          geo:lat ?lat ;
          geo:long ?lng ;
          ld:operatingPointType ?type .
    BIND(STRAFTER(STR(?stop), \"stop/\") AS ?id)
{filters}}} ORDER BY ?name"
    )
}

/// All short-distance relations departing the given station: arrival
/// name, ID, position and the relation distance in metres.
pub fn short_distances_for(station: &StationId) -> String {
    format!(
        "{RELATION_PREFIXES}
SELECT ?id ?name ?lat ?lng ?distance
WHERE {{
    ?relation a otd:Relation ;
              schema:departureStation ?departure ;
              schema:arrivalStation ?arrival .
    FILTER(?departure = <{DIDOK_BASE}{id}>)

    ?arrival rdfs:label ?name ;
             dcterms:identifier ?id ;
             geos:hasGeometry/geos:asWKT ?arrivalCoord .

{DISTANCE_BINDING}
    BIND(REPLACE(REPLACE(STR(?arrivalCoord), \"POINT\\\\(\", \"\"), \"\\\\)\", \"\") AS ?coord)
    BIND(STRAFTER(?coord, \" \") AS ?lat)
    BIND(STRBEFORE(?coord, \" \") AS ?lng)
}} ORDER BY ?name",
        id = station.as_str()
    )
}

/// The `limit` longest short-distance relations with both endpoints.
pub fn longest_short_distances(limit: usize) -> String {
    format!(
        "{RELATION_PREFIXES}
SELECT ?departureName ?departureId ?departureCoord ?arrivalName ?arrivalId ?arrivalCoord ?distance
WHERE {{
    ?relation a otd:Relation ;
              schema:departureStation ?departure ;
              schema:arrivalStation ?arrival .

    ?departure rdfs:label ?departureName ;
               dcterms:identifier ?departureId ;
               geos:hasGeometry/geos:asWKT ?departureCoord .

    ?arrival rdfs:label ?arrivalName ;
             dcterms:identifier ?arrivalId ;
             geos:hasGeometry/geos:asWKT ?arrivalCoord .

{DISTANCE_BINDING}}}
ORDER BY DESC(?distance)
LIMIT {limit}"
    )
}

/// Per-station count of departing short-distance relations (heatmap input),
/// descending by count.
pub fn short_distance_count_by_station() -> String {
    format!(
        "{RELATION_PREFIXES}
SELECT DISTINCT ?name ?coord (COUNT(?id) AS ?count)
WHERE {{
    ?relation a otd:Relation ;
              schema:departureStation ?departure .
    ?departure rdfs:label ?name ;
               dcterms:identifier ?id ;
               geos:hasGeometry/geos:asWKT ?coord .
}} GROUP BY ?name ?coord ORDER BY DESC(?count)"
    )
}

/// All zoning plans with their labels.
pub fn zoning_plans() -> String {
    format!(
        "{RELATION_PREFIXES}
SELECT ?plan ?name
FROM <https://linked.opendata.swiss/graph/sbb/nova>
WHERE {{
    ?plan a otd:ZoningPlan ;
          rdfs:label ?name .
}} ORDER BY ?name"
    )
}

/// Distinct departure stations of relations within the given zoning plan.
pub fn zoning_plan_stations(plan: &PlanUri) -> String {
    format!(
        "{RELATION_PREFIXES}
SELECT DISTINCT ?id ?name ?coord
WHERE {{
    ?relation a otd:Relation ;
              otd:zoningPlan <{plan}> ;
              schema:departureStation ?departure .
    ?departure rdfs:label ?name ;
               dcterms:identifier ?id ;
               geos:hasGeometry/geos:asWKT ?coord .
}}",
        plan = plan.as_str()
    )
}

/// The distance column over every short-distance relation (histogram input).
pub fn distances_of_all_short_distances() -> String {
    format!(
        "{RELATION_PREFIXES}
SELECT ?distance
WHERE {{
    ?relation a otd:Relation ;
              schema:departureStation ?departure ;
              schema:arrivalStation ?arrival .
{DISTANCE_BINDING}}}"
    )
}

/// The distance column over relations within one zoning plan.
pub fn distances_for_zoning_plan(plan: &PlanUri) -> String {
    format!(
        "{RELATION_PREFIXES}
SELECT ?distance
WHERE {{
    ?relation a otd:Relation ;
              otd:zoningPlan <{plan}> ;
              schema:departureStation ?departure ;
              schema:arrivalStation ?arrival .
{DISTANCE_BINDING}}}",
        plan = plan.as_str()
    )
}

/// Distinct IDs of stations that have at least one departing relation.
pub fn station_ids_with_short_distances() -> String {
    format!(
        "{RELATION_PREFIXES}
SELECT DISTINCT ?id
WHERE {{
    ?relation a otd:Relation ;
              schema:departureStation ?departure .
    ?departure dcterms:identifier ?id .
}}"
    )
}

/// Split search terms on whitespace; empty tokens never occur.
pub fn tokenize(terms: &str) -> impl Iterator<Item = &str> {
    terms.split_whitespace()
}

/// Escape a string for use inside a double-quoted SPARQL literal.
fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
