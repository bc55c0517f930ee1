//! Row → domain conversion.
//!
//! Each function maps one result row of the corresponding query in
//! [`super::query`] to a typed domain record. Conversion happens right at
//! the fetch boundary; list call sites skip rows that fail to convert
//! (logging a warning) so one malformed binding cannot take down a whole
//! result set.

use crate::domain::{
    LatLng, PlanUri, ShortDistance, ShortDistancePair, Station, StationActivity, StationId,
    ZoningPlan,
};

use super::error::SparqlError;
use super::results::Row;

/// A station row from `all_stations` / `stations_matching`:
/// `?id ?name ?lat ?lng`.
pub fn station(row: &Row) -> Result<Station, SparqlError> {
    Ok(Station {
        id: station_id(row, "id")?,
        name: row.str("name")?.to_string(),
        pos: LatLng::new(row.f64("lat")?, row.f64("lng")?),
    })
}

/// A station row carrying a WKT coordinate from `zoning_plan_stations`:
/// `?id ?name ?coord`.
pub fn station_with_wkt(row: &Row) -> Result<Station, SparqlError> {
    Ok(Station {
        id: station_id(row, "id")?,
        name: row.str("name")?.to_string(),
        pos: row.wkt_point("coord")?,
    })
}

/// A drill-down row from `short_distances_for`:
/// `?id ?name ?lat ?lng ?distance`.
pub fn short_distance(row: &Row) -> Result<ShortDistance, SparqlError> {
    Ok(ShortDistance {
        arrival: station(row)?,
        distance_m: row.distance_m("distance")?,
    })
}

/// A row from `longest_short_distances`, with both endpoints as WKT.
pub fn short_distance_pair(row: &Row) -> Result<ShortDistancePair, SparqlError> {
    Ok(ShortDistancePair {
        departure: Station {
            id: station_id(row, "departureId")?,
            name: row.str("departureName")?.to_string(),
            pos: row.wkt_point("departureCoord")?,
        },
        arrival: Station {
            id: station_id(row, "arrivalId")?,
            name: row.str("arrivalName")?.to_string(),
            pos: row.wkt_point("arrivalCoord")?,
        },
        distance_m: row.distance_m("distance")?,
    })
}

/// A heatmap row from `short_distance_count_by_station`:
/// `?name ?coord ?count`.
pub fn station_activity(row: &Row) -> Result<StationActivity, SparqlError> {
    Ok(StationActivity {
        name: row.str("name")?.to_string(),
        pos: row.wkt_point("coord")?,
        count: row.u64("count")?,
    })
}

/// A zoning-plan row from `zoning_plans`: `?plan ?name`.
pub fn zoning_plan(row: &Row) -> Result<ZoningPlan, SparqlError> {
    let raw = row.str("plan")?;
    let uri = PlanUri::parse(raw).map_err(|_| SparqlError::Malformed {
        var: "plan".to_string(),
        value: raw.to_string(),
        expected: "an absolute http(s) IRI",
    })?;
    Ok(ZoningPlan {
        uri,
        name: row.str("name")?.to_string(),
    })
}

/// A distance row from the histogram queries: `?distance`.
pub fn distance(row: &Row) -> Result<u32, SparqlError> {
    row.distance_m("distance")
}

fn station_id(row: &Row, var: &str) -> Result<StationId, SparqlError> {
    let raw = row.str(var)?;
    StationId::parse(raw).map_err(|_| SparqlError::Malformed {
        var: var.to_string(),
        value: raw.to_string(),
        expected: "a station ID",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::results::Term;

    fn term(var: &str, value: &str) -> (String, Term) {
        (var.to_string(), Term::literal(value))
    }

    #[test]
    fn station_from_row() {
        let row = Row::new([
            term("id", "8503000"),
            term("name", "Zürich HB"),
            term("lat", "47.378177"),
            term("lng", "8.540212"),
        ]);
        let s = station(&row).unwrap();
        assert_eq!(s.id.as_str(), "8503000");
        assert_eq!(s.name, "Zürich HB");
        assert_eq!(s.pos, LatLng::new(47.378177, 8.540212));
    }

    #[test]
    fn station_rejects_bad_coordinate() {
        let row = Row::new([
            term("id", "8503000"),
            term("name", "Zürich HB"),
            term("lat", "forty-seven"),
            term("lng", "8.540212"),
        ]);
        assert!(matches!(
            station(&row),
            Err(SparqlError::Malformed { .. })
        ));
    }

    #[test]
    fn station_rejects_unsafe_id() {
        let row = Row::new([
            term("id", "85030 00"),
            term("name", "X"),
            term("lat", "47.0"),
            term("lng", "8.0"),
        ]);
        assert!(station(&row).is_err());
    }

    #[test]
    fn short_distance_from_row() {
        let row = Row::new([
            term("id", "8503006"),
            term("name", "Zürich Oerlikon"),
            term("lat", "47.411529"),
            term("lng", "8.544115"),
            term("distance", "1287"),
        ]);
        let sd = short_distance(&row).unwrap();
        assert_eq!(sd.arrival.name, "Zürich Oerlikon");
        assert_eq!(sd.distance_m, 1287);
    }

    #[test]
    fn pair_from_row() {
        let row = Row::new([
            term("departureId", "8503000"),
            term("departureName", "Zürich HB"),
            term("departureCoord", "POINT(8.540212 47.378177)"),
            term("arrivalId", "8503006"),
            term("arrivalName", "Zürich Oerlikon"),
            term("arrivalCoord", "POINT(8.544115 47.411529)"),
            term("distance", "3712"),
        ]);
        let pair = short_distance_pair(&row).unwrap();
        assert_eq!(pair.departure.id.as_str(), "8503000");
        assert_eq!(pair.arrival.pos.lat, 47.411529);
        assert_eq!(pair.distance_m, 3712);
    }

    #[test]
    fn activity_from_row() {
        let row = Row::new([
            term("name", "Bern"),
            term("coord", "POINT(7.439122 46.948832)"),
            term("count", "23"),
        ]);
        let a = station_activity(&row).unwrap();
        assert_eq!(a.name, "Bern");
        assert_eq!(a.count, 23);
        assert_eq!(a.pos.lng, 7.439122);
    }

    #[test]
    fn zoning_plan_from_row() {
        let row = Row::new([
            (
                "plan".to_string(),
                Term::uri("https://lod.opentransportdata.swiss/zoningplan/nova/libero"),
            ),
            term("name", "Libero"),
        ]);
        let plan = zoning_plan(&row).unwrap();
        assert_eq!(plan.name, "Libero");
        assert!(plan.uri.as_str().ends_with("libero"));
    }

    #[test]
    fn zoning_plan_rejects_non_http_uri() {
        let row = Row::new([term("plan", "urn:x:y"), term("name", "X")]);
        assert!(zoning_plan(&row).is_err());
    }
}
