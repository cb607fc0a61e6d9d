use serde::{Deserialize, Serialize};

/// Geolocation result for one client IP, as reported by the lookup service.
///
/// Only `city` is required downstream; every other field is best-effort and
/// defaults to an empty string when the service omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    /// Coordinates in the service's "lat,lon" string form.
    #[serde(default)]
    pub loc: String,
}

impl Location {
    /// Parse `loc` into `(latitude, longitude)`.
    ///
    /// A malformed or partial value yields 0.0 for the missing part rather
    /// than an error; the response is still served in that case.
    pub fn coordinates(&self) -> (f64, f64) {
        let mut parts = self.loc.splitn(2, ',');
        let latitude = parts
            .next()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0.0);
        let longitude = parts
            .next()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0.0);
        (latitude, longitude)
    }
}

/// Current conditions for a city; only the temperature is load-bearing.
#[derive(Debug, Clone, Serialize)]
pub struct Weather {
    pub temperature_c: f64,
    pub descriptions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_parse_lat_lon() {
        let location = Location {
            loc: "48.85,2.35".to_string(),
            ..Location::default()
        };
        assert_eq!(location.coordinates(), (48.85, 2.35));
    }

    #[test]
    fn coordinates_tolerate_whitespace() {
        let location = Location {
            loc: " 48.85 , 2.35 ".to_string(),
            ..Location::default()
        };
        assert_eq!(location.coordinates(), (48.85, 2.35));
    }

    #[test]
    fn malformed_coordinates_default_to_zero() {
        for loc in ["", "garbage", "a,b"] {
            let location = Location {
                loc: loc.to_string(),
                ..Location::default()
            };
            assert_eq!(location.coordinates(), (0.0, 0.0), "loc = {loc:?}");
        }
    }

    #[test]
    fn partial_coordinates_keep_the_parsable_half() {
        let location = Location {
            loc: "48.85".to_string(),
            ..Location::default()
        };
        assert_eq!(location.coordinates(), (48.85, 0.0));
    }

    #[test]
    fn location_decodes_with_missing_fields() {
        let location: Location = serde_json::from_str(r#"{"city": "Paris"}"#)
            .expect("partial body should decode");
        assert_eq!(location.city, "Paris");
        assert_eq!(location.ip, "");
        assert_eq!(location.loc, "");
    }
}
