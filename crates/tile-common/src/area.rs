//! Radar coverage areas and their upstream WMS endpoints.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::ProxyError;

/// Upstream WMS endpoint and layer for one data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaConfig {
    pub base_url: &'static str,
    pub layer_name: &'static str,
}

/// Watches, warnings and advisories overlay.
pub const HAZARDS: AreaConfig = AreaConfig {
    base_url: "https://opengeo.ncep.noaa.gov/geoserver/wwa/hazards/ows",
    layer_name: "hazards",
};

const CONUS: AreaConfig = AreaConfig {
    base_url: "https://opengeo.ncep.noaa.gov/geoserver/conus/conus_bref_qcd/ows",
    layer_name: "conus_bref_qcd",
};

const ALASKA: AreaConfig = AreaConfig {
    base_url: "https://opengeo.ncep.noaa.gov/geoserver/alaska/alaska_bref_qcd/ows",
    layer_name: "alaska_bref_qcd",
};

const HAWAII: AreaConfig = AreaConfig {
    base_url: "https://opengeo.ncep.noaa.gov/geoserver/hawaii/hawaii_bref_qcd/ows",
    layer_name: "hawaii_bref_qcd",
};

const CARIB: AreaConfig = AreaConfig {
    base_url: "https://opengeo.ncep.noaa.gov/geoserver/carib/carib_bref_qcd/ows",
    layer_name: "carib_bref_qcd",
};

const GUAM: AreaConfig = AreaConfig {
    base_url: "https://opengeo.ncep.noaa.gov/geoserver/guam/guam_bref_qcd/ows",
    layer_name: "guam_bref_qcd",
};

/// A radar coverage area served by the proxy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    #[default]
    Conus,
    Alaska,
    Hawaii,
    Carib,
    Guam,
}

impl Area {
    pub const ALL: [Area; 5] = [
        Area::Conus,
        Area::Alaska,
        Area::Hawaii,
        Area::Carib,
        Area::Guam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Conus => "conus",
            Area::Alaska => "alaska",
            Area::Hawaii => "hawaii",
            Area::Carib => "carib",
            Area::Guam => "guam",
        }
    }

    /// Base reflectivity layer for this area.
    pub fn config(&self) -> &'static AreaConfig {
        match self {
            Area::Conus => &CONUS,
            Area::Alaska => &ALASKA,
            Area::Hawaii => &HAWAII,
            Area::Carib => &CARIB,
            Area::Guam => &GUAM,
        }
    }

    /// Resolve an optional query value, defaulting to CONUS.
    pub fn from_query(value: Option<&str>) -> Result<Self, ProxyError> {
        match value {
            None | Some("") => Ok(Area::default()),
            Some(name) => name.parse(),
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.to_ascii_lowercase();
        Area::ALL
            .into_iter()
            .find(|area| area.as_str() == folded)
            .ok_or_else(|| ProxyError::InvalidArea(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("conus".parse::<Area>().unwrap(), Area::Conus);
        assert_eq!("ALASKA".parse::<Area>().unwrap(), Area::Alaska);
        assert_eq!("Guam".parse::<Area>().unwrap(), Area::Guam);
    }

    #[test]
    fn test_unknown_area() {
        let err = "mars".parse::<Area>().unwrap_err();
        assert!(matches!(err, ProxyError::InvalidArea(ref name) if name == "mars"));
    }

    #[test]
    fn test_from_query_defaults_to_conus() {
        assert_eq!(Area::from_query(None).unwrap(), Area::Conus);
        assert_eq!(Area::from_query(Some("")).unwrap(), Area::Conus);
        assert_eq!(Area::from_query(Some("Carib")).unwrap(), Area::Carib);
    }

    #[test]
    fn test_every_area_has_its_own_layer() {
        for area in Area::ALL {
            let config = area.config();
            assert!(config.layer_name.starts_with(area.as_str()));
            assert!(config.base_url.ends_with("/ows"));
        }
        assert_eq!(HAZARDS.layer_name, "hazards");
    }
}
