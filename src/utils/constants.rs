/// Canonical timestamp output format (microsecond precision, local civil time)
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Default civil timezone for epoch-based sources
pub const DEFAULT_CIVIL_TIMEZONE: &str = "Europe/Athens";

/// Default staging encoding label
pub const DEFAULT_STAGING_ENCODING: &str = "utf-8";

/// Partition file extension
pub const PARTITION_EXTENSION: &str = "csv";

/// Environment prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "METEO_NORMALIZER";

/// Wind direction sentinel for calm wind
pub const CALM_DIRECTION: f64 = -1.0;

/// Degrees between adjacent compass points
pub const COMPASS_STEP_DEGREES: f64 = 22.5;

/// 16-point compass, clockwise from north
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Raw values treated as "not reported"
pub const NULL_MARKERS: [&str; 3] = ["", "none", "null"];

/// Heat index is undefined below this temperature (°F)
pub const HEAT_INDEX_MIN_TEMP_F: f64 = 80.0;

/// Wind chill is undefined above this temperature (°C)
pub const WIND_CHILL_MAX_TEMP_C: f64 = 10.0;

/// Wind chill is undefined at or below this wind speed (km/h, 3 mph)
pub const WIND_CHILL_MIN_SPEED_KPH: f64 = 4.828;
