use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::constants::UNKNOWN_REGION;

/// Everything after the final comma, leading whitespace skipped.
static REGION_SUFFIX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([^,]*)$").expect("region pattern is valid"));

/// Derive the coarse region from a free-text `place`.
///
/// ```
/// use quake_dashboard::processors::extract_region;
///
/// assert_eq!(extract_region(Some("10km N of Example, Some Region")), "Some Region");
/// assert_eq!(extract_region(Some("Southern East Pacific Rise")), "Unknown");
/// ```
pub fn extract_region(place: Option<&str>) -> String {
    place
        .and_then(|p| REGION_SUFFIX_PATTERN.captures(p))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end())
        .filter(|region| !region.is_empty())
        .unwrap_or(UNKNOWN_REGION)
        .to_string()
}
