//! Target city / region classification.

use crate::normalize::title_case;

/// Category for contacts outside the target region.
pub const OTHER_STATE: &str = "Other_State";

/// The city and region the pipeline flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRegion {
    /// Canonical title-cased city name, e.g. "Pune".
    pub city: String,
    /// Region (state) name, compared case-insensitively.
    pub region: String,
}

impl Default for TargetRegion {
    fn default() -> Self {
        Self::new("Pune", "Maharashtra")
    }
}

impl TargetRegion {
    /// Create a target from a city and region name.
    ///
    /// The city is stored title-cased so it compares against extracted cities.
    pub fn new(city: &str, region: &str) -> Self {
        Self {
            city: title_case(city.trim()),
            region: region.trim().to_string(),
        }
    }

    /// Category label for the target city.
    pub fn city_label(&self) -> String {
        self.city.clone()
    }

    /// Category label for the rest of the target region.
    pub fn region_label(&self) -> String {
        format!("{}_Other", title_case(&self.region))
    }
}

/// Result of classifying a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Whether the contact is in the target city.
    pub is_target: bool,
    /// Category label; never empty.
    pub category: String,
}

/// Classify an extracted (city, state) pair. The first matching rule wins.
pub fn classify(target: &TargetRegion, city: Option<&str>, state: Option<&str>) -> Classification {
    if city == Some(target.city.as_str()) {
        return Classification {
            is_target: true,
            category: target.city_label(),
        };
    }

    let region = target.region.to_lowercase();
    if state.is_some_and(|s| s.trim().to_lowercase() == region) {
        return Classification {
            is_target: false,
            category: target.region_label(),
        };
    }

    Classification {
        is_target: false,
        category: OTHER_STATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_city() {
        let target = TargetRegion::default();
        let c = classify(&target, Some("Pune"), Some("maharashtra"));
        assert!(c.is_target);
        assert_eq!(c.category, "Pune");

        // City wins even when the state disagrees.
        let c = classify(&target, Some("Pune"), Some("karnataka"));
        assert!(c.is_target);
    }

    #[test]
    fn test_city_match_is_case_sensitive() {
        let target = TargetRegion::default();
        let c = classify(&target, Some("pune"), None);
        assert!(!c.is_target);
        assert_eq!(c.category, OTHER_STATE);
    }

    #[test]
    fn test_rest_of_region() {
        let target = TargetRegion::default();
        let c = classify(&target, Some("Nagpur"), Some("maharashtra"));
        assert!(!c.is_target);
        assert_eq!(c.category, "Maharashtra_Other");

        let c = classify(&target, None, Some("MAHARASHTRA"));
        assert_eq!(c.category, "Maharashtra_Other");
    }

    #[test]
    fn test_other_state() {
        let target = TargetRegion::default();
        assert_eq!(classify(&target, None, Some("delhi")).category, OTHER_STATE);
        assert_eq!(classify(&target, None, None).category, OTHER_STATE);
    }

    #[test]
    fn test_custom_target() {
        let target = TargetRegion::new("bengaluru", "karnataka");
        assert_eq!(target.city, "Bengaluru");
        assert_eq!(target.region_label(), "Karnataka_Other");

        let c = classify(&target, None, Some("karnataka"));
        assert_eq!(c.category, "Karnataka_Other");
    }

    #[test]
    fn test_region_match_ignores_non_ascii_case() {
        let target = TargetRegion::new("Paris", "ÎLE-DE-FRANCE");
        let c = classify(&target, None, Some("île-de-france"));
        assert!(!c.is_target);
        assert_eq!(c.category, target.region_label());
        assert_ne!(c.category, OTHER_STATE);
    }

    #[test]
    fn test_classification_is_total() {
        let target = TargetRegion::default();
        let cities = [None, Some("Pune"), Some("Mumbai"), Some("")];
        let states = [None, Some("maharashtra"), Some("delhi"), Some("")];

        for city in cities {
            for state in states {
                let c = classify(&target, city, state);
                assert!(!c.category.is_empty());
                assert_eq!(c.is_target, c.category == "Pune");
            }
        }
    }
}
