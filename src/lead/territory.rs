//! Territory assignment: route a lead to a sales region by its reported state.
//!
//! Regions are tried in declaration order. A region matches when one of its
//! state names is a case-insensitive substring of the lead's state string.
//! No match (including an empty or missing state) yields the default region.

use serde::{Deserialize, Serialize};

use super::Location;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    pub region: String,
    pub office: String,
}

impl Territory {
    pub fn new(region: impl Into<String>, office: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            office: office.into(),
        }
    }

    pub fn central() -> Self {
        Self::new("Central", "Central DSRO")
    }
}

impl Default for Territory {
    fn default() -> Self {
        Self::central()
    }
}

/// One `[[territories]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCfg {
    pub region: String,
    pub office: String,
    #[serde(default)]
    pub states: Vec<String>,
}

#[derive(Debug, Clone)]
struct CompiledRegion {
    territory: Territory,
    // lowercased, non-empty
    states: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TerritoryTable {
    regions: Vec<CompiledRegion>,
    default: Territory,
}

impl Default for TerritoryTable {
    fn default() -> Self {
        Self::new(Vec::new(), Territory::central())
    }
}

impl TerritoryTable {
    pub fn new(regions: Vec<RegionCfg>, default: Territory) -> Self {
        let regions = regions
            .into_iter()
            .map(|r| CompiledRegion {
                territory: Territory::new(r.region, r.office),
                states: r
                    .states
                    .iter()
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
            })
            .collect();
        Self { regions, default }
    }

    pub fn default_territory(&self) -> &Territory {
        &self.default
    }

    /// Region names in lookup order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.territory.region.as_str())
    }

    pub fn assign(&self, location: Option<&Location>) -> Territory {
        let state = location
            .and_then(|l| l.state.as_deref())
            .unwrap_or("")
            .to_lowercase();
        self.assign_state(&state)
    }

    fn assign_state(&self, state_lower: &str) -> Territory {
        if state_lower.trim().is_empty() {
            return self.default.clone();
        }
        self.regions
            .iter()
            .find(|r| r.states.iter().any(|s| state_lower.contains(s.as_str())))
            .map(|r| r.territory.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TerritoryTable {
        TerritoryTable::new(
            vec![
                RegionCfg {
                    region: "Northern".into(),
                    office: "Delhi DSRO".into(),
                    states: vec!["Delhi".into(), "Uttar Pradesh".into()],
                },
                RegionCfg {
                    region: "Western".into(),
                    office: "Mumbai DSRO".into(),
                    states: vec!["Maharashtra".into(), "Madhya Pradesh".into(), "".into()],
                },
            ],
            Territory::central(),
        )
    }

    #[test]
    fn substring_and_case_insensitive() {
        let t = table();
        let loc = Location::in_state("near PUNE, maharashtra state");
        assert_eq!(t.assign(Some(&loc)).office, "Mumbai DSRO");
    }

    #[test]
    fn first_region_in_declaration_order_wins() {
        let t = table();
        let loc = Location::in_state("Delhi / Maharashtra border office");
        assert_eq!(t.assign(Some(&loc)).region, "Northern");
    }

    #[test]
    fn empty_state_entries_never_match_everything() {
        let t = table();
        let loc = Location::in_state("Kerala");
        assert_eq!(t.assign(Some(&loc)), Territory::central());
    }

    #[test]
    fn missing_and_blank_fall_through_to_default() {
        let t = table();
        assert_eq!(t.assign(None), Territory::central());
        assert_eq!(t.assign(Some(&Location::default())), Territory::central());
        assert_eq!(t.assign(Some(&Location::in_state("   "))), Territory::central());
    }
}
