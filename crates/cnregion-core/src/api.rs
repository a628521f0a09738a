// crates/cnregion-core/src/api.rs
use crate::model::Region;
use crate::traits::RegionInfo;
use crate::view::{District, ViewRegion};
use crate::years::Year;
use serde::{Deserialize, Serialize};

/// Flat, serializable description of a region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: String,
    pub full_id: String,
    pub name: String,
    pub full_name: String,
    /// Absent for districts, which sit outside the level hierarchy.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub level: Option<String>,
    pub versions: Vec<Year>,
    /// Number of direct children.
    pub items: usize,
}

impl RegionRecord {
    fn from_info<'a>(info: &impl RegionInfo<'a>, level: Option<String>) -> Self {
        RegionRecord {
            id: info.id().to_string(),
            full_id: info.full_id().to_string(),
            name: info.name().to_string(),
            full_name: info.full_name().to_string(),
            level,
            versions: info.versions(),
            items: info.items().len(),
        }
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<&Region> for RegionRecord {
    fn from(region: &Region) -> Self {
        RegionRecord {
            id: region.id().to_string(),
            full_id: region.full_id().to_string(),
            name: region.name().to_string(),
            full_name: region.full_name().to_string(),
            level: Some(region.level().name().to_string()),
            versions: region.versions().to_vec(),
            items: region.items().len(),
        }
    }
}

impl From<&ViewRegion<'_>> for RegionRecord {
    fn from(region: &ViewRegion<'_>) -> Self {
        Self::from_info(region, Some(region.level().name().to_string()))
    }
}

impl From<&District<'_>> for RegionRecord {
    fn from(district: &District<'_>) -> Self {
        Self::from_info(district, None)
    }
}

/// Renders a list of records as a JSON array.
#[cfg(feature = "json")]
pub fn to_json_array(records: &[RegionRecord]) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
