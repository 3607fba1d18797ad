//! Package records produced by the output interpreters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One installed package as reported by `pip list` or `pip freeze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Distribution name, never empty.
    pub name: String,
    /// Absent for editable and VCS entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub editable: bool,
    /// Newest index version, only reported by `pip list --outdated`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
            location: None,
            editable: false,
            latest_version: None,
        }
    }

    /// An editable install, which has no pinned version.
    pub fn editable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            location: None,
            editable: true,
            latest_version: None,
        }
    }
}

/// Full `pip show` record for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDetail {
    pub name: String,
    pub version: Option<String>,
    pub summary: Option<String>,
    pub home_page: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub license: Option<String>,
    pub location: Option<String>,
    pub requires: Vec<String>,
    pub required_by: Vec<String>,
    pub files: Vec<String>,
    /// Fields pip reported that have no dedicated attribute.
    pub metadata: BTreeMap<String, String>,
}
