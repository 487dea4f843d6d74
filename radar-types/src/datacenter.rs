//! Datacenters (ISPs) that act as measurement vantage points.

use std::borrow::Borrow;
use std::fmt;

/// Identifiers of the vantage points the radar API reports data for.
///
/// `sindad-buf`, `sindad-thr` and `sindad-thr-fanava` are listed by the radar
/// website but the API returns no data for them, so they are left out.
pub const KNOWN_DATACENTERS: &[&str] = &[
    "mci",
    "irancell",
    "tehran-2",
    "tehran-3",
    "hostiran",
    "parsonline",
    "afranet",
    "bertina-xrx",
    "bertina-thr",
    "ajk-abrbaran",
];

/// A datacenter or ISP from which reachability is measured.
///
/// This is an opaque token. The radar API selects the vantage point with
/// the `isp` query parameter, which takes this value verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Datacenter(String);

impl Datacenter {
    /// Create a datacenter identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// All datacenters known to report data, in display order.
    pub fn known() -> Vec<Datacenter> {
        KNOWN_DATACENTERS.iter().copied().map(Datacenter::from).collect()
    }

    /// The identifier as sent to the API.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of [`KNOWN_DATACENTERS`].
    pub fn is_known(&self) -> bool {
        KNOWN_DATACENTERS.contains(&self.0.as_str())
    }
}

impl fmt::Display for Datacenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Datacenter {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Datacenter {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for Datacenter {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Datacenter {
    fn borrow(&self) -> &str {
        &self.0
    }
}
