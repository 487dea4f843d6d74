//! Reachability samples and their classification.

use crate::Service;

/// One reachability reading for a (datacenter, service) pair.
///
/// Zero means the service was reachable. Any other value means it was not;
/// the sign and magnitude carry no further meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Sample(f64);

impl Sample {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// The raw reading.
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// See [`is_accessible`].
    pub fn is_accessible(&self) -> bool {
        is_accessible(*self)
    }
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Classify a sample: reachable if and only if the reading is exactly zero.
pub fn is_accessible(sample: Sample) -> bool {
    sample.0 == 0.0
}

/// The reading history the API returns for one service at one datacenter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceStatistics {
    pub service: Service,
    /// Readings ordered oldest first.
    pub values: Vec<f64>,
}

impl ServiceStatistics {
    pub fn new(service: Service, values: Vec<f64>) -> Self {
        Self { service, values }
    }

    /// The most recent reading, if any.
    pub fn latest(&self) -> Option<Sample> {
        self.values.last().copied().map(Sample)
    }

    /// Whether the most recent reading says the service is reachable.
    ///
    /// An empty history counts as not accessible.
    pub fn is_accessible_now(&self) -> bool {
        self.latest().is_some_and(|s| s.is_accessible())
    }
}
