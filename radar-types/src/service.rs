//! Services whose reachability the radar measures.

use std::fmt;
use std::str::FromStr;

/// A monitored internet service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Service {
    Google,
    Github,
    Wikipedia,
    Playstation,
    Bing,
    Digikala,
    Divar,
    Aparat,
}

impl Service {
    /// Every service the radar reports, in display order.
    pub const ALL: [Service; 8] = [
        Service::Google,
        Service::Github,
        Service::Wikipedia,
        Service::Playstation,
        Service::Bing,
        Service::Digikala,
        Service::Divar,
        Service::Aparat,
    ];

    /// The key used for this service in API responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Service::Google => "google",
            Service::Github => "github",
            Service::Wikipedia => "wikipedia",
            Service::Playstation => "playstation",
            Service::Bing => "bing",
            Service::Digikala => "digikala",
            Service::Divar => "divar",
            Service::Aparat => "aparat",
        }
    }

    /// Human readable name with the first letter capitalized.
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseServiceError(pub String);

impl fmt::Display for ParseServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid service: {}", self.0)
    }
}

impl std::error::Error for ParseServiceError {}

impl FromStr for Service {
    type Err = ParseServiceError;

    /// Parse a service name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Service::ALL
            .iter()
            .copied()
            .find(|svc| svc.as_str() == normalized)
            .ok_or_else(|| ParseServiceError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("google".parse::<Service>(), Ok(Service::Google));
        assert_eq!("GitHub".parse::<Service>(), Ok(Service::Github));
        assert_eq!(" APARAT ".parse::<Service>(), Ok(Service::Aparat));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "yahoo".parse::<Service>().unwrap_err();
        assert_eq!(err, ParseServiceError("yahoo".to_string()));
        assert_eq!(err.to_string(), "invalid service: yahoo");
        assert!("".parse::<Service>().is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Service::Playstation.display_name(), "Playstation");
        assert_eq!(Service::Bing.to_string(), "bing");
    }

    #[test]
    fn test_all_round_trips_through_as_str() {
        for svc in Service::ALL {
            assert_eq!(svc.as_str().parse::<Service>(), Ok(svc));
        }
    }
}
