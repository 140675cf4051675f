//! Core types and data structures for OpenBlu

use crate::error::OpenBluError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Default number of servers shown by a listing
pub const DEFAULT_LIMIT: usize = 5;

/// One VPN server's metadata as returned by the directory API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Unique server identifier
    pub id: String,
    /// Public address of the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Host name advertised by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    /// Full country name, e.g. "Japan"
    #[serde(default)]
    pub country: String,
    /// ISO country code, e.g. "JP"
    #[serde(default)]
    pub country_short: String,
    /// Quality score computed by the directory (higher is better)
    #[serde(default)]
    pub score: f64,
    /// Round-trip time in milliseconds
    #[serde(default)]
    pub ping: i64,
    /// Currently open sessions
    #[serde(default)]
    pub sessions: i64,
    /// Sessions served since the server was listed
    #[serde(default)]
    pub total_sessions: i64,
    /// Unix timestamp of the last directory refresh
    #[serde(default)]
    pub last_updated: i64,
    /// Unix timestamp of the first listing
    #[serde(default)]
    pub created: i64,
}

impl ServerRecord {
    /// Value of the given sort field, widened to `f64` so that all fields
    /// compare the same way. Timestamps and counters fit exactly.
    pub fn sort_value(&self, field: OrderField) -> f64 {
        match field {
            OrderField::Score => self.score,
            OrderField::Ping => self.ping as f64,
            OrderField::Sessions => self.sessions as f64,
            OrderField::TotalSessions => self.total_sessions as f64,
            OrderField::LastUpdated => self.last_updated as f64,
            OrderField::Created => self.created as f64,
        }
    }

    /// Value of the given filter field
    pub fn filter_value(&self, field: FilterField) -> &str {
        match field {
            FilterField::Country => &self.country,
            FilterField::CountryShort => &self.country_short,
        }
    }
}

/// OpenVPN material attached to a server detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenVpnConfig {
    /// Complete `.ovpn` file content
    pub ovpn_configuration: String,
}

/// Detailed view of a single server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(flatten)]
    pub record: ServerRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openvpn: Option<OpenVpnConfig>,
}

impl ServerInfo {
    /// The downloadable configuration blob, if the API sent one
    pub fn ovpn_configuration(&self) -> Option<&str> {
        self.openvpn
            .as_ref()
            .map(|o| o.ovpn_configuration.as_str())
            .filter(|c| !c.trim().is_empty())
    }
}

/// Field a listing can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Country,
    CountryShort,
}

impl FromStr for FilterField {
    type Err = OpenBluError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "country" => Ok(FilterField::Country),
            "country_short" => Ok(FilterField::CountryShort),
            other => Err(OpenBluError::Usage(format!(
                "Unknown filter field '{}'. Must be 'country' or 'country_short'",
                other
            ))),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterField::Country => write!(f, "country"),
            FilterField::CountryShort => write!(f, "country_short"),
        }
    }
}

/// Field a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    Score,
    Ping,
    Sessions,
    TotalSessions,
    LastUpdated,
    Created,
}

impl FromStr for OrderField {
    type Err = OpenBluError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(OrderField::Score),
            "ping" => Ok(OrderField::Ping),
            "sessions" => Ok(OrderField::Sessions),
            "total_sessions" => Ok(OrderField::TotalSessions),
            "last_updated" => Ok(OrderField::LastUpdated),
            "created" => Ok(OrderField::Created),
            other => Err(OpenBluError::Usage(format!(
                "Unknown order field '{}'. Must be one of score, ping, sessions, \
                 total_sessions, last_updated, created",
                other
            ))),
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderField::Score => "score",
            OrderField::Ping => "ping",
            OrderField::Sessions => "sessions",
            OrderField::TotalSessions => "total_sessions",
            OrderField::LastUpdated => "last_updated",
            OrderField::Created => "created",
        };
        write!(f, "{}", name)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Apply the direction to an ascending comparison result
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = OpenBluError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(SortDirection::Ascending),
            "descending" => Ok(SortDirection::Descending),
            other => Err(OpenBluError::Usage(format!(
                "Unknown sort direction '{}'. Must be 'ascending' or 'descending'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// Restricts a listing to servers whose field contains a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub field: FilterField,
    pub value: String,
}

impl FilterSpec {
    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Build a filter from the two halves supplied on the command line.
    ///
    /// Both halves must be present or both absent.
    pub fn from_parts(field: Option<FilterField>, value: Option<String>) -> crate::Result<Option<Self>> {
        match (field, value) {
            (Some(field), Some(value)) => Ok(Some(Self::new(field, value))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(OpenBluError::Usage(
                "--filter-by requires a --filter value".to_string(),
            )),
            (None, Some(_)) => Err(OpenBluError::Usage(
                "--filter requires --filter-by".to_string(),
            )),
        }
    }

    /// Case-insensitive containment test on the selected field
    pub fn matches(&self, record: &ServerRecord) -> bool {
        record
            .filter_value(self.field)
            .to_lowercase()
            .contains(&self.value.to_lowercase())
    }
}

/// Orders a listing by one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub field: OrderField,
    pub direction: SortDirection,
}

impl OrderSpec {
    pub fn new(field: OrderField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Build an ordering from the command-line halves.
    ///
    /// A field without a direction sorts ascending; a direction without a
    /// field is rejected.
    pub fn from_parts(
        field: Option<OrderField>,
        direction: Option<SortDirection>,
    ) -> crate::Result<Option<Self>> {
        match (field, direction) {
            (Some(field), direction) => Ok(Some(Self::new(field, direction.unwrap_or_default()))),
            (None, None) => Ok(None),
            (None, Some(_)) => Err(OpenBluError::Usage(
                "--sort-by requires --order-by".to_string(),
            )),
        }
    }

    /// Compare two records according to this ordering
    pub fn compare(&self, a: &ServerRecord, b: &ServerRecord) -> Ordering {
        let ordering = a
            .sort_value(self.field)
            .total_cmp(&b.sort_value(self.field));
        self.direction.apply(ordering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_record_defaults_missing_fields() {
        let record: ServerRecord =
            serde_json::from_str(r#"{"id": "abc", "country": "Japan"}"#).unwrap();

        assert_eq!(record.id, "abc");
        assert_eq!(record.country, "Japan");
        assert_eq!(record.country_short, "");
        assert_eq!(record.score, 0.0);
        assert_eq!(record.ping, 0);
        assert!(record.ip_address.is_none());
    }

    #[test]
    fn test_server_info_flattens_record() {
        let json = r#"{
            "id": "a1",
            "country": "Italy",
            "country_short": "IT",
            "score": 42,
            "openvpn": {"ovpn_configuration": "client\ndev tun\n"}
        }"#;
        let info: ServerInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.record.id, "a1");
        assert_eq!(info.record.score, 42.0);
        assert_eq!(info.ovpn_configuration(), Some("client\ndev tun\n"));
    }

    #[test]
    fn test_server_info_blank_configuration_is_none() {
        let info: ServerInfo =
            serde_json::from_str(r#"{"id": "a1", "openvpn": {"ovpn_configuration": "  "}}"#)
                .unwrap();
        assert!(info.ovpn_configuration().is_none());
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("country".parse::<FilterField>().unwrap(), FilterField::Country);
        assert_eq!(
            "country_short".parse::<FilterField>().unwrap(),
            FilterField::CountryShort
        );
        assert!(matches!(
            "city".parse::<FilterField>(),
            Err(OpenBluError::Usage(_))
        ));

        assert_eq!(
            "total_sessions".parse::<OrderField>().unwrap(),
            OrderField::TotalSessions
        );
        assert!(matches!(
            "bandwidth".parse::<OrderField>(),
            Err(OpenBluError::Usage(_))
        ));

        assert_eq!(
            "descending".parse::<SortDirection>().unwrap(),
            SortDirection::Descending
        );
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for field in [
            OrderField::Score,
            OrderField::Ping,
            OrderField::Sessions,
            OrderField::TotalSessions,
            OrderField::LastUpdated,
            OrderField::Created,
        ] {
            assert_eq!(field.to_string().parse::<OrderField>().unwrap(), field);
        }
    }

    #[test]
    fn test_filter_spec_requires_both_parts() {
        assert_eq!(FilterSpec::from_parts(None, None).unwrap(), None);
        assert!(FilterSpec::from_parts(Some(FilterField::Country), Some("jp".into()))
            .unwrap()
            .is_some());
        assert!(matches!(
            FilterSpec::from_parts(Some(FilterField::Country), None),
            Err(OpenBluError::Usage(_))
        ));
        assert!(matches!(
            FilterSpec::from_parts(None, Some("japan".into())),
            Err(OpenBluError::Usage(_))
        ));
    }

    #[test]
    fn test_order_spec_defaults_to_ascending() {
        let spec = OrderSpec::from_parts(Some(OrderField::Ping), None)
            .unwrap()
            .unwrap();
        assert_eq!(spec.direction, SortDirection::Ascending);

        assert!(matches!(
            OrderSpec::from_parts(None, Some(SortDirection::Descending)),
            Err(OpenBluError::Usage(_))
        ));
    }

    #[test]
    fn test_filter_matches_case_insensitive_substring() {
        let record = ServerRecord {
            id: "1".into(),
            ip_address: None,
            host_name: None,
            country: "Japan".into(),
            country_short: "JP".into(),
            score: 0.0,
            ping: 0,
            sessions: 0,
            total_sessions: 0,
            last_updated: 0,
            created: 0,
        };

        assert!(FilterSpec::new(FilterField::Country, "japan").matches(&record));
        assert!(FilterSpec::new(FilterField::Country, "JAP").matches(&record));
        assert!(FilterSpec::new(FilterField::CountryShort, "jp").matches(&record));
        assert!(!FilterSpec::new(FilterField::Country, "thailand").matches(&record));
    }
}
