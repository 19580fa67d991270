//! Directory model definitions

use serde::{Deserialize, Serialize};

/// An artist matched by a name search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedEntity {
    pub id: i64,
    pub display_name: String,
    /// Opaque event-listing URLs, in upstream order
    pub identifiers: Vec<String>,
}

impl MatchedEntity {
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            identifiers: Vec::new(),
        }
    }

    /// Add an identifier handle
    pub fn with_identifier(mut self, events_href: impl Into<String>) -> Self {
        self.identifiers.push(events_href.into());
        self
    }

    /// The handle used to fetch events. Only the first identifier counts.
    pub fn events_href(&self) -> Option<&str> {
        self.identifiers.first().map(String::as_str)
    }
}

/// A single scheduled event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub display_name: String,
    pub date: String,
    pub city: String,
    pub venue_name: String,
}

impl EventRecord {
    pub fn new(display_name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            date: String::new(),
            city: city.into(),
            venue_name: String::new(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_venue(mut self, venue_name: impl Into<String>) -> Self {
        self.venue_name = venue_name.into();
        self
    }

    /// `<eventName>, <city>` as printed by the CLI
    pub fn summary_line(&self) -> String {
        format!("{}, {}", self.display_name, self.city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_href_uses_first_identifier() {
        let entity = MatchedEntity::new(1, "Bob")
            .with_identifier("http://a/1")
            .with_identifier("http://a/2");
        assert_eq!(entity.events_href(), Some("http://a/1"));
        assert_eq!(MatchedEntity::new(2, "Nobody").events_href(), None);
    }

    #[test]
    fn test_summary_line() {
        let event = EventRecord::new("Gig", "Berlin")
            .with_date("2026-11-02")
            .with_venue("Berghain");
        assert_eq!(event.summary_line(), "Gig, Berlin");
    }
}
