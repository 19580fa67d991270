//! Songkick HTTP API Client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::client::DirectoryClient;
use super::model::{EventRecord, MatchedEntity};
use crate::config::{HttpConfig, ServiceConfig};
use crate::error::Error;
use crate::http;
use crate::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtistSearchResponse {
    results_page: ArtistResultsPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtistResultsPage {
    #[serde(default)]
    total_entries: u64,
    // Empty pages come back as `"results": {}`
    #[serde(default)]
    results: ArtistResults,
}

#[derive(Debug, Default, Deserialize)]
struct ArtistResults {
    #[serde(default)]
    artist: Vec<SongkickArtist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SongkickArtist {
    id: i64,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    identifier: Vec<ArtistIdentifier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtistIdentifier {
    events_href: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsResponse {
    results_page: EventResultsPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventResultsPage {
    #[serde(default)]
    total_entries: u64,
    #[serde(default)]
    results: EventResults,
}

#[derive(Debug, Default, Deserialize)]
struct EventResults {
    #[serde(default)]
    event: Vec<SongkickEvent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SongkickEvent {
    display_name: String,
    start: EventStart,
    location: EventLocation,
    venue: EventVenue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EventStart {
    date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EventLocation {
    city: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct EventVenue {
    display_name: String,
}

impl From<SongkickArtist> for MatchedEntity {
    fn from(artist: SongkickArtist) -> Self {
        Self {
            id: artist.id,
            display_name: artist.display_name,
            identifiers: artist
                .identifier
                .into_iter()
                .map(|identifier| identifier.events_href)
                .collect(),
        }
    }
}

impl From<SongkickEvent> for EventRecord {
    fn from(event: SongkickEvent) -> Self {
        Self {
            display_name: event.display_name,
            date: event.start.date,
            city: event.location.city,
            venue_name: event.venue.display_name,
        }
    }
}

/// Client for the Songkick artist search and calendar endpoints
pub struct SongkickClient {
    client: Client,
    config: ServiceConfig,
}

impl SongkickClient {
    pub fn new(config: ServiceConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(http)?,
            config,
        })
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/search/artists.json?query={}&apikey={}",
            self.config.base_url,
            urlencoding::encode(name),
            urlencoding::encode(&self.config.api_key)
        )
    }
}

#[async_trait]
impl DirectoryClient for SongkickClient {
    async fn find_entity(&self, name: &str) -> Result<Option<MatchedEntity>> {
        let url = self.search_url(name);
        let response: ArtistSearchResponse = http::get_json(&self.client, &url).await?;

        let page = response.results_page;
        if page.total_entries == 0 {
            debug!("No Songkick artist for '{}'", name);
            return Ok(None);
        }

        Ok(page.results.artist.into_iter().next().map(MatchedEntity::from))
    }

    async fn fetch_events(&self, entity: &MatchedEntity) -> Result<Option<EventRecord>> {
        let href = entity.events_href().ok_or_else(|| {
            Error::InvalidInput(format!(
                "artist {} ({}) has no identifiers",
                entity.display_name, entity.id
            ))
        })?;

        let url = http::append_query(href, "apikey", &self.config.api_key);
        let response: EventsResponse = http::get_json(&self.client, &url).await?;

        let page = response.results_page;
        if page.total_entries == 0 {
            debug!("No upcoming events for '{}'", entity.display_name);
            return Ok(None);
        }

        Ok(page.results.event.into_iter().next().map(EventRecord::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SongkickClient {
        SongkickClient::new(
            ServiceConfig::new(server.uri(), "sk-key"),
            &HttpConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_entity_returns_first_artist() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/artists.json"))
            .and(query_param("query", "Daft Punk"))
            .and(query_param("apikey", "sk-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resultsPage": {
                    "status": "ok",
                    "perPage": 50,
                    "page": 1,
                    "totalEntries": 2,
                    "results": {
                        "artist": [
                            {
                                "id": 1,
                                "displayName": "Daft Punk",
                                "identifier": [
                                    {"eventsHref": "http://api.songkick.com/api/3.0/artists/mbid:a/calendar.json"},
                                    {"eventsHref": "http://api.songkick.com/api/3.0/artists/mbid:b/calendar.json"}
                                ]
                            },
                            {"id": 2, "displayName": "Daft Punk Tribute", "identifier": []}
                        ]
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let entity = client_for(&server)
            .find_entity("Daft Punk")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(entity.id, 1);
        assert_eq!(entity.display_name, "Daft Punk");
        assert_eq!(entity.identifiers.len(), 2);
        assert_eq!(
            entity.events_href(),
            Some("http://api.songkick.com/api/3.0/artists/mbid:a/calendar.json")
        );
    }

    #[tokio::test]
    async fn test_find_entity_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/artists.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resultsPage": {"status": "ok", "totalEntries": 0, "results": {}}
            })))
            .mount(&server)
            .await;

        let entity = client_for(&server).find_entity("alice").await.unwrap();
        assert!(entity.is_none());
    }

    #[tokio::test]
    async fn test_find_entity_server_error_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).find_entity("alice").await.unwrap_err();
        match err {
            Error::UpstreamStatus { status, url } => {
                assert_eq!(status, 503);
                assert!(!url.contains("sk-key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let http = HttpConfig {
            timeout: Duration::from_millis(50),
            ..HttpConfig::default()
        };
        let client = SongkickClient::new(ServiceConfig::new(server.uri(), "sk-key"), &http).unwrap();

        let err = client.find_entity("alice").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(!err.to_string().contains("sk-key"));

        let entity = MatchedEntity::new(42, "Bob")
            .with_identifier(format!("{}/artists/42/calendar.json", server.uri()));
        let err = client.fetch_events(&entity).await.unwrap_err();
        assert!(!err.to_string().contains("sk-key"));
    }

    #[tokio::test]
    async fn test_find_entity_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).find_entity("alice").await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_fetch_events_uses_identifier_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/artists/42/calendar.json"))
            .and(query_param("apikey", "sk-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resultsPage": {
                    "status": "ok",
                    "totalEntries": 2,
                    "results": {
                        "event": [
                            {
                                "id": 10,
                                "displayName": "Gig",
                                "start": {"date": "2026-11-02"},
                                "location": {"city": "Berlin"},
                                "venue": {"displayName": "Berghain"}
                            },
                            {"id": 11, "displayName": "Later Gig"}
                        ]
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let entity = MatchedEntity::new(42, "Bob")
            .with_identifier(format!("{}/artists/42/calendar.json", server.uri()));
        let event = client_for(&server)
            .fetch_events(&entity)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            event,
            EventRecord::new("Gig", "Berlin")
                .with_date("2026-11-02")
                .with_venue("Berghain")
        );
    }

    #[tokio::test]
    async fn test_fetch_events_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/artists/7/calendar.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resultsPage": {"status": "ok", "totalEntries": 0, "results": {}}
            })))
            .mount(&server)
            .await;

        let entity = MatchedEntity::new(7, "Quiet")
            .with_identifier(format!("{}/artists/7/calendar.json", server.uri()));
        assert!(client_for(&server)
            .fetch_events(&entity)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_events_without_identifier() {
        let server = MockServer::start().await;
        let entity = MatchedEntity::new(3, "No Handle");

        let err = client_for(&server).fetch_events(&entity).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
