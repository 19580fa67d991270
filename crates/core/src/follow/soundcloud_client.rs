//! SoundCloud HTTP API Client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::client::FollowGraphClient;
use super::model::Identity;
use crate::config::{HttpConfig, ServiceConfig};
use crate::error::Error;
use crate::http;
use crate::Result;

#[derive(Debug, Deserialize)]
struct UsersCollection {
    #[serde(default)]
    collection: Vec<Identity>,
}

/// Client for the SoundCloud resolve and followings endpoints
pub struct SoundcloudClient {
    client: Client,
    config: ServiceConfig,
}

impl SoundcloudClient {
    pub fn new(config: ServiceConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(http)?,
            config,
        })
    }

    fn resolve_url(&self, name: &str) -> String {
        let profile = format!("http://soundcloud.com/{}", name);
        format!(
            "{}/resolve?url={}&client_id={}",
            self.config.base_url,
            urlencoding::encode(&profile),
            urlencoding::encode(&self.config.api_key)
        )
    }

    fn followings_url(&self, user_id: i64) -> String {
        format!(
            "{}/users/{}/followings?client_id={}",
            self.config.base_url,
            user_id,
            urlencoding::encode(&self.config.api_key)
        )
    }
}

#[async_trait]
impl FollowGraphClient for SoundcloudClient {
    async fn resolve_user(&self, name: &str) -> Result<Identity> {
        let url = self.resolve_url(name);
        let resp = http::get(&self.client, &url).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound(name.to_string()));
        }

        let user: Identity = http::read_json(resp, &url).await?;
        debug!("Resolved '{}' to user {}", name, user.id);
        Ok(user)
    }

    async fn list_followings(&self, user_id: i64) -> Result<Vec<Identity>> {
        let url = self.followings_url(user_id);
        let followings: UsersCollection = http::get_json(&self.client, &url).await?;
        debug!("User {} follows {} accounts", user_id, followings.collection.len());
        Ok(followings.collection)
    }
}
