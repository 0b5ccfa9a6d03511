// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locus backend REST client.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, Url};
use serde_json::Value;

use locus_geometry::MIN_POLYGON_POINTS;
use locus_tracking::{PositionReading, PositionSource};
use locus_zones::{NewZone, Zone, ZoneStore};

use crate::config::ClientConfig;
use crate::dto::{parse_latest, CreateLabel, RoomLabel};
use crate::error::{Error, Result};

/// Backend client for zone labels and the latest tracker position.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct LocusClient {
    base_url: String,
    http: reqwest::Client,
}

impl LocusClient {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| Error::Url {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| Error::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        tracing::debug!(base_url = %base_url, authenticated = config.token.is_some(), "Created Locus client");
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List the zones of a home in stored order.
    pub async fn get_zones(&self, home_id: &str) -> Result<Vec<Zone>> {
        let resp = self.http.get(self.url(&format!("/homes/{}/labels", home_id))).send().await?;
        let labels: Vec<RoomLabel> = checked(resp).await?.json().await?;
        tracing::debug!(home_id = %home_id, count = labels.len(), "Fetched zones");
        Ok(labels.into_iter().map(Zone::from).collect())
    }

    /// Create a zone and return it as stored (with its id).
    pub async fn create_zone(&self, home_id: &str, zone: &NewZone) -> Result<Zone> {
        if zone.points.len() < MIN_POLYGON_POINTS {
            return Err(locus_zones::Error::DegenerateZone(zone.points.len()).into());
        }
        if zone.name.trim().is_empty() {
            return Err(locus_zones::Error::EmptyZoneName.into());
        }

        let resp = self
            .http
            .post(self.url(&format!("/homes/{}/labels", home_id)))
            .json(&CreateLabel::from(zone))
            .send()
            .await?;
        let created: RoomLabel = checked(resp).await?.json().await?;
        tracing::info!(home_id = %home_id, zone_id = %created.id, name = %created.name, "Created zone");
        Ok(created.into())
    }

    pub async fn delete_zone(&self, zone_id: &str) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/homes/labels/{}", zone_id)))
            .send()
            .await?;
        checked(resp).await?;
        tracing::info!(zone_id = %zone_id, "Deleted zone");
        Ok(())
    }

    /// Latest tracker position, `None` when the backend has nothing usable.
    pub async fn latest_position(&self) -> Result<Option<PositionReading>> {
        let resp = self.http.get(self.url("/log/latest")).send().await?;
        let text = checked(resp).await?.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let body: Value = serde_json::from_str(&text)?;
        Ok(parse_latest(&body))
    }
}

/// Turn a non-success status into [`Error::Status`], keeping the body.
async fn checked(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        body,
    })
}

impl PositionSource for LocusClient {
    type Error = Error;

    async fn latest(&self) -> Result<Option<PositionReading>> {
        self.latest_position().await
    }
}

impl ZoneStore for LocusClient {
    type Error = Error;

    async fn list(&self, home_id: &str) -> Result<Vec<Zone>> {
        self.get_zones(home_id).await
    }

    async fn create(&self, home_id: &str, zone: NewZone) -> Result<Zone> {
        self.create_zone(home_id, &zone).await
    }

    async fn delete(&self, zone_id: &str) -> Result<()> {
        self.delete_zone(zone_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_base_url() {
        let err = LocusClient::new(&ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn test_rejects_unprintable_token() {
        let config = ClientConfig::default().with_token("bad\ntoken");
        assert!(matches!(LocusClient::new(&config), Err(Error::InvalidToken)));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = LocusClient::new(&ClientConfig::new("http://localhost:4000/api/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000/api");
        assert_eq!(client.url("/log/latest"), "http://localhost:4000/api/log/latest");
    }

    #[tokio::test]
    async fn test_invalid_zone_not_sent() {
        let client = LocusClient::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let zone = NewZone {
            name: "Hall".into(),
            points: vec![],
        };
        let err = client.create_zone("home", &zone).await.unwrap_err();
        assert!(matches!(err, Error::Zones(locus_zones::Error::DegenerateZone(0))));
    }
}
