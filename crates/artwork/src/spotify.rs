//! Album art lookup through the Spotify Web API.

use album_tidy_core::{AlbumTags, Error, Result, SpotifyCredentials};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::cover::CoverSource;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    albums: AlbumPage,
}

#[derive(Debug, Deserialize)]
struct AlbumPage {
    #[serde(default)]
    items: Vec<AlbumItem>,
}

#[derive(Debug, Deserialize)]
struct AlbumItem {
    #[serde(default)]
    images: Vec<ImageRef>,
}

/// Images are listed largest first
#[derive(Debug, Deserialize)]
struct ImageRef {
    url: String,
}

/// Search string for one album
pub fn search_query(tags: &AlbumTags) -> String {
    format!("album:{} artist:{}", tags.album, tags.artist)
}

/// URL of the first image of the first album in a search response body
fn first_image_url(body: &str) -> Result<Option<String>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| Error::Network(format!("Unexpected search response: {}", e)))?;

    Ok(response
        .albums
        .items
        .into_iter()
        .next()
        .and_then(|item| item.images.into_iter().next())
        .map(|image| image.url))
}

fn network(err: reqwest::Error) -> Error {
    Error::Network(err.to_string())
}

/// Client-credentials Spotify client.
///
/// The access token is requested on first use and kept for the rest of the run.
pub struct SpotifyClient {
    http: Client,
    credentials: SpotifyCredentials,
    token: Option<String>,
}

impl SpotifyClient {
    pub fn new(credentials: SpotifyCredentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("album-tidy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(network)?;

        Ok(Self {
            http,
            credentials,
            token: None,
        })
    }

    fn token(&mut self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        debug!("requesting Spotify access token");
        let response: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(network)?
            .json()
            .map_err(network)?;

        self.token = Some(response.access_token.clone());
        Ok(response.access_token)
    }

    /// URL of the best-matching album image, if Spotify knows the album
    pub fn find_image(&mut self, tags: &AlbumTags) -> Result<Option<String>> {
        let token = self.token()?;
        let query = search_query(tags);
        debug!(%query, "searching Spotify");

        let body = self
            .http
            .get(SEARCH_URL)
            .bearer_auth(token)
            .query(&[("q", query.as_str()), ("type", "album"), ("limit", "1")])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(network)?
            .text()
            .map_err(network)?;

        first_image_url(&body)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(network)?
            .bytes()
            .map_err(network)?;
        Ok(bytes.to_vec())
    }
}

impl CoverSource for SpotifyClient {
    fn fetch(&mut self, tags: &AlbumTags) -> Result<Vec<u8>> {
        let url = self
            .find_image(tags)?
            .ok_or_else(|| Error::ArtworkLookupMiss {
                artist: tags.artist.clone(),
                album: tags.album.clone(),
            })?;
        debug!(%url, "downloading artwork");
        self.download(&url)
    }
}
