use anyhow::{anyhow, Context, Result};
use reqwest::{Response, StatusCode, Url};
use std::fmt;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use crate::api::types::{
    LeaderboardRow, MatchRecord, MatchUpdate, NewMatch, NewPlayer, Player, PlayerStats,
    UpdatedMatch,
};
use crate::credentials::Credentials;

/// Marker error for a 401 response, so callers can tell "bad credentials"
/// apart from other failures and re-prompt.
#[derive(Debug)]
pub struct AuthError;

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Authentication failed. Check your username and password.")
    }
}

impl std::error::Error for AuthError {}

/// Client for the club's match-tracking API. Reads go out as-is; writes
/// attach HTTP Basic Auth from the credentials handed in at construction.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl ApiClient {
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid server URL: {}", base_url))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }

    /// Swap in a new session, e.g. after a re-login.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid endpoint path: {}", path))
    }

    /// Like `url`, but the final segment is a raw value that must be
    /// percent-encoded (player names can contain spaces).
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Server URL cannot be a base"))?
            .push(segment);
        Ok(url)
    }

    /// Turn a non-success response into a user-facing error. The server
    /// reports validation problems as `{"error": "..."}` bodies.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(anyhow::Error::new(AuthError)),
            StatusCode::FORBIDDEN => Err(anyhow!(
                "Forbidden. Your account is not allowed to perform this operation."
            )),
            StatusCode::NOT_FOUND => Err(anyhow!("Not found.")),
            _ => {
                let body = response.text().await.unwrap_or_default();
                let detail = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                    .unwrap_or(body);
                if detail.trim().is_empty() {
                    Err(anyhow!("Server error: HTTP {}", status))
                } else {
                    Err(anyhow!("Server error (HTTP {}): {}", status, detail.trim()))
                }
            }
        }
    }

    /// GET with retry. Reads are idempotent, so transient network failures
    /// get three attempts with exponential backoff. HTTP-level errors
    /// (auth, 4xx/5xx) are not retried.
    async fn get(&self, url: Url) -> Result<Response> {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(3);

        let response = Retry::spawn(retry_strategy, || async {
            self.http
                .get(url.clone())
                .send()
                .await
                .map_err(|e| anyhow!("Network error: {}", e))
        })
        .await?;

        Self::check(response).await
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(creds) => builder.basic_auth(&creds.username, Some(&creds.password)),
            None => builder,
        }
    }

    // -- Health --

    pub async fn health(&self) -> Result<String> {
        let response = self.get(self.url("/api/health")?).await?;
        response
            .text()
            .await
            .context("Failed to read health response")
    }

    // -- Players --

    pub async fn players(&self) -> Result<Vec<Player>> {
        let response = self.get(self.url("/api/players")?).await?;
        response
            .json()
            .await
            .context("Failed to parse player list")
    }

    pub async fn add_player(&self, player: &NewPlayer) -> Result<Player> {
        let request = self.with_auth(self.http.post(self.url("/api/players")?).json(player));
        let response = request.send().await.map_err(|e| anyhow!("Network error: {}", e))?;
        Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse created player")
    }

    pub async fn delete_player(&self, name: &str) -> Result<()> {
        let url = self.url_with_segment("/api/players", name)?;
        let request = self.with_auth(self.http.delete(url));
        let response = request.send().await.map_err(|e| anyhow!("Network error: {}", e))?;
        Self::check(response).await?;
        Ok(())
    }

    // -- Matches --

    pub async fn matches(&self) -> Result<Vec<MatchRecord>> {
        let response = self.get(self.url("/api/matches")?).await?;
        response
            .json()
            .await
            .context("Failed to parse match list")
    }

    pub async fn add_match(&self, new_match: &NewMatch) -> Result<MatchRecord> {
        let request = self.with_auth(self.http.post(self.url("/api/matches")?).json(new_match));
        let response = request.send().await.map_err(|e| anyhow!("Network error: {}", e))?;
        Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse created match")
    }

    pub async fn update_match(&self, id: u64, update: &MatchUpdate) -> Result<UpdatedMatch> {
        let url = self.url(&format!("/api/matches/{}", id))?;
        let request = self.with_auth(self.http.put(url).json(update));
        let response = request.send().await.map_err(|e| anyhow!("Network error: {}", e))?;
        Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse updated match")
    }

    pub async fn delete_match(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("/api/matches/{}", id))?;
        let request = self.with_auth(self.http.delete(url));
        let response = request.send().await.map_err(|e| anyhow!("Network error: {}", e))?;
        Self::check(response).await?;
        Ok(())
    }

    // -- Stats --

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardRow>> {
        let response = self.get(self.url("/api/stats/leaderboard")?).await?;
        response
            .json()
            .await
            .context("Failed to parse leaderboard")
    }

    pub async fn player_stats(
        &self,
        name: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<PlayerStats> {
        let mut url = self.url("/api/stats/player")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("name", name);
            if let Some(from) = from {
                pairs.append_pair("from", from);
            }
            if let Some(to) = to {
                pairs.append_pair("to", to);
            }
        }
        let response = self.get(url).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse stats for '{}'", name))
    }

    /// The server renders the leaderboard CSV itself; pass it through.
    pub async fn export_leaderboard_csv(&self) -> Result<String> {
        let response = self.get(self.url("/api/stats/export")?).await?;
        response
            .text()
            .await
            .context("Failed to read leaderboard export")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(ApiClient::new("not a url", None).is_err());
    }

    #[test]
    fn test_tracks_session() {
        let mut client = ApiClient::new("http://localhost:8081", None).unwrap();
        assert!(!client.has_credentials());
        assert_eq!(client.username(), None);

        client.set_credentials(Credentials::new("admin", "pw"));
        assert!(client.has_credentials());
        assert_eq!(client.username(), Some("admin"));
    }

    #[test]
    fn test_player_delete_url_is_percent_encoded() {
        let client = ApiClient::new("http://localhost:8081", None).unwrap();
        let url = client
            .url_with_segment("/api/players", "Roger Federer")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8081/api/players/Roger%20Federer"
        );
    }

    #[test]
    fn test_auth_error_message() {
        assert!(AuthError.to_string().contains("Authentication failed"));
    }
}
