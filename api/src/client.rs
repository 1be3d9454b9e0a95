use crate::wire::{Envelope, error_message};
use crate::{
    BallEvent, InningsSummary, Match, NewMatch, NewSeries, OverSummary, Player, ScorecardResponse,
    ScoringStarted, Series, Team,
};
use chrono::Utc;
use log::{debug, warn};
use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, PRAGMA};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
const USER_AGENT: &str = concat!("cricket-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub enum ApiError {
    /// Non-2xx response. `details` is the raw error body, `{}` when it was not JSON.
    Api { status: u16, message: String, details: Value },
    /// Transport failure before any response arrived, after retries ran out.
    Network { url: String, message: String },
    Parsing { url: String, message: String },
    Other(String),
}

impl ApiError {
    /// HTTP status, 0 when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Api { status, .. } => *status,
            _ => 0,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Api { message, .. }
            | ApiError::Network { message, .. }
            | ApiError::Parsing { message, .. } => message,
            ApiError::Other(message) => message,
        }
    }

    /// Server and transport errors carry a message fit for display.
    /// Parsing and internal errors do not.
    pub fn is_typed(&self) -> bool {
        matches!(self, ApiError::Api { .. } | ApiError::Network { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Api { status, message, .. } => write!(f, "API error ({status}): {message}"),
            ApiError::Network { url, message } => write!(f, "Network error for {url}: {message}"),
            ApiError::Parsing { url, message } => write!(f, "Parse error for {url}: {message}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Bounded linear backoff: retry `k` waits `base_delay * k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3, base_delay: Duration::from_millis(1000) }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Whether the session cookie goes along with a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Omit,
    Include,
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Merged over the default headers; same-named entries win.
    pub headers: HeaderMap,
    pub credentials: Credentials,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
            credentials: Credentials::Omit,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn method(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    pub fn with_body(method: Method, body: Value) -> Self {
        Self { method, body: Some(body), ..Self::default() }
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Write acknowledgement: the envelope message plus whatever `data` the server sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ack {
    pub message: Option<String>,
    pub data: Value,
}

/// Strictly increasing millisecond stamp for the `_t` cache-busting parameter.
#[derive(Debug, Default)]
struct CacheBuster(AtomicI64);

impl CacheBuster {
    fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| Some(now.max(prev + 1)))
            .unwrap_or(now);
        now.max(prev + 1)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store, must-revalidate"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}

fn build_client(jar: Option<Arc<Jar>>) -> Client {
    let builder = Client::builder().user_agent(USER_AGENT);
    let builder = match jar {
        Some(jar) => builder.cookie_provider(jar),
        None => builder,
    };
    builder.build().unwrap_or_default()
}

/// REST client for the scoring backend (`/api/v1`).
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    plain: Client,
    credentialed: Client,
    jar: Arc<Jar>,
    retry: RetryPolicy,
    timeout: Duration,
    cache_buster: Arc<CacheBuster>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_jar(base_url, Arc::new(Jar::default()))
    }

    /// Build a client whose credentialed requests use `jar`. Share the jar with
    /// [`crate::auth::AuthClient`] and [`crate::graphql::GraphqlClient`] so they
    /// all ride the same session.
    pub fn with_jar(base_url: impl Into<String>, jar: Arc<Jar>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            plain: build_client(None),
            credentialed: build_client(Some(jar.clone())),
            jar,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(10),
            cache_buster: Arc::new(CacheBuster::default()),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn cookie_jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        format!("{}{endpoint}{sep}_t={}", self.base_url, self.cache_buster.next())
    }

    /// Execute one logical request.
    ///
    /// 503 responses and transport failures are retried up to
    /// `retry.max_retries` times with linear backoff. Any other non-2xx
    /// response fails immediately with [`ApiError::Api`]. An empty 2xx body
    /// decodes as JSON `null`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let client = match options.credentials {
            Credentials::Include => &self.credentialed,
            Credentials::Omit => &self.plain,
        };
        let mut headers = default_headers();
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut attempt = 0;
        loop {
            let url = self.url(endpoint);
            debug!("{} {url} (attempt {})", options.method, attempt + 1);

            let mut request = client
                .request(options.method.clone(), &url)
                .headers(headers.clone())
                .timeout(self.timeout);
            if let Some(body) = &options.body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    if attempt < self.retry.max_retries {
                        attempt += 1;
                        warn!("network failure for {url}, retry {attempt}/{}: {e}", self.retry.max_retries);
                        tokio::time::sleep(self.retry.delay_for(attempt)).await;
                        continue;
                    }
                    return Err(ApiError::Network {
                        url,
                        message: format!("Unable to reach the server: {e}"),
                    });
                }
            };

            let status = response.status();
            if status.is_success() {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Parsing { url: url.clone(), message: e.to_string() })?;
                let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
                return serde_json::from_slice(body)
                    .map_err(|e| ApiError::Parsing { url, message: e.to_string() });
            }

            if status == StatusCode::SERVICE_UNAVAILABLE && attempt < self.retry.max_retries {
                attempt += 1;
                warn!("service unavailable for {url}, retry {attempt}/{}", self.retry.max_retries);
                tokio::time::sleep(self.retry.delay_for(attempt)).await;
                continue;
            }

            let details = response
                .json::<Value>()
                .await
                .unwrap_or_else(|_| Value::Object(Default::default()));
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&details, status.as_u16()),
                details,
            });
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> ApiResult<T> {
        let envelope: Envelope<T> = self.request(endpoint, options).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::Other(format!("{endpoint}: response carried no data")))
    }

    async fn ack(&self, endpoint: &str, options: RequestOptions) -> ApiResult<Ack> {
        let raw: Value = self.request(endpoint, options).await?;
        Ok(Ack {
            message: raw.get("message").and_then(Value::as_str).map(str::to_owned),
            data: raw.get("data").cloned().unwrap_or(Value::Null),
        })
    }

    fn write(method: Method, body: Value) -> RequestOptions {
        RequestOptions::with_body(method, body).credentials(Credentials::Include)
    }

    fn to_body<T: serde::Serialize>(payload: &T) -> ApiResult<Value> {
        serde_json::to_value(payload).map_err(|e| ApiError::Other(format!("could not encode payload: {e}")))
    }

    // -----------------------------------------------------------------------
    // Series
    // -----------------------------------------------------------------------

    pub async fn fetch_series(&self) -> ApiResult<Vec<Series>> {
        self.fetch("/series", RequestOptions::get()).await
    }

    pub async fn fetch_series_by_id(&self, id: &str) -> ApiResult<Series> {
        self.fetch(&format!("/series/{id}"), RequestOptions::get()).await
    }

    pub async fn create_series(&self, series: &NewSeries) -> ApiResult<Series> {
        self.fetch("/series", Self::write(Method::POST, Self::to_body(series)?)).await
    }

    pub async fn update_series(&self, id: &str, series: &NewSeries) -> ApiResult<Series> {
        self.fetch(&format!("/series/{id}"), Self::write(Method::PUT, Self::to_body(series)?))
            .await
    }

    pub async fn delete_series(&self, id: &str) -> ApiResult<Ack> {
        let options = RequestOptions::method(Method::DELETE).credentials(Credentials::Include);
        self.ack(&format!("/series/{id}"), options).await
    }

    // -----------------------------------------------------------------------
    // Matches
    // -----------------------------------------------------------------------

    pub async fn fetch_matches(&self) -> ApiResult<Vec<Match>> {
        self.fetch("/matches", RequestOptions::get()).await
    }

    pub async fn fetch_match(&self, id: &str) -> ApiResult<Match> {
        self.fetch(&format!("/matches/{id}"), RequestOptions::get()).await
    }

    pub async fn fetch_matches_by_series(&self, series_id: &str) -> ApiResult<Vec<Match>> {
        self.fetch(&format!("/matches/series/{series_id}"), RequestOptions::get())
            .await
    }

    /// Create a match. `match_number == Some(1)` means "auto-assign" and is
    /// left out of the payload.
    pub async fn create_match(&self, new_match: &NewMatch) -> ApiResult<Match> {
        let mut payload = new_match.clone();
        if payload.match_number == Some(1) {
            payload.match_number = None;
        }
        self.fetch("/matches", Self::write(Method::POST, Self::to_body(&payload)?))
            .await
    }

    pub async fn update_match(&self, id: &str, new_match: &NewMatch) -> ApiResult<Match> {
        self.fetch(&format!("/matches/{id}"), Self::write(Method::PUT, Self::to_body(new_match)?))
            .await
    }

    pub async fn delete_match(&self, id: &str) -> ApiResult<Ack> {
        let options = RequestOptions::method(Method::DELETE).credentials(Credentials::Include);
        self.ack(&format!("/matches/{id}"), options).await
    }

    // -----------------------------------------------------------------------
    // Scorecard
    // -----------------------------------------------------------------------

    pub async fn fetch_scorecard(&self, match_id: &str) -> ApiResult<ScorecardResponse> {
        let options = RequestOptions::get().credentials(Credentials::Include);
        self.fetch(&format!("/scorecard/{match_id}"), options).await
    }

    /// Start scoring a match. Idempotent: a server error saying scoring has
    /// already started is reported as success with `already_started` set.
    pub async fn start_scoring(&self, match_id: &str) -> ApiResult<ScoringStarted> {
        let options = Self::write(Method::POST, json!({ "match_id": match_id }));
        match self.request::<Envelope<ScoringStarted>>("/scorecard/start", options).await {
            Ok(envelope) => {
                let mut started = envelope.data.unwrap_or_default();
                if started.match_id.is_empty() {
                    started.match_id = match_id.to_owned();
                }
                if started.message.is_none() {
                    started.message = envelope.message;
                }
                Ok(started)
            }
            Err(e) if is_already_started(&e) => {
                debug!("scoring already started for match {match_id}");
                Ok(ScoringStarted {
                    match_id: match_id.to_owned(),
                    message: Some(e.message().to_owned()),
                    already_started: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn add_ball(&self, ball: &BallEvent) -> ApiResult<Ack> {
        self.ack("/scorecard/ball", Self::write(Method::POST, Self::to_body(ball)?))
            .await
    }

    /// Remove the most recent ball of an innings.
    pub async fn undo_last_ball(&self, match_id: &str, innings_number: u8) -> ApiResult<Ack> {
        let body = json!({ "match_id": match_id, "innings_number": innings_number });
        self.ack("/scorecard/undo", Self::write(Method::POST, body)).await
    }

    pub async fn fetch_current_over(&self, match_id: &str, innings_number: u8) -> ApiResult<OverSummary> {
        let options = RequestOptions::get().credentials(Credentials::Include);
        self.fetch(&format!("/scorecard/{match_id}/current-over?innings={innings_number}"), options)
            .await
    }

    pub async fn fetch_innings(&self, match_id: &str, innings_number: u8) -> ApiResult<InningsSummary> {
        let options = RequestOptions::get().credentials(Credentials::Include);
        self.fetch(&format!("/scorecard/{match_id}/innings/{innings_number}"), options)
            .await
    }

    pub async fn fetch_over(
        &self,
        match_id: &str,
        innings_number: u8,
        over_number: u32,
    ) -> ApiResult<OverSummary> {
        let options = RequestOptions::get().credentials(Credentials::Include);
        self.fetch(
            &format!("/scorecard/{match_id}/innings/{innings_number}/over/{over_number}"),
            options,
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Teams / players
    // -----------------------------------------------------------------------

    pub async fn fetch_teams(&self, match_id: &str) -> ApiResult<Vec<Team>> {
        self.fetch(&format!("/teams/match/{match_id}"), RequestOptions::get())
            .await
    }

    pub async fn fetch_players(&self, team_id: &str) -> ApiResult<Vec<Player>> {
        self.fetch(&format!("/players/team/{team_id}"), RequestOptions::get())
            .await
    }
}

fn is_already_started(err: &ApiError) -> bool {
    matches!(err, ApiError::Api { .. }) && err.message().to_lowercase().contains("already started")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TeamSide, TossType};
    use chrono::NaiveDate;
    use mockito::{Matcher, Server};
    use std::sync::atomic::AtomicUsize;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy { max_retries: 3, base_delay: Duration::from_millis(1) }
    }

    fn client_for(server: &Server) -> ApiClient {
        ApiClient::new(format!("{}/api/v1", server.url())).with_retry(fast_retry())
    }

    fn cache_busted() -> Matcher {
        Matcher::Regex(r"_t=\d+".into())
    }

    fn new_match(match_number: Option<u32>) -> NewMatch {
        NewMatch {
            series_id: "s1".into(),
            match_number,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            status: None,
            team_a: "Lions".into(),
            team_b: "Tigers".into(),
            team_a_player_count: 11,
            team_b_player_count: 11,
            total_overs: 20,
            toss_winner: TeamSide::A,
            toss_type: TossType::Heads,
            batting_team: TeamSide::B,
        }
    }

    #[test]
    fn cache_buster_is_strictly_increasing() {
        let buster = CacheBuster::default();
        let mut last = buster.next();
        for _ in 0..1000 {
            let next = buster.next();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn retry_delay_grows_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(3000));
    }

    #[test]
    fn only_server_and_transport_errors_are_typed() {
        let api = ApiError::Api { status: 400, message: "bad".into(), details: json!({}) };
        let net = ApiError::Network { url: "u".into(), message: "down".into() };
        assert!(api.is_typed());
        assert!(net.is_typed());
        assert_eq!(net.status(), 0);
        assert!(!ApiError::Other("x".into()).is_typed());
    }

    #[tokio::test]
    async fn fetch_series_unwraps_envelope_and_busts_cache() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/series")
            .match_query(cache_busted())
            .match_header("cache-control", "no-cache, no-store, must-revalidate")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success": true, "data": [
                    {"id": "s1", "name": "Ashes", "start_date": "2024-01-01", "end_date": "2024-01-31"}
                ]}"#,
            )
            .create_async()
            .await;

        let series = client_for(&server).fetch_series().await.unwrap();
        mock.assert_async().await;
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "Ashes");
        assert_eq!(series[0].status, crate::SeriesStatus::Upcoming);
    }

    #[tokio::test]
    async fn create_series_returns_server_assigned_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/series")
            .match_query(cache_busted())
            .match_body(Matcher::Json(json!({
                "name": "Ashes", "start_date": "2024-01-01", "end_date": "2024-01-31"
            })))
            .with_status(201)
            .with_body(
                r#"{"success": true, "data":
                    {"id": "srv-42", "name": "Ashes", "start_date": "2024-01-01",
                     "end_date": "2024-01-31", "created_by": "u1"}}"#,
            )
            .create_async()
            .await;

        let created = client_for(&server)
            .create_series(&NewSeries {
                name: "Ashes".into(),
                description: None,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                status: None,
            })
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(created.id, "srv-42");
        assert!(created.is_owned_by("u1"));
    }

    #[tokio::test]
    async fn service_unavailable_is_attempted_four_times() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/matches")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(r#"{"message": "maintenance"}"#)
            .expect(4)
            .create_async()
            .await;

        let err = client_for(&server).fetch_matches().await.unwrap_err();
        mock.assert_async().await;
        assert_eq!(err.status(), 503);
        assert_eq!(err.message(), "maintenance");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/series/missing")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"success": false, "message": "Series not found"}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client_for(&server).fetch_series_by_id("missing").await.unwrap_err();
        mock.assert_async().await;
        match err {
            ApiError::Api { status, message, details } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Series not found");
                assert_eq!(details["success"], json!(false));
            }
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[tokio::test]
    async fn unparsable_error_body_falls_back_to_empty_details() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/api/v1/matches/m1")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = client_for(&server).delete_match("m1").await.unwrap_err();
        match err {
            ApiError::Api { status, message, details } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Request failed with status 500");
                assert_eq!(details, json!({}));
            }
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_surfaces_network_error() {
        let client = ApiClient::new("http://127.0.0.1:1/api/v1").with_retry(fast_retry());
        let err = client.fetch_series().await.unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }), "got {err}");
        assert_eq!(err.status(), 0);
    }

    #[tokio::test]
    async fn dropped_connections_are_attempted_four_times() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        let acceptor = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        let client = ApiClient::new(format!("http://{addr}/api/v1")).with_retry(fast_retry());
        let err = client.fetch_series().await.unwrap_err();
        acceptor.abort();

        assert!(matches!(err, ApiError::Network { .. }), "got {err}");
        assert_eq!(err.status(), 0);
        assert_eq!(accepted.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn match_number_one_is_stripped_from_payload() {
        let mut server = Server::new_async().await;
        let expected = json!({
            "series_id": "s1", "date": "2024-01-05", "team_a": "Lions", "team_b": "Tigers",
            "team_a_player_count": 11, "team_b_player_count": 11, "total_overs": 20,
            "toss_winner": "A", "toss_type": "heads", "batting_team": "B"
        });
        let mock = server
            .mock("POST", "/api/v1/matches")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(expected))
            .with_status(201)
            .with_body(
                r#"{"success": true, "data": {"id": "m9", "series_id": "s1", "match_number": 4,
                    "date": "2024-01-05", "status": "live", "team_a_player_count": 11,
                    "team_b_player_count": 11, "total_overs": 20, "toss_winner": "A",
                    "toss_type": "heads", "batting_team": "B"}}"#,
            )
            .create_async()
            .await;

        let created = client_for(&server).create_match(&new_match(Some(1))).await.unwrap();
        mock.assert_async().await;
        assert_eq!(created.match_number, 4);
    }

    #[tokio::test]
    async fn explicit_match_number_is_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/matches")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({ "match_number": 3 })))
            .with_status(201)
            .with_body(
                r#"{"success": true, "data": {"id": "m3", "series_id": "s1", "match_number": 3,
                    "date": "2024-01-05", "team_a_player_count": 11, "team_b_player_count": 11,
                    "total_overs": 20, "toss_winner": "A", "toss_type": "heads", "batting_team": "B"}}"#,
            )
            .create_async()
            .await;

        client_for(&server).create_match(&new_match(Some(3))).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn start_scoring_treats_already_started_as_success() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v1/scorecard/start")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({ "match_id": "m1" })))
            .with_status(400)
            .with_body(r#"{"success": false, "message": "Scoring already started for this match"}"#)
            .create_async()
            .await;

        let started = client_for(&server).start_scoring("m1").await.unwrap();
        assert!(started.already_started);
        assert_eq!(started.match_id, "m1");
    }

    #[tokio::test]
    async fn start_scoring_propagates_other_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v1/scorecard/start")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"message": "Only the series owner can start scoring"}"#)
            .create_async()
            .await;

        let err = client_for(&server).start_scoring("m1").await.unwrap_err();
        assert_eq!(err.status(), 403);
    }

    #[tokio::test]
    async fn current_over_keeps_innings_query_alongside_cache_buster() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/scorecard/m1/current-over")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("innings".into(), "2".into()),
                cache_busted(),
            ]))
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"over_number": 5, "balls": []}}"#)
            .create_async()
            .await;

        let over = client_for(&server).fetch_current_over("m1", 2).await.unwrap();
        mock.assert_async().await;
        assert_eq!(over.over_number, 5);
    }

    #[tokio::test]
    async fn caller_headers_override_defaults() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/series")
            .match_query(Matcher::Any)
            .match_header("cache-control", "max-age=0")
            .with_status(200)
            .with_body(r#"{"success": true, "data": []}"#)
            .create_async()
            .await;

        let options = RequestOptions::get().header(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        let raw: Envelope<Vec<Series>> = client_for(&server).request("/series", options).await.unwrap();
        mock.assert_async().await;
        assert!(raw.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_delete_body_is_acknowledged() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/api/v1/series/s1")
            .match_query(Matcher::Any)
            .with_status(204)
            .create_async()
            .await;

        let ack = client_for(&server).delete_series("s1").await.unwrap();
        assert_eq!(ack, Ack::default());
    }
}
