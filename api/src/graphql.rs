use crate::wire::{GraphqlRequest, GraphqlResponse};
use crate::{InningsScore, InningsSummary, OverSummary, ScorecardResponse};
use log::debug;
use reqwest::Client;
use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_GRAPHQL_URL: &str = "http://localhost:8000/graphql";

const INNINGS_SCORE_FIELDS: &str = "innings_number batting_team total_runs total_wickets \
     total_overs total_balls status extras { byes leg_byes wides no_balls total }";
const OVER_FIELDS: &str = "over_number total_runs total_balls total_wickets status \
     balls { ball_number ball_type run_type runs byes is_wicket wicket_type }";

/// Result of a read-only query. Query failures are values, never errors, so
/// a caller has to look at the outcome before it can reach the data.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    Success(T),
    Failure(String),
}

impl<T> QueryOutcome<T> {
    pub fn success(&self) -> bool {
        matches!(self, QueryOutcome::Success(_))
    }

    pub fn data(self) -> Option<T> {
        match self {
            QueryOutcome::Success(data) => Some(data),
            QueryOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryOutcome::Success(_) => None,
            QueryOutcome::Failure(e) => Some(e),
        }
    }
}

/// Latest over of an innings together with the innings it belongs to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LatestOver {
    pub innings_number: u8,
    #[serde(default)]
    pub batting_team: String,
    #[serde(default)]
    pub over: Option<OverSummary>,
}

/// Network-only GraphQL reader for incremental score data.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>, jar: Arc<Jar>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::builder()
                .cookie_provider(jar)
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Run `query` and decode `data.<field>` into `T`.
    async fn query<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
        field: &str,
    ) -> QueryOutcome<T> {
        debug!("graphql {operation} {variables}");
        let request = GraphqlRequest { query, variables, operation_name: Some(operation) };

        let response = match self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return QueryOutcome::Failure(format!("{operation}: {e}")),
        };

        let status = response.status();
        if !status.is_success() {
            return QueryOutcome::Failure(format!("{operation}: HTTP {}", status.as_u16()));
        }

        let body = match response.json::<GraphqlResponse>().await {
            Ok(body) => body,
            Err(e) => return QueryOutcome::Failure(format!("{operation}: {e}")),
        };

        if let Some(first) = body.errors.first() {
            return QueryOutcome::Failure(format!("{operation}: {}", first.message));
        }

        let Some(value) = body.data.and_then(|mut d| d.get_mut(field).map(Value::take)) else {
            return QueryOutcome::Failure(format!("{operation}: no data returned"));
        };
        if value.is_null() {
            return QueryOutcome::Failure(format!("{operation}: no data returned"));
        }

        match serde_json::from_value(value) {
            Ok(data) => QueryOutcome::Success(data),
            Err(e) => QueryOutcome::Failure(format!("{operation}: {e}")),
        }
    }

    fn innings_vars(match_id: &str, innings_number: u8) -> Value {
        json!({ "matchId": match_id, "inningsNumber": innings_number })
    }

    /// Score totals for one innings, no ball detail.
    pub async fn innings_score_summary(&self, match_id: &str, innings_number: u8) -> QueryOutcome<InningsScore> {
        let query = format!(
            "query InningsScoreSummary($matchId: ID!, $inningsNumber: Int!) {{ \
             inningsScoreSummary(matchId: $matchId, inningsNumber: $inningsNumber) {{ {INNINGS_SCORE_FIELDS} }} }}"
        );
        self.query("InningsScoreSummary", &query, Self::innings_vars(match_id, innings_number), "inningsScoreSummary")
            .await
    }

    /// Only the most recent over of an innings, with its balls.
    pub async fn latest_over_only(&self, match_id: &str, innings_number: u8) -> QueryOutcome<OverSummary> {
        let query = format!(
            "query LatestOverOnly($matchId: ID!, $inningsNumber: Int!) {{ \
             latestOverOnly(matchId: $matchId, inningsNumber: $inningsNumber) {{ {OVER_FIELDS} }} }}"
        );
        self.query("LatestOverOnly", &query, Self::innings_vars(match_id, innings_number), "latestOverOnly")
            .await
    }

    pub async fn all_overs_details(&self, match_id: &str, innings_number: u8) -> QueryOutcome<Vec<OverSummary>> {
        let query = format!(
            "query AllOversDetails($matchId: ID!, $inningsNumber: Int!) {{ \
             allOversDetails(matchId: $matchId, inningsNumber: $inningsNumber) {{ {OVER_FIELDS} }} }}"
        );
        self.query("AllOversDetails", &query, Self::innings_vars(match_id, innings_number), "allOversDetails")
            .await
    }

    pub async fn innings_score(&self, match_id: &str, innings_number: u8) -> QueryOutcome<InningsScore> {
        let query = format!(
            "query InningsScore($matchId: ID!, $inningsNumber: Int!) {{ \
             inningsScore(matchId: $matchId, inningsNumber: $inningsNumber) {{ {INNINGS_SCORE_FIELDS} }} }}"
        );
        self.query("InningsScore", &query, Self::innings_vars(match_id, innings_number), "inningsScore")
            .await
    }

    /// One innings with every over and ball.
    pub async fn innings_details(&self, match_id: &str, innings_number: u8) -> QueryOutcome<InningsSummary> {
        let query = format!(
            "query InningsDetails($matchId: ID!, $inningsNumber: Int!) {{ \
             inningsDetails(matchId: $matchId, inningsNumber: $inningsNumber) {{ \
             {INNINGS_SCORE_FIELDS} overs {{ {OVER_FIELDS} }} }} }}"
        );
        self.query("InningsDetails", &query, Self::innings_vars(match_id, innings_number), "inningsDetails")
            .await
    }

    pub async fn live_scorecard(&self, match_id: &str) -> QueryOutcome<ScorecardResponse> {
        let query = format!(
            "query LiveScorecard($matchId: ID!) {{ liveScorecard(matchId: $matchId) {{ \
             match_id series_id series_name match_number team_a team_b total_overs toss_winner \
             toss_type current_innings match_status \
             innings {{ {INNINGS_SCORE_FIELDS} overs {{ {OVER_FIELDS} }} }} }} }}"
        );
        self.query("LiveScorecard", &query, json!({ "matchId": match_id }), "liveScorecard")
            .await
    }

    pub async fn latest_over(&self, match_id: &str, innings_number: u8) -> QueryOutcome<LatestOver> {
        let query = format!(
            "query LatestOver($matchId: ID!, $inningsNumber: Int!) {{ \
             latestOver(matchId: $matchId, inningsNumber: $inningsNumber) {{ \
             innings_number batting_team over {{ {OVER_FIELDS} }} }} }}"
        );
        self.query("LatestOver", &query, Self::innings_vars(match_id, innings_number), "latestOver")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InningsStatus;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> GraphqlClient {
        GraphqlClient::new(format!("{}/graphql", server.url()), Arc::new(Jar::default()))
    }

    #[tokio::test]
    async fn innings_score_summary_decodes_data_field() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({
                "operationName": "InningsScoreSummary",
                "variables": { "matchId": "m1", "inningsNumber": 1 }
            })))
            .with_status(200)
            .with_body(
                r#"{"data": {"inningsScoreSummary": {
                    "innings_number": 1, "batting_team": "Lions", "total_runs": 57,
                    "total_wickets": 2, "total_overs": 6.3, "total_balls": 39,
                    "status": "in_progress",
                    "extras": {"byes": 1, "leg_byes": 0, "wides": 2, "no_balls": 0, "total": 3}
                }}}"#,
            )
            .create_async()
            .await;

        let outcome = client_for(&server).innings_score_summary("m1", 1).await;
        mock.assert_async().await;
        assert!(outcome.success());
        let score = outcome.data().unwrap();
        assert_eq!(score.total_runs, 57);
        assert_eq!(score.status, InningsStatus::InProgress);
        assert_eq!(score.extras.total, 3);
    }

    #[tokio::test]
    async fn graphql_errors_become_failures() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(r#"{"data": null, "errors": [{"message": "innings not found"}]}"#)
            .create_async()
            .await;

        let outcome = client_for(&server).latest_over_only("m1", 2).await;
        assert!(!outcome.success());
        assert!(outcome.error().unwrap().contains("innings not found"));
    }

    #[tokio::test]
    async fn http_failure_becomes_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(502)
            .create_async()
            .await;

        let outcome = client_for(&server).live_scorecard("m1").await;
        assert_eq!(outcome, QueryOutcome::Failure("LiveScorecard: HTTP 502".into()));
    }

    #[tokio::test]
    async fn null_field_is_a_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(r#"{"data": {"latestOver": null}}"#)
            .create_async()
            .await;

        let outcome = client_for(&server).latest_over("m1", 1).await;
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_failure_not_a_panic() {
        let client = GraphqlClient::new("http://127.0.0.1:1/graphql", Arc::new(Jar::default()));
        let outcome = client.all_overs_details("m1", 1).await;
        assert!(outcome.error().is_some());
    }
}
