//! Data-retrieval endpoints: matches, teams, players, analysis, AI assistant.
//!
//! Payloads are passed through as raw JSON. Nothing in this crate interprets
//! them; the host decides how to render match or analysis data.

#[cfg(test)]
#[path = "data_test.rs"]
mod data_test;

use serde_json::Value;

use super::ApiClient;
use crate::error::AuthError;

pub(crate) fn match_endpoint(match_id: i64) -> String {
    format!("/matches/{match_id}")
}

pub(crate) fn match_analysis_endpoint(match_id: i64) -> String {
    format!("/analysis/match/{match_id}")
}

pub(crate) fn team_performance_endpoint(team_id: i64) -> String {
    format!("/analysis/team/{team_id}/performance")
}

pub(crate) fn player_stats_endpoint(player_id: i64) -> String {
    format!("/analysis/player/{player_id}/stats")
}

/// AI assistant operations, each a `POST /ai/<path>` with a JSON context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTask {
    Recommendations,
    MatchPrediction,
    OpponentAnalysis,
    TrainingSuggestions,
}

impl AiTask {
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Recommendations => "/ai/recommendations",
            Self::MatchPrediction => "/ai/match-prediction",
            Self::OpponentAnalysis => "/ai/opponent-analysis",
            Self::TrainingSuggestions => "/ai/training-suggestions",
        }
    }
}

impl ApiClient {
    /// List matches.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn matches(&self) -> Result<Value, AuthError> {
        self.get("/matches").await
    }

    /// Create a match from `data`.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn create_match(&self, data: &Value) -> Result<Value, AuthError> {
        self.post("/matches", Some(data)).await
    }

    /// Fetch one match.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn match_by_id(&self, match_id: i64) -> Result<Value, AuthError> {
        self.get(&match_endpoint(match_id)).await
    }

    /// List teams.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn teams(&self) -> Result<Value, AuthError> {
        self.get("/teams").await
    }

    /// Create a team from `data`.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn create_team(&self, data: &Value) -> Result<Value, AuthError> {
        self.post("/teams", Some(data)).await
    }

    /// List players.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn players(&self) -> Result<Value, AuthError> {
        self.get("/players").await
    }

    /// Create a player from `data`.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn create_player(&self, data: &Value) -> Result<Value, AuthError> {
        self.post("/players", Some(data)).await
    }

    /// Analysis for one match.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn match_analysis(&self, match_id: i64) -> Result<Value, AuthError> {
        self.get(&match_analysis_endpoint(match_id)).await
    }

    /// Performance summary for one team.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn team_performance(&self, team_id: i64) -> Result<Value, AuthError> {
        self.get(&team_performance_endpoint(team_id)).await
    }

    /// Statistics for one player.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn player_stats(&self, player_id: i64) -> Result<Value, AuthError> {
        self.get(&player_stats_endpoint(player_id)).await
    }

    /// Run one of the AI assistant operations with `context` as its body.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the request fails or the server answers
    /// with a non-success status.
    pub async fn ai(&self, task: AiTask, context: &Value) -> Result<Value, AuthError> {
        self.post(task.endpoint(), Some(context)).await
    }
}
