//! Player statistics and leaderboards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPlayerStatisticsRequest {
    pub player_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetPlayerStatisticsResult {
    pub player_id: String,
    pub statistics: Vec<StatisticValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StatisticValue {
    pub statistic_name: String,
    pub value: i32,
    pub version: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePlayerStatisticsRequest {
    pub player_id: String,
    pub statistics: Vec<StatisticUpdate>,
    /// Overwrite even when the statistic is configured as client-owned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_update: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatisticUpdate {
    pub statistic_name: String,
    pub value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPlayerStatisticVersionsRequest {
    pub statistic_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetPlayerStatisticVersionsResult {
    pub statistic_versions: Vec<PlayerStatisticVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PlayerStatisticVersion {
    pub statistic_name: String,
    pub version: u32,
    pub activation_time: String,
    pub deactivation_time: Option<String>,
    pub scheduled_activation_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetLeaderboardRequest {
    pub statistic_name: String,
    pub start_position: u32,
    pub max_results_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetLeaderboardAroundUserRequest {
    pub statistic_name: String,
    pub player_id: String,
    pub max_results_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Result of both leaderboard reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetLeaderboardResult {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub version: u32,
    pub next_reset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub display_name: Option<String>,
    pub position: u32,
    pub stat_value: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistic_update_omits_absent_version() {
        let update = StatisticUpdate {
            statistic_name: "kills".to_string(),
            value: 10,
            version: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"StatisticName": "kills", "Value": 10}));
    }

    #[test]
    fn leaderboard_result_decodes_entries() {
        let body = r#"{"Leaderboard":[{"PlayerId":"P1","Position":0,"StatValue":42}],"Version":3}"#;
        let result: GetLeaderboardResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.version, 3);
        assert_eq!(result.leaderboard[0].stat_value, 42);
        assert!(result.next_reset.is_none());
    }
}
