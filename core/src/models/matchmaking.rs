//! Matchmaker tickets and game server instance registration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::account::UserAccountInfo;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RedeemMatchmakerTicketRequest {
    pub ticket: String,
    pub lobby_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RedeemMatchmakerTicketResult {
    pub ticket_is_valid: bool,
    pub error: Option<String>,
    pub user_info: Option<UserAccountInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotifyMatchmakerPlayerLeftRequest {
    pub lobby_id: String,
    pub player_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerConnectionState {
    Unassigned,
    Connecting,
    Participating,
    Participated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NotifyMatchmakerPlayerLeftResult {
    pub player_state: Option<PlayerConnectionState>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[default]
    USCentral,
    USEast,
    EUWest,
    Singapore,
    Japan,
    Brazil,
    Australia,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterGameRequest {
    pub build: String,
    pub game_mode: String,
    pub region: Region,
    #[serde(rename = "ServerIPV4Address", skip_serializing_if = "Option::is_none")]
    pub server_ipv4_address: Option<String>,
    pub server_port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    /// Re-register an existing lobby instead of allocating a new one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lobby_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RegisterGameResult {
    pub lobby_id: String,
}

/// Request for operations keyed only by lobby: deregister and heartbeat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LobbyRequest {
    pub lobby_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameInstanceState {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetGameServerInstanceStateRequest {
    pub lobby_id: String,
    pub state: GameInstanceState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetGameServerInstanceDataRequest {
    pub lobby_id: String,
    pub game_server_data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetGameServerInstanceTagsRequest {
    pub lobby_id: String,
    pub tags: HashMap<String, String>,
}
