//! Player accounts, profiles, session tickets and bans.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPlayerProfileRequest {
    pub player_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_constraints: Option<PlayerProfileViewConstraints>,
}

/// Which optional profile sections the backend should populate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerProfileViewConstraints {
    pub show_avatar_url: bool,
    pub show_banned_until: bool,
    pub show_created: bool,
    pub show_display_name: bool,
    pub show_last_login: bool,
    pub show_statistics: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetPlayerProfileResult {
    pub player_profile: Option<PlayerProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PlayerProfile {
    pub player_id: String,
    pub title_id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created: Option<String>,
    pub last_login: Option<String>,
    pub banned_until: Option<String>,
    pub statistics: Vec<ProfileStatistic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ProfileStatistic {
    pub name: String,
    pub value: i32,
    pub version: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetUserAccountInfoRequest {
    pub player_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetUserAccountInfoResult {
    pub user_info: Option<UserAccountInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UserAccountInfo {
    pub player_id: String,
    pub username: Option<String>,
    pub created: Option<String>,
    pub title_info: Option<UserTitleInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UserTitleInfo {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created: Option<String>,
    pub last_login: Option<String>,
    pub is_banned: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticateSessionTicketRequest {
    pub session_ticket: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AuthenticateSessionTicketResult {
    pub is_session_ticket_expired: Option<bool>,
    pub user_info: Option<UserAccountInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BanUsersRequest {
    pub bans: Vec<BanRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BanRequest {
    pub player_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_hours: Option<u32>,
    #[serde(rename = "IPAddress", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

/// Bans returned by `BanUsers`, `GetUserBans` and `RevokeAllBansForUser`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BanListResult {
    pub ban_data: Vec<BanInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BanInfo {
    pub ban_id: String,
    pub player_id: String,
    pub active: bool,
    pub reason: Option<String>,
    pub created: Option<String>,
    pub expires: Option<String>,
    #[serde(rename = "IPAddress")]
    pub ip_address: Option<String>,
}

/// Request shape shared by operations that only name a player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerRequest {
    pub player_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateAvatarUrlRequest {
    pub player_id: String,
    pub image_url: String,
}
