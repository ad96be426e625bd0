//! Typed surface over the server API.
//!
//! # Design
//! Every operation is a row in the `server_operations!` table below:
//! method name, path, request type, result type. The macro expands each row
//! into a blocking method and an `_async` twin, both thin calls into the
//! shared [`Invoker`]. Adding an endpoint means adding a row.

use std::sync::Arc;

use crate::error::{ApiResult, RemoteError};
use crate::invoker::Invoker;
use crate::models::*;
use crate::settings::Settings;
use crate::transport::{Transport, UreqTransport};

/// One row of the operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub path: &'static str,
}

/// Client for the server-to-service API, authenticated by the title's
/// secret key.
///
/// Clones share the same settings, transport and error handler.
#[derive(Debug, Clone)]
pub struct ServerClient {
    invoker: Invoker,
}

impl ServerClient {
    /// Client using the default blocking ureq transport.
    pub fn new(settings: Settings) -> Self {
        Self {
            invoker: Invoker::new(settings, Arc::new(UreqTransport::new())),
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.invoker = self.invoker.with_transport(transport);
        self
    }

    /// Install a handler notified of every error envelope the backend
    /// returns through this client. Replaces any previous handler.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RemoteError) + Send + Sync + 'static,
    {
        self.invoker = self.invoker.with_error_handler(Arc::new(handler));
        self
    }

    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    pub fn settings(&self) -> &Settings {
        self.invoker.settings()
    }
}

macro_rules! server_operations {
    ($(
        $(#[$meta:meta])*
        $method:ident => $path:literal, $req:ty => $resp:ty;
    )*) => {
        impl ServerClient {
            $(
                $(#[$meta])*
                pub fn $method(&self, request: &$req) -> ApiResult<$resp> {
                    self.invoker.invoke($path, request)
                }

                ::paste::paste! {
                    #[doc = concat!("Runs [`ServerClient::", stringify!($method), "`] on the blocking pool.")]
                    pub async fn [<$method _async>](&self, request: $req) -> ApiResult<$resp> {
                        self.invoker.invoke_async($path, request).await
                    }
                }
            )*
        }

        /// Every operation the client exposes, in declaration order.
        pub const OPERATIONS: &[Operation] = &[
            $( Operation { name: stringify!($method), path: $path }, )*
        ];
    };
}

server_operations! {
    // Account management
    /// Public profile of a player, restricted to the sections requested.
    get_player_profile => "/Server/GetPlayerProfile", GetPlayerProfileRequest => GetPlayerProfileResult;
    get_user_account_info => "/Server/GetUserAccountInfo", GetUserAccountInfoRequest => GetUserAccountInfoResult;
    /// Validate a session ticket presented by a game client.
    authenticate_session_ticket => "/Server/AuthenticateSessionTicket",
        AuthenticateSessionTicketRequest => AuthenticateSessionTicketResult;
    ban_users => "/Server/BanUsers", BanUsersRequest => BanListResult;
    get_user_bans => "/Server/GetUserBans", PlayerRequest => BanListResult;
    revoke_all_bans_for_user => "/Server/RevokeAllBansForUser", PlayerRequest => BanListResult;
    update_avatar_url => "/Server/UpdateAvatarUrl", UpdateAvatarUrlRequest => EmptyResult;
    /// Permanently removes the player and all of their title data.
    delete_player => "/Server/DeletePlayer", PlayerRequest => EmptyResult;

    // Title-wide data
    get_title_data => "/Server/GetTitleData", GetTitleDataRequest => GetTitleDataResult;
    set_title_data => "/Server/SetTitleData", SetTitleDataRequest => EmptyResult;
    /// Like `get_title_data`, for keys never exposed to game clients.
    get_title_internal_data => "/Server/GetTitleInternalData", GetTitleDataRequest => GetTitleDataResult;
    set_title_internal_data => "/Server/SetTitleInternalData", SetTitleDataRequest => EmptyResult;
    get_publisher_data => "/Server/GetPublisherData", GetTitleDataRequest => GetTitleDataResult;
    set_publisher_data => "/Server/SetPublisherData", SetTitleDataRequest => EmptyResult;
    get_title_news => "/Server/GetTitleNews", GetTitleNewsRequest => GetTitleNewsResult;
    get_time => "/Server/GetTime", GetTimeRequest => GetTimeResult;

    // Player data
    get_user_data => "/Server/GetUserData", GetUserDataRequest => GetUserDataResult;
    get_user_internal_data => "/Server/GetUserInternalData", GetUserDataRequest => GetUserDataResult;
    get_user_read_only_data => "/Server/GetUserReadOnlyData", GetUserDataRequest => GetUserDataResult;
    get_user_publisher_data => "/Server/GetUserPublisherData", GetUserDataRequest => GetUserDataResult;
    update_user_data => "/Server/UpdateUserData", UpdateUserDataRequest => UpdateUserDataResult;
    update_user_internal_data => "/Server/UpdateUserInternalData",
        UpdateUserInternalDataRequest => UpdateUserDataResult;
    /// Data the player can read but only the server can write.
    update_user_read_only_data => "/Server/UpdateUserReadOnlyData", UpdateUserDataRequest => UpdateUserDataResult;
    update_user_publisher_data => "/Server/UpdateUserPublisherData", UpdateUserDataRequest => UpdateUserDataResult;

    // Statistics and leaderboards
    get_player_statistics => "/Server/GetPlayerStatistics", GetPlayerStatisticsRequest => GetPlayerStatisticsResult;
    update_player_statistics => "/Server/UpdatePlayerStatistics", UpdatePlayerStatisticsRequest => EmptyResult;
    get_player_statistic_versions => "/Server/GetPlayerStatisticVersions",
        GetPlayerStatisticVersionsRequest => GetPlayerStatisticVersionsResult;
    get_leaderboard => "/Server/GetLeaderboard", GetLeaderboardRequest => GetLeaderboardResult;
    get_leaderboard_around_user => "/Server/GetLeaderboardAroundUser",
        GetLeaderboardAroundUserRequest => GetLeaderboardResult;

    // Inventory and virtual currency
    get_catalog_items => "/Server/GetCatalogItems", GetCatalogItemsRequest => GetCatalogItemsResult;
    get_user_inventory => "/Server/GetUserInventory", PlayerRequest => GetUserInventoryResult;
    grant_items_to_user => "/Server/GrantItemsToUser", GrantItemsToUserRequest => GrantItemsToUserResult;
    consume_item => "/Server/ConsumeItem", ConsumeItemRequest => ItemUsesResult;
    modify_item_uses => "/Server/ModifyItemUses", ModifyItemUsesRequest => ItemUsesResult;
    revoke_inventory_item => "/Server/RevokeInventoryItem", RevokeInventoryItemRequest => EmptyResult;
    add_user_virtual_currency => "/Server/AddUserVirtualCurrency",
        ModifyUserVirtualCurrencyRequest => ModifyUserVirtualCurrencyResult;
    subtract_user_virtual_currency => "/Server/SubtractUserVirtualCurrency",
        ModifyUserVirtualCurrencyRequest => ModifyUserVirtualCurrencyResult;

    // Matchmaking and game server instances
    /// Confirm that a player joining a lobby holds a ticket the matchmaker
    /// issued for it.
    redeem_matchmaker_ticket => "/Server/RedeemMatchmakerTicket",
        RedeemMatchmakerTicketRequest => RedeemMatchmakerTicketResult;
    notify_matchmaker_player_left => "/Server/NotifyMatchmakerPlayerLeft",
        NotifyMatchmakerPlayerLeftRequest => NotifyMatchmakerPlayerLeftResult;
    register_game => "/Server/RegisterGame", RegisterGameRequest => RegisterGameResult;
    deregister_game => "/Server/DeregisterGame", LobbyRequest => EmptyResult;
    /// Must be called periodically or the matchmaker drops the instance.
    refresh_game_server_instance_heartbeat => "/Server/RefreshGameServerInstanceHeartbeat",
        LobbyRequest => EmptyResult;
    set_game_server_instance_state => "/Server/SetGameServerInstanceState",
        SetGameServerInstanceStateRequest => EmptyResult;
    set_game_server_instance_data => "/Server/SetGameServerInstanceData",
        SetGameServerInstanceDataRequest => EmptyResult;
    set_game_server_instance_tags => "/Server/SetGameServerInstanceTags",
        SetGameServerInstanceTagsRequest => EmptyResult;
}
