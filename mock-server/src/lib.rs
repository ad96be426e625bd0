//! In-memory stand-in for the game backend's server API.
//!
//! Implements enough of the API (title data, player data, statistics,
//! inventory, currency, game registration) for end-to-end tests of the SDK.
//! Responses use the backend's envelope: `{code, status, data}` on success,
//! `{code, status, error, errorCode, errorMessage}` on failure.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SECRET_KEY_HEADER: &str = "x-secretkey";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Backend {
    secret_key: String,
    title_data: HashMap<String, String>,
    players: HashMap<String, Player>,
    lobbies: HashMap<String, Lobby>,
}

#[derive(Debug, Clone, Default)]
struct Player {
    data: HashMap<String, DataRecord>,
    data_version: u32,
    statistics: HashMap<String, Statistic>,
    inventory: Vec<Item>,
    currency: HashMap<String, i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DataRecord {
    value: String,
    last_updated: String,
    permission: String,
}

#[derive(Debug, Clone, Copy)]
struct Statistic {
    value: i32,
    version: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Item {
    item_id: String,
    item_instance_id: String,
    purchase_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation: Option<String>,
}

#[derive(Debug, Clone)]
struct Lobby {
    build: String,
    game_mode: String,
    region: String,
}

impl Backend {
    pub fn new(secret_key: &str) -> Self {
        Self {
            secret_key: secret_key.to_string(),
            ..Self::default()
        }
    }

    /// Register a player with no data.
    pub fn with_player(mut self, player_id: &str) -> Self {
        self.players.insert(player_id.to_string(), Player::default());
        self
    }

    pub fn with_title_data(mut self, key: &str, value: &str) -> Self {
        self.title_data.insert(key.to_string(), value.to_string());
        self
    }

    fn player(&self, player_id: &str) -> Result<&Player, ApiFailure> {
        self.players
            .get(player_id)
            .ok_or_else(|| ApiFailure::account_not_found(player_id))
    }

    fn player_mut(&mut self, player_id: &str) -> Result<&mut Player, ApiFailure> {
        self.players
            .get_mut(player_id)
            .ok_or_else(|| ApiFailure::account_not_found(player_id))
    }
}

pub type Db = Arc<RwLock<Backend>>;

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Error envelope in the backend's wire format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub code: u16,
    pub status: &'static str,
    pub error: &'static str,
    pub error_code: u32,
    pub error_message: String,
}

impl ApiFailure {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: 400,
            status: "BadRequest",
            error: "InvalidParams",
            error_code: 1000,
            error_message: message.into(),
        }
    }

    pub fn account_not_found(player_id: &str) -> Self {
        Self {
            code: 400,
            status: "BadRequest",
            error: "AccountNotFound",
            error_code: 1001,
            error_message: format!("User {player_id} not found"),
        }
    }

    pub fn insufficient_funds() -> Self {
        Self {
            code: 400,
            status: "BadRequest",
            error: "InsufficientFunds",
            error_code: 1059,
            error_message: "Insufficient funds".to_string(),
        }
    }

    pub fn game_not_found(lobby_id: &str) -> Self {
        Self {
            code: 404,
            status: "NotFound",
            error: "GameNotFound",
            error_code: 1060,
            error_message: format!("Lobby {lobby_id} not found"),
        }
    }

    pub fn not_authenticated() -> Self {
        Self {
            code: 401,
            status: "Unauthorized",
            error: "NotAuthenticated",
            error_code: 1074,
            error_message: "X-SecretKey header is missing or invalid".to_string(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(self)).into_response()
    }
}

/// `Json` extractor whose rejections use the backend's `InvalidParams`
/// envelope instead of axum's plain-text body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| ApiFailure::invalid_params(rejection.body_text()))?;
        Ok(Self(value))
    }
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({"code": 200, "status": "OK", "data": data}))
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn app(backend: Backend) -> Router {
    let db: Db = Arc::new(RwLock::new(backend));
    Router::new()
        .route("/Server/GetTitleData", post(get_title_data))
        .route("/Server/SetTitleData", post(set_title_data))
        .route("/Server/GetUserData", post(get_user_data))
        .route("/Server/UpdateUserData", post(update_user_data))
        .route("/Server/GetPlayerStatistics", post(get_player_statistics))
        .route("/Server/UpdatePlayerStatistics", post(update_player_statistics))
        .route("/Server/GetUserInventory", post(get_user_inventory))
        .route("/Server/GrantItemsToUser", post(grant_items_to_user))
        .route("/Server/AddUserVirtualCurrency", post(add_user_virtual_currency))
        .route("/Server/SubtractUserVirtualCurrency", post(subtract_user_virtual_currency))
        .route("/Server/RegisterGame", post(register_game))
        .route("/Server/DeregisterGame", post(deregister_game))
        .route("/Server/GetTime", post(get_time))
        .route_layer(middleware::from_fn_with_state(db.clone(), require_secret_key))
        .with_state(db)
}

pub async fn run(listener: TcpListener, backend: Backend) -> Result<(), std::io::Error> {
    axum::serve(listener, app(backend)).await
}

async fn require_secret_key(State(db): State<Db>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(SECRET_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let authorized = provided.as_deref() == Some(db.read().await.secret_key.as_str());
    if !authorized {
        tracing::debug!(path = %request.uri().path(), "rejecting request without valid secret key");
        return ApiFailure::not_authenticated().into_response();
    }
    next.run(request).await
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeysRequest {
    pub keys: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetKeyRequest {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerKeysRequest {
    pub player_id: String,
    pub keys: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateDataRequest {
    pub player_id: String,
    #[serde(default)]
    pub data: HashMap<String, String>,
    pub keys_to_remove: Option<Vec<String>>,
    pub permission: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatisticsRequest {
    pub player_id: String,
    pub statistic_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatisticUpdate {
    pub statistic_name: String,
    pub value: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateStatisticsRequest {
    pub player_id: String,
    pub statistics: Vec<StatisticUpdate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerRequest {
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GrantItemsRequest {
    pub player_id: String,
    pub item_ids: Vec<String>,
    pub annotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrencyRequest {
    pub player_id: String,
    pub virtual_currency: String,
    pub amount: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterGameRequest {
    pub build: String,
    pub game_mode: String,
    pub region: String,
    pub lobby_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LobbyRequest {
    pub lobby_id: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn select(source: &HashMap<String, String>, keys: Option<&[String]>) -> HashMap<String, String> {
    match keys {
        Some(keys) => keys
            .iter()
            .filter_map(|k| source.get(k).map(|v| (k.clone(), v.clone())))
            .collect(),
        None => source.clone(),
    }
}

async fn get_title_data(State(db): State<Db>, ApiJson(input): ApiJson<KeysRequest>) -> Json<Value> {
    let backend = db.read().await;
    ok(json!({"Data": select(&backend.title_data, input.keys.as_deref())}))
}

async fn set_title_data(State(db): State<Db>, ApiJson(input): ApiJson<SetKeyRequest>) -> Json<Value> {
    let mut backend = db.write().await;
    match input.value {
        Some(value) => backend.title_data.insert(input.key, value),
        None => backend.title_data.remove(&input.key),
    };
    ok(json!({}))
}

async fn get_user_data(
    State(db): State<Db>,
    ApiJson(input): ApiJson<PlayerKeysRequest>,
) -> Result<Json<Value>, ApiFailure> {
    let backend = db.read().await;
    let player = backend.player(&input.player_id)?;
    let data: HashMap<&String, &DataRecord> = match &input.keys {
        Some(keys) => keys
            .iter()
            .filter_map(|k| player.data.get_key_value(k))
            .collect(),
        None => player.data.iter().collect(),
    };
    Ok(ok(json!({
        "PlayerId": input.player_id,
        "DataVersion": player.data_version,
        "Data": data,
    })))
}

async fn update_user_data(
    State(db): State<Db>,
    ApiJson(input): ApiJson<UpdateDataRequest>,
) -> Result<Json<Value>, ApiFailure> {
    if input.data.is_empty() && input.keys_to_remove.as_ref().is_none_or(Vec::is_empty) {
        return Err(ApiFailure::invalid_params("Data or KeysToRemove must be provided"));
    }
    let mut backend = db.write().await;
    let player = backend.player_mut(&input.player_id)?;
    let permission = input.permission.unwrap_or_else(|| "Private".to_string());
    let updated = now();
    for (key, value) in input.data {
        player.data.insert(
            key,
            DataRecord {
                value,
                last_updated: updated.clone(),
                permission: permission.clone(),
            },
        );
    }
    for key in input.keys_to_remove.unwrap_or_default() {
        player.data.remove(&key);
    }
    player.data_version += 1;
    Ok(ok(json!({"DataVersion": player.data_version})))
}

async fn get_player_statistics(
    State(db): State<Db>,
    ApiJson(input): ApiJson<StatisticsRequest>,
) -> Result<Json<Value>, ApiFailure> {
    let backend = db.read().await;
    let player = backend.player(&input.player_id)?;
    let statistics: Vec<Value> = player
        .statistics
        .iter()
        .filter(|(name, _)| {
            input
                .statistic_names
                .as_ref()
                .is_none_or(|names| names.contains(name))
        })
        .map(|(name, stat)| json!({"StatisticName": name, "Value": stat.value, "Version": stat.version}))
        .collect();
    Ok(ok(json!({"PlayerId": input.player_id, "Statistics": statistics})))
}

async fn update_player_statistics(
    State(db): State<Db>,
    ApiJson(input): ApiJson<UpdateStatisticsRequest>,
) -> Result<Json<Value>, ApiFailure> {
    let mut backend = db.write().await;
    let player = backend.player_mut(&input.player_id)?;
    for update in input.statistics {
        player
            .statistics
            .entry(update.statistic_name)
            .and_modify(|stat| stat.value = update.value)
            .or_insert(Statistic {
                value: update.value,
                version: 0,
            });
    }
    Ok(ok(json!({})))
}

async fn get_user_inventory(
    State(db): State<Db>,
    ApiJson(input): ApiJson<PlayerRequest>,
) -> Result<Json<Value>, ApiFailure> {
    let backend = db.read().await;
    let player = backend.player(&input.player_id)?;
    Ok(ok(json!({
        "PlayerId": input.player_id,
        "Inventory": player.inventory,
        "VirtualCurrency": player.currency,
    })))
}

async fn grant_items_to_user(
    State(db): State<Db>,
    ApiJson(input): ApiJson<GrantItemsRequest>,
) -> Result<Json<Value>, ApiFailure> {
    let mut backend = db.write().await;
    let player = backend.player_mut(&input.player_id)?;
    let purchased = now();
    let mut results = Vec::with_capacity(input.item_ids.len());
    for item_id in input.item_ids {
        let item = Item {
            item_id,
            item_instance_id: Uuid::new_v4().to_string(),
            purchase_date: purchased.clone(),
            annotation: input.annotation.clone(),
        };
        results.push(json!({
            "PlayerId": input.player_id,
            "ItemId": item.item_id,
            "ItemInstanceId": item.item_instance_id,
            "Result": true,
            "Annotation": item.annotation,
        }));
        player.inventory.push(item);
    }
    Ok(ok(json!({"ItemGrantResults": results})))
}

async fn add_user_virtual_currency(
    State(db): State<Db>,
    ApiJson(input): ApiJson<CurrencyRequest>,
) -> Result<Json<Value>, ApiFailure> {
    modify_currency(&db, input, 1).await
}

async fn subtract_user_virtual_currency(
    State(db): State<Db>,
    ApiJson(input): ApiJson<CurrencyRequest>,
) -> Result<Json<Value>, ApiFailure> {
    modify_currency(&db, input, -1).await
}

async fn modify_currency(db: &Db, input: CurrencyRequest, sign: i32) -> Result<Json<Value>, ApiFailure> {
    if input.amount < 0 {
        return Err(ApiFailure::invalid_params("Amount must not be negative"));
    }
    let mut backend = db.write().await;
    let player = backend.player_mut(&input.player_id)?;
    let balance = player.currency.entry(input.virtual_currency.clone()).or_insert(0);
    let change = input.amount * sign;
    let updated = balance
        .checked_add(change)
        .ok_or_else(|| ApiFailure::invalid_params("Balance would overflow"))?;
    if updated < 0 {
        return Err(ApiFailure::insufficient_funds());
    }
    *balance = updated;
    Ok(ok(json!({
        "PlayerId": input.player_id,
        "VirtualCurrency": input.virtual_currency,
        "BalanceChange": change,
        "Balance": *balance,
    })))
}

async fn register_game(State(db): State<Db>, ApiJson(input): ApiJson<RegisterGameRequest>) -> Json<Value> {
    let lobby_id = input.lobby_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let lobby = Lobby {
        build: input.build,
        game_mode: input.game_mode,
        region: input.region,
    };
    tracing::info!(
        %lobby_id,
        build = %lobby.build,
        game_mode = %lobby.game_mode,
        region = %lobby.region,
        "registered game"
    );
    db.write().await.lobbies.insert(lobby_id.clone(), lobby);
    ok(json!({"LobbyId": lobby_id}))
}

async fn deregister_game(
    State(db): State<Db>,
    ApiJson(input): ApiJson<LobbyRequest>,
) -> Result<Json<Value>, ApiFailure> {
    db.write()
        .await
        .lobbies
        .remove(&input.lobby_id)
        .map(|_| ok(json!({})))
        .ok_or_else(|| ApiFailure::game_not_found(&input.lobby_id))
}

async fn get_time() -> Json<Value> {
    ok(json!({"Time": now()}))
}
