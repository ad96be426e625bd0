//! Catalog, player inventory and virtual currency.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCatalogItemsRequest {
    /// Catalog to read; `None` means the title's primary catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetCatalogItemsResult {
    pub catalog: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CatalogItem {
    pub item_id: String,
    pub item_class: Option<String>,
    pub catalog_version: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub virtual_currency_prices: HashMap<String, u32>,
    pub tags: Vec<String>,
    pub is_stackable: bool,
    pub is_tradable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetUserInventoryResult {
    pub player_id: String,
    pub inventory: Vec<ItemInstance>,
    pub virtual_currency: HashMap<String, i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ItemInstance {
    pub item_id: String,
    pub item_instance_id: String,
    pub item_class: Option<String>,
    pub catalog_version: Option<String>,
    pub display_name: Option<String>,
    pub purchase_date: Option<String>,
    pub expiration: Option<String>,
    pub remaining_uses: Option<i32>,
    pub annotation: Option<String>,
    pub custom_data: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GrantItemsToUserRequest {
    pub player_id: String,
    pub item_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GrantItemsToUserResult {
    pub item_grant_results: Vec<GrantedItemInstance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GrantedItemInstance {
    pub player_id: String,
    pub item_id: String,
    pub item_instance_id: String,
    pub result: bool,
    pub remaining_uses: Option<i32>,
    pub annotation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumeItemRequest {
    pub player_id: String,
    pub item_instance_id: String,
    pub consume_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyItemUsesRequest {
    pub player_id: String,
    pub item_instance_id: String,
    /// Negative values remove uses.
    pub uses_to_add: i32,
}

/// Result of `ConsumeItem` and `ModifyItemUses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ItemUsesResult {
    pub item_instance_id: String,
    pub remaining_uses: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RevokeInventoryItemRequest {
    pub player_id: String,
    pub item_instance_id: String,
}

/// Used by both add and subtract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyUserVirtualCurrencyRequest {
    pub player_id: String,
    /// Two-letter currency code.
    pub virtual_currency: String,
    pub amount: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ModifyUserVirtualCurrencyResult {
    pub player_id: String,
    pub virtual_currency: String,
    pub balance_change: i32,
    pub balance: i32,
}
