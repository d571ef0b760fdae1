//! Item catalog
//!
//! The core never owns an inventory. It only needs to know which item ids
//! exist so that loot rolls and consumption requests can fail closed on
//! unknown ids. Items are defined in `assets/config/items.ron`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default path of the item catalog
pub const ITEMS_CONFIG_PATH: &str = "assets/config/items.ron";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Consumable,
    Weapon,
    Armor,
    Material,
}

/// Effect applied by the inventory collaborator when an item is consumed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    Heal(f32),
    Energy(f32),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemConfig {
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub effect: Option<ItemEffect>,
}

impl ItemConfig {
    pub fn is_consumable(&self) -> bool {
        self.kind == ItemKind::Consumable
    }
}

/// Root structure for the items.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsConfig {
    pub items: HashMap<String, ItemConfig>,
}

/// Resource listing every known item
#[derive(Resource, Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, ItemConfig>,
}

impl ItemCatalog {
    pub fn new(config: ItemsConfig) -> Self {
        Self { items: config.items }
    }

    pub fn get(&self, item_id: &str) -> Option<&ItemConfig> {
        self.items.get(item_id)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.contains_key(item_id)
    }

    pub fn insert(&mut self, item_id: impl Into<String>, config: ItemConfig) {
        self.items.insert(item_id.into(), config);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Load the item catalog from assets/config/items.ron
pub fn load_item_catalog() -> Result<ItemCatalog, String> {
    let contents = std::fs::read_to_string(ITEMS_CONFIG_PATH)
        .map_err(|e| format!("Failed to read {}: {}", ITEMS_CONFIG_PATH, e))?;

    let config: ItemsConfig = ron::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", ITEMS_CONFIG_PATH, e))?;

    let catalog = ItemCatalog::new(config);
    info!("Loaded {} items from {}", catalog.len(), ITEMS_CONFIG_PATH);
    Ok(catalog)
}
