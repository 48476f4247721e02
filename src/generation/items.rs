//! # Item Generation
//!
//! Item kind selection and the value each kind carries when spawned.

use crate::{ItemKind, WeightedTable};
use rand::rngs::StdRng;
use rand::Rng;

/// Item kinds by cumulative thresholds 30/50/70/100.
pub const ITEM_TABLE: WeightedTable<ItemKind> = WeightedTable::new(&[
    (ItemKind::HealthPotion, 30),
    (ItemKind::Weapon, 20),
    (ItemKind::Armor, 20),
    (ItemKind::Gold, 30),
]);

/// Health restored by a potion.
pub const POTION_HEALING: i32 = 20;

/// Attack bonus granted by a weapon.
pub const WEAPON_BONUS: i32 = 5;

/// Defense bonus granted by armor.
pub const ARMOR_BONUS: i32 = 3;

/// Rolls the value an item of `kind` spawns with.
///
/// Only gold varies: 10 to 29 pieces.
pub fn item_value(kind: ItemKind, rng: &mut StdRng) -> i32 {
    match kind {
        ItemKind::HealthPotion => POTION_HEALING,
        ItemKind::Weapon => WEAPON_BONUS,
        ItemKind::Armor => ARMOR_BONUS,
        ItemKind::Gold => rng.gen_range(10..=29),
    }
}

/// Rolls an item kind from [`ITEM_TABLE`] and then its value.
pub fn roll_item(rng: &mut StdRng) -> (ItemKind, i32) {
    let kind = ITEM_TABLE.roll(rng).unwrap_or(ItemKind::Gold);
    let value = item_value(kind, rng);
    (kind, value)
}
