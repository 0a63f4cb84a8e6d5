//! The food gacha: spin for a random dish, collect every one.

use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::{
  collection::UnlockSet,
  key::StorageKey,
  local::LocalStore,
  storage::DurableStorage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Rarity {
  Common,
  Rare,
  Epic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
  pub id:     &'static str,
  pub rarity: Rarity,
}

const fn food(id: &'static str, rarity: Rarity) -> Food { Food { id, rarity } }

pub const CATALOG: &[Food] = &[
  food("cream-bacon-pasta", Rarity::Epic),
  food("pudding-tiramisu", Rarity::Epic),
  food("italian-bolognese", Rarity::Rare),
  food("hamburger-steak", Rarity::Common),
  food("corn-cream-soup", Rarity::Common),
  food("curry-naan", Rarity::Rare),
  food("handmade-takoyaki", Rarity::Epic),
  food("melon-soda", Rarity::Common),
  food("hydrangea-parfait", Rarity::Rare),
  food("matcha-curry-udon", Rarity::Rare),
  food("matcha-soba", Rarity::Common),
  food("tempura-udon", Rarity::Common),
  food("tempura-soup-udon", Rarity::Common),
  food("ryoma-bento", Rarity::Epic),
  food("ice-cream-combo", Rarity::Rare),
  food("instant-noodles", Rarity::Common),
  food("braised-pork-roll", Rarity::Common),
  food("sweet-oil-cake", Rarity::Common),
  food("grilled-skewers", Rarity::Common),
  food("stinky-tofu", Rarity::Rare),
  food("steamed-dumplings", Rarity::Common),
  food("egg-fried-rice", Rarity::Common),
  food("mixed-noodles", Rarity::Common),
  food("roujiamo", Rarity::Common),
  food("hotel-breakfast", Rarity::Common),
  food("beijing-duck", Rarity::Epic),
  food("curry-udon", Rarity::Common),
  food("hachi-cocoa", Rarity::Rare),
  food("usagi-cocoa", Rarity::Rare),
  food("apple-candy", Rarity::Common),
  food("three-color-dango", Rarity::Common),
  food("tonkatsu-don", Rarity::Rare),
  food("strawberry-ice-cream", Rarity::Common),
];

pub fn find(id: &str) -> Option<&'static Food> { CATALOG.iter().find(|f| f.id == id) }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
  New,
  Duplicate,
}

pub struct Gacha<B> {
  collected: UnlockSet<B>,
}

impl<B: DurableStorage> Gacha<B> {
  pub fn open(store: LocalStore<B>) -> Self {
    Self { collected: UnlockSet::open(store, StorageKey::GachaCollected) }
  }

  /// Draw a dish uniformly from [`CATALOG`] and record it.
  pub fn spin(&mut self, rng: &mut impl RngCore) -> (&'static Food, Draw) {
    let index = (rng.next_u64() % CATALOG.len() as u64) as usize;
    let food = &CATALOG[index];
    (food, self.win(food.id))
  }

  /// Record that `id` was won.
  pub fn win(&mut self, id: &str) -> Draw {
    if self.collected.insert(id) { Draw::New } else { Draw::Duplicate }
  }

  pub fn reset(&mut self) { self.collected.reset(); }

  pub fn collected(&self) -> &[String] { self.collected.ids() }

  /// `(collected, total)`.
  pub fn progress(&self) -> (usize, usize) { (self.collected.len(), CATALOG.len()) }
}
