//! The birthday-candle flag.

use crate::{key::StorageKey, local::LocalStore, storage::DurableStorage};

pub struct Candle<B> {
  store: LocalStore<B>,
  blown: bool,
}

impl<B: DurableStorage> Candle<B> {
  pub fn open(store: LocalStore<B>) -> Self {
    let blown = store.read(StorageKey::CandleBlown, false);
    Self { store, blown }
  }

  pub fn is_blown(&self) -> bool { self.blown }

  /// Blow the candle out. Returns `false` if it was already out.
  pub fn blow(&mut self) -> bool {
    if self.blown {
      return false;
    }
    self.blown = true;
    self.store.write(StorageKey::CandleBlown, &true);
    true
  }

  /// Relight the candle.
  pub fn reset(&mut self) {
    self.blown = false;
    self.store.write(StorageKey::CandleBlown, &false);
  }
}
