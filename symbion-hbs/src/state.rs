use parking_lot::RwLock;
use std::sync::Arc;

/// Valeur publiée en entier : les lecteurs clonent l'`Arc`, l'écrivain remplace le pointeur.
/// Une snapshot publiée n'est jamais modifiée en place.
pub struct Snapshot<T> {
    current: RwLock<Arc<T>>,
}

impl<T> Snapshot<T> {
    pub fn new(value: T) -> Self {
        Self { current: RwLock::new(Arc::new(value)) }
    }

    pub fn load(&self) -> Arc<T> {
        self.current.read().clone()
    }

    /// Le verrou exclusif ne couvre que l'échange de pointeur.
    pub fn replace(&self, value: T) {
        let next = Arc::new(value);
        let old = std::mem::replace(&mut *self.current.write(), next);
        // ancienne snapshot détruite hors verrou
        drop(old);
    }
}

impl<T: Default> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
