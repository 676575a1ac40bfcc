//! Release hooks for stored keys and values.

use crate::slot::Entry;

pub(crate) type KeyHook = Box<dyn FnMut(Box<[u8]>)>;
pub(crate) type ValueHook<V> = Box<dyn FnMut(V)>;

/// Receives every stored key and value the map discards.
///
/// Each stored item reaches its hook exactly once: on `remove`, `clear` or
/// drop of the map. Items moved back out to the caller (`take`, the old
/// value from `insert`/`replace`) never do. A missing hook drops the item.
pub(crate) struct Release<V> {
    pub(crate) key: Option<KeyHook>,
    pub(crate) value: Option<ValueHook<V>>,
}

impl<V> Release<V> {
    pub(crate) const fn none() -> Self {
        Self {
            key: None,
            value: None,
        }
    }

    pub(crate) fn key(&mut self, key: Box<[u8]>) {
        if let Some(hook) = self.key.as_mut() {
            hook(key);
        }
    }

    pub(crate) fn value(&mut self, value: V) {
        if let Some(hook) = self.value.as_mut() {
            hook(value);
        }
    }

    pub(crate) fn entry(&mut self, entry: Entry<V>) {
        let Entry { key, value, .. } = entry;
        self.key(key);
        self.value(value);
    }
}
