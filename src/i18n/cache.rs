use super::store::MultiLanguageObject;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Size-bounded cache of successful `old_json` parses keyed by input text.
///
/// Eviction drops the oldest inserted entry. Lookups do not refresh an
/// entry's position.
#[derive(Debug)]
pub struct ParseCache {
    inner: Mutex<CacheInner>,
    max_size: usize,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, MultiLanguageObject>,
    order: VecDeque<String>,
}

impl ParseCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            max_size,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // Poisoning is ignored: entries are only ever complete parses.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, text: &str) -> Option<MultiLanguageObject> {
        self.lock().entries.get(text).cloned()
    }

    pub fn insert(&self, text: String, value: MultiLanguageObject) {
        if self.max_size == 0 {
            return;
        }

        let mut inner = self.lock();

        if let Some(existing) = inner.entries.get_mut(&text) {
            *existing = value;
            return;
        }

        while inner.entries.len() >= self.max_size {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }

        inner.order.push_back(text.clone());
        inner.entries.insert(text, value);
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(500)
    }
}
