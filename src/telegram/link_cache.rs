use std::collections::{HashMap, VecDeque};

use tokio::sync::Mutex;

use crate::core::config;

/// Length of generated ids; keeps callback payloads well under Telegram's
/// 64-byte limit
pub const URL_ID_LEN: usize = 16;

#[derive(Default)]
struct Entries {
    urls: HashMap<String, String>,
    /// Ids in insertion order, oldest first
    order: VecDeque<String>,
}

impl Entries {
    fn trim(&mut self, capacity: usize, retain: usize) {
        if self.urls.len() <= capacity {
            return;
        }
        while self.urls.len() > retain {
            match self.order.pop_front() {
                Some(id) => {
                    self.urls.remove(&id);
                }
                None => break,
            }
        }
    }
}

/// Short-lived mapping from a short id to the page URL of a delivered video.
///
/// Inline buttons carry the id instead of the URL. An entry lives until its
/// button is pressed or until it is trimmed: once more than `capacity`
/// entries are stored, the oldest are dropped until `retain` remain.
pub struct LinkCache {
    entries: Mutex<Entries>,
    capacity: usize,
    retain: usize,
}

impl Default for LinkCache {
    fn default() -> Self {
        Self::new(config::link_cache::CAPACITY, config::link_cache::RETAIN)
    }
}

impl LinkCache {
    pub fn new(capacity: usize, retain: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            capacity,
            retain: retain.min(capacity),
        }
    }

    /// Stores `url` under a fresh id and returns the id.
    pub async fn insert(&self, url: &str) -> String {
        let mut entries = self.entries.lock().await;

        let mut id = new_url_id();
        while entries.urls.contains_key(&id) {
            id = new_url_id();
        }

        entries.urls.insert(id.clone(), url.to_string());
        entries.order.push_back(id.clone());
        entries.trim(self.capacity, self.retain);
        log::debug!("Link cache: stored {} ({} entries)", id, entries.urls.len());
        id
    }

    pub async fn get(&self, url_id: &str) -> Option<String> {
        self.entries.lock().await.urls.get(url_id).cloned()
    }

    pub async fn remove(&self, url_id: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        let removed = entries.urls.remove(url_id);
        if removed.is_some() {
            entries.order.retain(|id| id != url_id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.urls.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn new_url_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(URL_ID_LEN);
    id
}
