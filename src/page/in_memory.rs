use super::*;
use anyhow::format_err;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Pages set by the test; a list with no page fails to fetch.
#[derive(Default)]
pub struct InMemoryPageSource {
    pages: Mutex<BTreeMap<ListKind, String>>,
}

impl InMemoryPageSource {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, list: ListKind, html: impl Into<String>) {
        self.pages.lock().insert(list, html.into());
    }

    pub fn remove(&self, list: ListKind) {
        self.pages.lock().remove(&list);
    }
}

impl PageSource for InMemoryPageSource {
    fn fetch(&self, list: ListKind) -> Result<Page> {
        let html = self
            .pages
            .lock()
            .get(&list)
            .cloned()
            .ok_or_else(|| format_err!("no {list} page set"))?;
        Ok(Page {
            url: format!("https://auction.test{}", list.path()),
            html,
        })
    }
}
