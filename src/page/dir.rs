use super::*;
use anyhow::Context;
use std::fs;
use std::io;
use tracing::trace;

/// Reads `active.html` and `watchlist.html` from a directory
pub struct DirPageSource {
    dir: PathBuf,
    base_url: String,
}

impl DirPageSource {
    pub fn new(dir: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn new_shared(dir: impl Into<PathBuf>, base_url: &str) -> SharedPageSource {
        Arc::new(Self::new(dir, base_url))
    }

    pub fn path_for(&self, list: ListKind) -> PathBuf {
        self.dir.join(format!("{}.html", list.file_stem()))
    }
}

impl PageSource for DirPageSource {
    fn fetch(&self, list: ListKind) -> Result<Page> {
        let path = self.path_for(list);
        trace!(path = %path.display(), %list, "reading page");

        let html = match fs::read_to_string(&path) {
            Ok(html) => html,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PageError::Missing { list, path }.into())
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };

        if html.trim().is_empty() {
            return Err(PageError::Empty { list, path }.into());
        }

        Ok(Page {
            url: format!("{}{}", self.base_url, list.path()),
            html,
        })
    }
}
