//! Where listing pages come from
//!
//! A browser companion does the logging in and page loading; the monitor
//! only ever sees finished HTML through a [`PageSource`].
#[cfg(test)]
mod in_memory;
mod dir;

#[cfg(test)]
pub use self::in_memory::*;
pub use self::dir::*;

use crate::auction::ListKind;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Address the page was loaded from
    pub url: String,
    pub html: String,
}

#[derive(Error, Debug)]
pub enum PageError {
    #[error("no saved {list} page at {}", path.display())]
    Missing { list: ListKind, path: PathBuf },
    #[error("saved {list} page at {} is empty", path.display())]
    Empty { list: ListKind, path: PathBuf },
}

pub trait PageSource {
    fn fetch(&self, list: ListKind) -> Result<Page>;
}

pub type SharedPageSource = Arc<dyn PageSource + Send + Sync + 'static>;
