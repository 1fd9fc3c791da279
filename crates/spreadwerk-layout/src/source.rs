// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page sources — random-access providers of encoded page bytes.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use spreadwerk_core::{PageRef, Result, SpreadwerkError};
use tracing::{debug, warn};

/// Supplies raw image bytes for a page.
///
/// Implementations must tolerate concurrent calls for arbitrary pages in any
/// order. Retrying transient failures is the implementation's business; the
/// engine treats any error as an unreadable page.
pub trait PageSource: Send + Sync {
    fn load(&self, page: &PageRef) -> Result<Vec<u8>>;
}

/// Pages held in memory, keyed by page id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, bytes: Vec<u8>) {
        self.pages.insert(id.into(), bytes);
    }

    pub fn with_page(mut self, id: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(id, bytes);
        self
    }
}

impl PageSource for MemorySource {
    fn load(&self, page: &PageRef) -> Result<Vec<u8>> {
        self.pages
            .get(page.id())
            .cloned()
            .ok_or_else(|| SpreadwerkError::PageNotFound(page.id().to_string()))
    }
}

/// Pages stored as files under one directory, addressed by page id
/// (`root/<id>`). Nothing is listed or sorted here.
///
/// Ids must be relative paths that stay below `root`: absolute ids and ids
/// with `..` segments are reported as `PageNotFound`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PageSource for DirectorySource {
    fn load(&self, page: &PageRef) -> Result<Vec<u8>> {
        let id = Path::new(page.id());
        let confined = id
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !confined {
            warn!(page = %page, root = %self.root.display(), "Page id escapes the source root");
            return Err(SpreadwerkError::PageNotFound(page.id().to_string()));
        }
        read_page(&self.root.join(id))
    }
}

/// Pages addressed by their filesystem path, used verbatim. Ids are trusted:
/// meant for paths a user named explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl PageSource for FileSource {
    fn load(&self, page: &PageRef) -> Result<Vec<u8>> {
        read_page(Path::new(page.id()))
    }
}

fn read_page(path: &Path) -> Result<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => {
            debug!(path = %path.display(), len = bytes.len(), "Page read");
            Ok(bytes)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Page read failed");
            Err(err.into())
        }
    }
}
