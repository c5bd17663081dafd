//! Input sources
//!
//! A [`SourceProvider`] turns source names into open byte streams. The
//! coordinator only cares whether opening worked; a failure is logged and
//! the source is skipped.
//!
//! - [`FileProvider`]: files on the local filesystem, stdin for the
//!   single-stream case
//! - [`MemoryProvider`]: named in-memory buffers, for tests and embedding

use crate::error::{SourceError, SourceResult};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

/// Name used for the implicit standard-input stream
pub const STDIN_NAME: &str = "<stdin>";

/// An opened, readable source and its identifying name
pub struct Source {
    name: String,
    reader: Box<dyn Read + Send>,
}

impl Source {
    pub fn new(name: impl Into<String>, reader: Box<dyn Read + Send>) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Split into name and reader
    pub fn into_parts(self) -> (String, Box<dyn Read + Send>) {
        (self.name, self.reader)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").field("name", &self.name).finish()
    }
}

/// Supplies openable byte sources by name
pub trait SourceProvider: Send + Sync {
    /// Open the named source
    fn open(&self, name: &str) -> SourceResult<Source>;

    /// Open the implicit stream used when no sources are named
    fn open_stdin(&self) -> Source;
}

/// Opens files from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FileProvider;

impl SourceProvider for FileProvider {
    fn open(&self, name: &str) -> SourceResult<Source> {
        let file = File::open(name).map_err(|e| SourceError::from_io(name, &e))?;
        Ok(Source::new(name, Box::new(file)))
    }

    fn open_stdin(&self) -> Source {
        Source::new(STDIN_NAME, Box::new(io::stdin()))
    }
}

/// Serves named in-memory buffers
///
/// Names that were never added fail to open with [`SourceError::NotFound`].
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    sources: HashMap<String, Arc<[u8]>>,
    stdin: Arc<[u8]>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            stdin: Arc::from(&b""[..]),
        }
    }

    /// Add a named source
    pub fn with_source(mut self, name: impl Into<String>, contents: impl AsRef<[u8]>) -> Self {
        self.sources
            .insert(name.into(), Arc::from(contents.as_ref()));
        self
    }

    /// Set the standard-input contents
    pub fn with_stdin(mut self, contents: impl AsRef<[u8]>) -> Self {
        self.stdin = Arc::from(contents.as_ref());
        self
    }

    /// Names of all registered sources
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned cursor over shared bytes
struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl SourceProvider for MemoryProvider {
    fn open(&self, name: &str) -> SourceResult<Source> {
        let contents = self.sources.get(name).ok_or_else(|| SourceError::NotFound {
            name: name.to_string(),
        })?;
        Ok(Source::new(
            name,
            Box::new(Cursor::new(SharedBytes(Arc::clone(contents)))),
        ))
    }

    fn open_stdin(&self) -> Source {
        Source::new(
            STDIN_NAME,
            Box::new(Cursor::new(SharedBytes(Arc::clone(&self.stdin)))),
        )
    }
}
