//! Parse many specification files in parallel.
//!
//! Each file gets its own scoped thread. Results travel back over a channel,
//! so a [`ParseBatch`] lists them in completion order; callers must key
//! entries by their stamped file name, never by position.

use std::io;
use std::path;
use std::sync::mpsc;
use std::thread;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use hashbrown::HashMap;

use crate::concept::ConceptLookup;
use crate::config::ParserConfig;
use crate::model::Specification;
use crate::parser::{ParseResult, SpecParser};

/// Source of file contents for specifications and their resources.
///
/// Shared across parser threads, so reads must be safe to issue
/// concurrently.
pub trait SourceReader: Send + Sync {
    /// Read the whole file at `path` as UTF-8 text.
    ///
    /// # Errors
    /// Returns the underlying I/O error when the file cannot be read.
    fn read_file_contents(&self, path: &Utf8Path) -> io::Result<String>;
}

/// Reads files beneath a root directory.
///
/// Relative paths resolve against the root. Absolute paths are accepted when
/// they lie under the root; nothing outside it can be read.
#[derive(Debug)]
pub struct FsReader {
    root: Dir,
    root_path: Utf8PathBuf,
}

impl FsReader {
    /// Open `root` for reading.
    ///
    /// # Errors
    /// Returns the I/O error raised while opening the directory, or an
    /// `InvalidData` error when its absolute form is not UTF-8.
    pub fn open(root: impl AsRef<Utf8Path>) -> io::Result<Self> {
        let root = root.as_ref();
        let root_path = Utf8PathBuf::from_path_buf(path::absolute(root)?).map_err(|path| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not valid UTF-8", path.display()),
            )
        })?;
        Ok(Self {
            root: Dir::open_ambient_dir(root, ambient_authority())?,
            root_path,
        })
    }

    /// Absolute path of the root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root_path
    }

    fn within_root<'p>(&self, path: &'p Utf8Path) -> io::Result<&'p Utf8Path> {
        if path.is_relative() {
            return Ok(path);
        }
        path.strip_prefix(&self.root_path).map_err(|_| {
            io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{path} lies outside {}", self.root_path),
            )
        })
    }
}

impl SourceReader for FsReader {
    fn read_file_contents(&self, path: &Utf8Path) -> io::Result<String> {
        self.root.read_to_string(self.within_root(path)?)
    }
}

/// In-memory reader keyed by path, for tests and embedded documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<Utf8PathBuf, String>,
}

impl MemoryReader {
    /// Register `contents` under `path`, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl SourceReader for MemoryReader {
    fn read_file_contents(&self, path: &Utf8Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{path}: file not found"))
        })
    }
}

/// Output of a parsing run.
#[derive(Debug, Clone, Default)]
pub struct ParseBatch {
    /// Successfully parsed specifications, in completion order.
    pub specifications: Vec<Specification>,
    /// One result per input file, in completion order.
    pub results: Vec<ParseResult>,
}

impl ParseBatch {
    /// The result recorded for `path`, if it was part of the batch.
    #[must_use]
    pub fn result_for(&self, path: &Utf8Path) -> Option<&ParseResult> {
        self.results.iter().find(|result| result.file_name.as_path() == path)
    }

    /// Whether every file parsed cleanly.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.results.iter().all(|result| result.ok)
    }
}

/// Parse `files` in parallel with default settings.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use specmark::{ConceptDictionary, MemoryReader, parse_spec_files};
/// let mut reader = MemoryReader::default();
/// reader.insert("a.spec", "# A\n## One\n* step\n");
/// let files = [Utf8PathBuf::from("a.spec"), Utf8PathBuf::from("missing.spec")];
/// let batch = parse_spec_files(&files, &ConceptDictionary::default(), &reader);
/// assert_eq!(batch.results.len(), 2);
/// assert_eq!(batch.specifications.len(), 1);
/// ```
#[must_use]
pub fn parse_spec_files(
    files: &[Utf8PathBuf],
    concepts: &dyn ConceptLookup,
    reader: &dyn SourceReader,
) -> ParseBatch {
    parse_spec_files_with_config(files, concepts, reader, &ParserConfig::default())
}

/// Parse `files` in parallel, one thread per file.
///
/// The reader supplies both the documents and any `<file:..>` or
/// `<table:..>` resources they reference. Exactly one result is collected per
/// input file; a file that cannot be read or parsed contributes a failed
/// result and no specification, without affecting its siblings.
#[must_use]
pub fn parse_spec_files_with_config(
    files: &[Utf8PathBuf],
    concepts: &dyn ConceptLookup,
    reader: &dyn SourceReader,
    config: &ParserConfig,
) -> ParseBatch {
    let parser = SpecParser::new(concepts)
        .with_resources(reader)
        .with_config(config);
    let mut batch = ParseBatch::default();

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel();
        for file in files {
            let tx = tx.clone();
            scope.spawn(move || {
                let outcome = parse_file(&parser, reader, file);
                // The receiver outlives every task.
                let _ = tx.send(outcome);
            });
        }
        drop(tx);

        for (result, spec) in rx.iter().take(files.len()) {
            if let Some(spec) = spec {
                batch.specifications.push(spec);
            }
            batch.results.push(result);
        }
    });

    tracing::info!(
        files = files.len(),
        parsed = batch.specifications.len(),
        failed = batch.results.iter().filter(|result| !result.ok).count(),
        "parsed specification batch"
    );
    batch
}

fn parse_file(
    parser: &SpecParser<'_>,
    reader: &dyn SourceReader,
    file: &Utf8Path,
) -> (ParseResult, Option<Specification>) {
    let span = tracing::debug_span!("parse_spec", file = %file);
    let _guard = span.enter();

    let text = match reader.read_file_contents(file) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read specification");
            return (ParseResult::failure(err.into()).with_file_name(file), None);
        }
    };

    let (spec, result) = parser.parse(&text);
    let result = result.with_file_name(file);
    if let Some(error) = &result.error {
        tracing::warn!(%error, "specification failed to parse");
    }
    (result, spec.map(|spec| spec.with_file_name(file)))
}
