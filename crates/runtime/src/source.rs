//! Record sources: a single CSV file or a directory of CSV fragments.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ipl_core::{CoreError, Record, Result, Value};
use tracing::{debug, warn};

use crate::metrics::MetricsRegistry;

pub type Records = Box<dyn Iterator<Item = Result<Record>>>;

/// Anything that can produce a stream of records for one pipeline run.
pub trait RecordSource {
    fn records(&self) -> Result<Records>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    File(PathBuf),
    Directory(PathBuf),
}

impl SourceSpec {
    /// Directories become fragment sources, anything else a single file.
    pub fn detect(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            SourceSpec::Directory(path)
        } else {
            SourceSpec::File(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SourceSpec::File(p) | SourceSpec::Directory(p) => p,
        }
    }
}

pub fn open_source(spec: &SourceSpec, metrics: &MetricsRegistry) -> Box<dyn RecordSource> {
    match spec {
        SourceSpec::File(path) => Box::new(CsvFileSource::new(path).with_metrics(metrics.clone())),
        SourceSpec::Directory(path) => {
            Box::new(CsvDirectorySource::new(path).with_metrics(metrics.clone()))
        }
    }
}

pub struct CsvFileSource {
    path: PathBuf,
    metrics: MetricsRegistry,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), metrics: MetricsRegistry::default() }
    }

    pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
        self.metrics = metrics;
        self
    }
}

impl RecordSource for CsvFileSource {
    fn records(&self) -> Result<Records> {
        Ok(Box::new(open_csv(&self.path, &self.metrics)?))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

pub struct CsvDirectorySource {
    dir: PathBuf,
    metrics: MetricsRegistry,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), metrics: MetricsRegistry::default() }
    }

    pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
        self.metrics = metrics;
        self
    }

    /// Every `*.csv` file directly inside the directory, by file name.
    pub fn fragments(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| CoreError::io(&self.dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| CoreError::io(&self.dir, e))?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv && path.is_file() {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

impl RecordSource for CsvDirectorySource {
    fn records(&self) -> Result<Records> {
        let pending: VecDeque<PathBuf> = self.fragments()?.into();
        if pending.is_empty() {
            warn!(dir = %self.dir.display(), "no csv fragments found");
        }
        debug!(dir = %self.dir.display(), fragments = pending.len(), "reading fragments");
        Ok(Box::new(DirectoryRecords {
            pending,
            current: None,
            metrics: self.metrics.clone(),
            finished: false,
        }))
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}

fn open_csv(path: &Path, metrics: &MetricsRegistry) -> Result<FileRecords> {
    let file = File::open(path).map_err(|e| CoreError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers: Arc<[String]> = reader
        .headers()
        .map_err(|e| CoreError::csv(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    metrics.inc_files_opened(1);
    debug!(path = %path.display(), columns = headers.len(), "opened csv");
    Ok(FileRecords {
        path: path.to_path_buf(),
        headers,
        rows: reader.into_records(),
        metrics: metrics.clone(),
        finished: false,
    })
}

/// Rows of one open file. The handle is released when this is dropped.
struct FileRecords {
    path: PathBuf,
    headers: Arc<[String]>,
    rows: csv::StringRecordsIntoIter<File>,
    metrics: MetricsRegistry,
    finished: bool,
}

impl Iterator for FileRecords {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.rows.next()? {
            Ok(row) => {
                self.metrics.inc_records_read(1);
                let values = row.iter().map(Value::from).collect();
                Some(Ok(Record::new(Arc::clone(&self.headers), values)))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(CoreError::csv(&self.path, e)))
            }
        }
    }
}

/// Chains fragment files, holding at most one of them open.
struct DirectoryRecords {
    pending: VecDeque<PathBuf>,
    current: Option<FileRecords>,
    metrics: MetricsRegistry,
    finished: bool,
}

impl DirectoryRecords {
    fn fail(&mut self, err: CoreError) -> Option<Result<Record>> {
        self.current = None;
        self.pending.clear();
        self.finished = true;
        Some(Err(err))
    }
}

impl Iterator for DirectoryRecords {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if let Some(current) = self.current.as_mut() {
                match current.next() {
                    Some(Ok(record)) => return Some(Ok(record)),
                    Some(Err(e)) => return self.fail(e),
                    None => self.current = None,
                }
            }
            let path = self.pending.pop_front()?;
            match open_csv(&path, &self.metrics) {
                Ok(records) => self.current = Some(records),
                Err(e) => return self.fail(e),
            }
        }
    }
}
