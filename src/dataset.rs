use crate::error::{Result, TransferError};
use crate::table::RawTable;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A named set of tables, keyed by file name such as `transfers.csv`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    tables: BTreeMap<String, RawTable>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, table: RawTable) {
        self.tables.insert(name.into(), table);
    }

    pub fn table(&self, name: &str) -> Result<&RawTable> {
        self.tables
            .get(name)
            .ok_or_else(|| TransferError::DatasetTableMissing(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|k| k.as_str())
    }
}

/// Given a key, returns a named set of tabular datasets.
pub trait DatasetProvider {
    fn load(&self, key: &str) -> Result<Dataset>;
}

/// Reads CSV files from a local directory. The key selects a subdirectory of `root`
/// when one exists, otherwise `root` itself is read.
pub struct DirectoryProvider {
    root: PathBuf,
    only: Option<Vec<String>>,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            only: None,
        }
    }

    /// Restrict loading to the named files.
    pub fn with_tables(mut self, names: &[&str]) -> Self {
        self.only = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    fn resolve_dir(&self, key: &str) -> PathBuf {
        let keyed = self.root.join(key);
        if !key.is_empty() && keyed.is_dir() {
            keyed
        } else {
            self.root.clone()
        }
    }

    fn wanted(&self, name: &str) -> bool {
        match &self.only {
            Some(only) => only.iter().any(|n| n == name),
            None => true,
        }
    }

    fn read_table(path: &Path) -> Result<RawTable> {
        let file = File::open(path)?;
        RawTable::from_csv_reader(BufReader::new(file))
    }
}

impl DatasetProvider for DirectoryProvider {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self, key: &str) -> Result<Dataset> {
        let dir = self.resolve_dir(key);
        let mut names: Vec<String> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|e| e == "csv").unwrap_or(false))
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .filter(|name| self.wanted(name))
            .collect();
        names.sort();

        let mut dataset = Dataset::new();
        for name in names {
            let table = Self::read_table(&dir.join(&name))?;
            debug!("Loaded {} with {} rows", name, table.rows.len());
            dataset.insert(name, table);
        }
        info!("Loaded {} tables from {}", dataset.tables.len(), dir.display());
        Ok(dataset)
    }
}

/// Loads the dataset once and hands out the same snapshot afterwards.
pub struct CachedDataset<P: DatasetProvider> {
    provider: P,
    key: String,
    cell: OnceCell<Arc<Dataset>>,
}

impl<P: DatasetProvider> CachedDataset<P> {
    pub fn new(provider: P, key: impl Into<String>) -> Self {
        Self {
            provider,
            key: key.into(),
            cell: OnceCell::new(),
        }
    }

    /// A failed load is not cached; the next call tries again.
    pub fn get(&self) -> Result<Arc<Dataset>> {
        self.cell
            .get_or_try_init(|| self.provider.load(&self.key).map(Arc::new))
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
