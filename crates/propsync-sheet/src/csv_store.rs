//! Workbook stored as a directory of CSV files, one per collection.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{SheetError, SheetResult};
use crate::layout::{CollectionKind, RowLayout};
use crate::store::TabularStore;
use crate::workbook::{Collection, Workbook};

/// CSV-backed [`TabularStore`].
///
/// `dir/Sites.csv`, `dir/Admins.csv` and `dir/Groups.csv` must all exist.
/// Saving rewrites each file through a temporary file in the same directory
/// so a failed save never leaves a half-written collection behind.
#[derive(Debug)]
pub struct CsvWorkbookStore {
    dir: PathBuf,
    workbook: Workbook,
}

impl CsvWorkbookStore {
    /// Load all three collections from `dir`.
    pub fn open(dir: impl AsRef<Path>) -> SheetResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(SheetError::io(
                &dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let workbook = Workbook {
            sites: load(&dir)?,
            admins: load(&dir)?,
            groups: load(&dir)?,
        };
        info!(
            path = %dir.display(),
            sites = workbook.sites.len(),
            admins = workbook.admins.len(),
            groups = workbook.groups.len(),
            "Loaded workbook"
        );

        Ok(Self { dir, workbook })
    }

    /// Directory the workbook is read from and written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, kind: CollectionKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}

impl TabularStore for CsvWorkbookStore {
    fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    fn persist(&mut self) -> SheetResult<()> {
        write_atomic(&self.dir, &self.path_of(CollectionKind::Sites), &self.workbook.sites)?;
        write_atomic(&self.dir, &self.path_of(CollectionKind::Admins), &self.workbook.admins)?;
        write_atomic(&self.dir, &self.path_of(CollectionKind::Groups), &self.workbook.groups)?;
        debug!(path = %self.dir.display(), "Persisted workbook");
        Ok(())
    }
}

fn load<T: RowLayout>(dir: &Path) -> SheetResult<Collection<T>> {
    let path = dir.join(T::KIND.file_name());
    if !path.is_file() {
        return Err(SheetError::MissingCollection(format!(
            "{} ({})",
            T::KIND,
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .map_err(|e| SheetError::csv(&path, e))?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| SheetError::csv(&path, e))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    debug!(collection = %T::KIND, rows = rows.len(), "Read collection");

    Ok(Collection::from_rows(rows))
}

fn write_atomic<T: RowLayout>(dir: &Path, path: &Path, collection: &Collection<T>) -> SheetResult<()> {
    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| SheetError::io(dir, e))?;
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(tmp.as_file());
        for row in collection.to_rows() {
            writer
                .write_record(&row)
                .map_err(|e| SheetError::csv(path, e))?;
        }
        writer
            .flush()
            .map_err(|e| SheetError::io(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| SheetError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| SheetError::io(path, e.error))?;
    Ok(())
}

