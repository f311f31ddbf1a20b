//! Whole-file byte regions.
//!
//! [`FileRegion`] opens a data file and exposes its complete contents as one
//! contiguous read-only `&[u8]`. Two backing strategies sit behind the same
//! type: a memory map (`memmap2`, behind the `mmap` feature), where the OS
//! page cache serves the bytes and only touched pages are faulted in, and a
//! buffered read of the whole file into an owned `Vec<u8>`. Callers cannot
//! tell them apart beyond [`FileRegion::is_mapped`].
//!
//! The mapping or buffer is released when the region is dropped, on every exit
//! path of the code that owns it.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::DrillError;

/// How a [`FileRegion`] obtains the file's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrategy {
    /// Memory-map when the build supports it and the file is non-empty,
    /// otherwise read into a buffer.
    #[default]
    Auto,
    /// Always memory-map. Fails if the `mmap` feature is disabled.
    Mmap,
    /// Always read the whole file into an owned buffer.
    Buffered,
}

impl LoadStrategy {
    /// Returns true if this build can memory-map files.
    pub fn mmap_available() -> bool {
        cfg!(feature = "mmap")
    }

    /// Short lowercase name, as accepted by `--load`.
    pub fn name(&self) -> &'static str {
        match self {
            LoadStrategy::Auto => "auto",
            LoadStrategy::Mmap => "mmap",
            LoadStrategy::Buffered => "buffered",
        }
    }

    /// Parse a strategy name (`auto`, `mmap`, `buffered`), case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use driller::table::region::LoadStrategy;
    ///
    /// assert_eq!(LoadStrategy::parse("MMAP").unwrap(), LoadStrategy::Mmap);
    /// assert!(LoadStrategy::parse("stream").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DrillError> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(LoadStrategy::Auto),
            "mmap" => Ok(LoadStrategy::Mmap),
            "buffered" => Ok(LoadStrategy::Buffered),
            _ => Err(DrillError::Argument(format!(
                "Unknown load strategy '{}'. Use auto, mmap, or buffered.",
                s
            ))),
        }
    }
}

enum Backing {
    #[cfg(feature = "mmap")]
    Mapped(memmap2::Mmap),
    Buffered(Vec<u8>),
}

/// The complete, read-only contents of one data file.
///
/// A region is exclusively owned and not `Clone`. Byte slices borrowed from
/// it cannot outlive it, so the mapping can never be read after release.
pub struct FileRegion {
    path: PathBuf,
    backing: Backing,
}

impl FileRegion {
    /// Open `path` read-only and load its full contents.
    ///
    /// Fails with [`DrillError::FileRead`], carrying the path and OS error
    /// code, when the file cannot be opened, inspected, mapped, or read.
    ///
    /// # Safety of mapped regions
    ///
    /// Mapping is sound only while no other process truncates or rewrites
    /// the file. Legacy data files are treated as read-only snapshots, so
    /// this holds for the intended use; pass [`LoadStrategy::Buffered`] when
    /// the file may change underneath the reader.
    pub fn load<P: AsRef<Path>>(path: P, strategy: LoadStrategy) -> Result<Self, DrillError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| DrillError::file_read(path, &e))?;

        let file_size = file
            .metadata()
            .map_err(|e| DrillError::file_read(path, &e))?
            .len();

        // Empty files cannot be mapped on every platform; a zero-length
        // buffer behaves identically.
        let use_mmap = match strategy {
            LoadStrategy::Auto => LoadStrategy::mmap_available() && file_size > 0,
            LoadStrategy::Mmap => file_size > 0,
            LoadStrategy::Buffered => false,
        };

        let backing = if use_mmap {
            map_file(&file, path)?
        } else {
            let mut buf = Vec::with_capacity(file_size as usize);
            file.read_to_end(&mut buf)
                .map_err(|e| DrillError::file_read(path, &e))?;
            Backing::Buffered(buf)
        };

        let region = FileRegion {
            path: path.to_path_buf(),
            backing,
        };
        debug!(
            "Loaded {} ({} bytes, {})",
            path.display(),
            region.len(),
            if region.is_mapped() { "mapped" } else { "buffered" }
        );
        Ok(region)
    }

    /// Wrap an in-memory buffer as a region (used for tests and for data
    /// that did not come from a file).
    pub fn from_bytes(data: Vec<u8>) -> Self {
        FileRegion {
            path: PathBuf::from("<memory>"),
            backing: Backing::Buffered(data),
        }
    }

    /// The full contents, starting at file offset 0.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            #[cfg(feature = "mmap")]
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Buffered(buf) => buf.as_slice(),
        }
    }

    /// Total length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path the region was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the bytes are served by a memory map.
    pub fn is_mapped(&self) -> bool {
        match &self.backing {
            #[cfg(feature = "mmap")]
            Backing::Mapped(_) => true,
            Backing::Buffered(_) => false,
        }
    }
}

impl Drop for FileRegion {
    fn drop(&mut self) {
        trace!("Releasing region for {}", self.path.display());
    }
}

#[cfg(feature = "mmap")]
fn map_file(file: &File, path: &Path) -> Result<Backing, DrillError> {
    let mmap = unsafe { memmap2::Mmap::map(file).map_err(|e| DrillError::file_read(path, &e))? };
    Ok(Backing::Mapped(mmap))
}

#[cfg(not(feature = "mmap"))]
fn map_file(_file: &File, path: &Path) -> Result<Backing, DrillError> {
    Err(DrillError::Argument(format!(
        "Cannot memory-map {}: built without the `mmap` feature",
        path.display()
    )))
}
