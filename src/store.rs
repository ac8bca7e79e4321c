use crate::common::*;

/// Chunks a peer can serve, backed by files in the peer's folder, and the
/// number of chunks that make up the complete file.
///
/// Entries are only ever added. A chunk's file is fully written before the
/// chunk becomes visible, so readers never observe a partial blob.
#[derive(Debug)]
pub(crate) struct Store {
  folder: PathBuf,
  total: u64,
  chunks: RwLock<BTreeMap<ChunkId, PathBuf>>,
}

impl Store {
  pub(crate) fn new(folder: PathBuf, manifest: Manifest) -> Self {
    let chunks = manifest
      .chunks
      .into_iter()
      .map(|(chunk, filename)| (chunk, folder.join(filename)))
      .collect();

    Self {
      folder,
      total: manifest.total,
      chunks: RwLock::new(chunks),
    }
  }

  pub(crate) fn open(folder: &Path) -> Result<Self> {
    let manifest = Manifest::load(folder)?;

    for chunk in manifest.chunks.keys() {
      if chunk.value() > manifest.total {
        warn!(
          "Manifest in `{}` lists chunk {}, beyond the last chunk {}",
          folder.display(),
          chunk,
          manifest.total
        );
      }
    }

    Ok(Self::new(folder.to_owned(), manifest))
  }

  pub(crate) fn total(&self) -> u64 {
    self.total
  }

  pub(crate) fn contains(&self, chunk: ChunkId) -> bool {
    self.chunks().contains_key(&chunk)
  }

  /// Chunks held, in ascending order.
  pub(crate) fn held(&self) -> Vec<ChunkId> {
    self.chunks().keys().copied().collect()
  }

  /// Chunks of the complete file not yet held, in ascending order.
  pub(crate) fn missing(&self) -> Vec<ChunkId> {
    let chunks = self.chunks();
    ChunkId::all(self.total)
      .filter(|chunk| !chunks.contains_key(chunk))
      .collect()
  }

  pub(crate) fn is_complete(&self) -> bool {
    let chunks = self.chunks();
    ChunkId::all(self.total).all(|chunk| chunks.contains_key(&chunk))
  }

  /// Contents of `chunk`, or `None` if it is not held.
  pub(crate) fn read(&self, chunk: ChunkId) -> Result<Option<Vec<u8>>> {
    let path = match self.chunks().get(&chunk) {
      Some(path) => path.clone(),
      None => return Ok(None),
    };

    let bytes = fs::read(&path).context(error::ChunkRead { path })?;

    Ok(Some(bytes))
  }

  /// Persist `bytes` as `chunk`. Returns false, leaving the existing entry
  /// untouched, if the chunk is already held.
  ///
  /// The chunk is written to `chunk_N` unless the manifest assigned that
  /// file to another chunk, in which case it gets a fresh name in the same
  /// folder. Files backing held chunks are never overwritten.
  pub(crate) fn insert(&self, chunk: ChunkId, bytes: &[u8]) -> Result<bool> {
    if self.contains(chunk) {
      return Ok(false);
    }

    let mut chunks = self
      .chunks
      .write()
      .invariant_unwrap("store lock is never held across a panic");

    if chunks.contains_key(&chunk) {
      return Ok(false);
    }

    let preferred = self.folder.join(chunk.filename());

    let path = if chunks.values().any(|path| *path == preferred) {
      self.write_unique(chunk, bytes)?
    } else {
      fs::write(&preferred, bytes).context(error::ChunkWrite { path: &preferred })?;
      preferred
    };

    chunks.insert(chunk, path);

    Ok(true)
  }

  fn write_unique(&self, chunk: ChunkId, bytes: &[u8]) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
      .prefix(&format!("{}.", chunk.filename()))
      .tempfile_in(&self.folder)
      .context(error::ChunkWrite { path: &self.folder })?;

    file.write_all(bytes).context(error::ChunkWrite { path: file.path() })?;

    let (_, path) = file.keep().map_err(|persist| Error::ChunkWrite {
      path: persist.file.path().to_owned(),
      source: persist.error,
    })?;

    Ok(path)
  }

  fn chunks(&self) -> std::sync::RwLockReadGuard<BTreeMap<ChunkId, PathBuf>> {
    self
      .chunks
      .read()
      .invariant_unwrap("store lock is never held across a panic")
  }
}
