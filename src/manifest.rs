use crate::common::*;

/// Contents of a peer's `local_chunks.txt`: one `<chunk>,<filename>` line per
/// chunk held at startup, and a single `<total>,LASTCHUNK` line declaring how
/// many chunks make up the complete file.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Manifest {
  pub(crate) total: u64,
  pub(crate) chunks: BTreeMap<ChunkId, String>,
}

impl Manifest {
  pub(crate) fn load(folder: &Path) -> Result<Self> {
    let path = folder.join(consts::MANIFEST_FILENAME);
    let text = fs::read_to_string(&path).context(error::ManifestRead { path: &path })?;
    Self::parse(&path, &text)
  }

  fn parse(path: &Path, text: &str) -> Result<Self> {
    let mut total = None;
    let mut chunks = BTreeMap::new();

    for (index, line) in text.lines().enumerate() {
      let line_number = index + 1;
      let line = line.trim();

      if line.is_empty() {
        continue;
      }

      let malformed = || Error::ManifestEntry {
        path: path.to_owned(),
        line_number,
        line: line.to_owned(),
      };

      let mut fields = line.splitn(2, consts::FIELD_SEPARATOR);
      let (number, filename) = match (fields.next(), fields.next()) {
        (Some(number), Some(filename)) if !filename.trim().is_empty() => {
          (number.trim(), filename.trim())
        }
        _ => return Err(malformed()),
      };

      if filename == consts::MANIFEST_TOTAL_MARKER {
        if total.is_some() {
          return Err(malformed());
        }
        total = Some(number.parse::<u64>().map_err(|_| malformed())?);
        continue;
      }

      let chunk = number.parse::<ChunkId>().map_err(|_| malformed())?;

      if chunks.insert(chunk, filename.to_owned()).is_some() {
        return Err(Error::ManifestDuplicate {
          path: path.to_owned(),
          chunk,
          line_number,
        });
      }
    }

    let total = total.ok_or_else(|| Error::ManifestTotalMissing {
      path: path.to_owned(),
    })?;

    if total > consts::MAX_CHUNKS {
      return Err(Error::ManifestTotalTooLarge {
        path: path.to_owned(),
        total,
        max: consts::MAX_CHUNKS,
      });
    }

    Ok(Self { total, chunks })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use pretty_assertions::assert_eq;

  fn parse(text: &str) -> Result<Manifest> {
    Manifest::parse(Path::new("local_chunks.txt"), text)
  }

  #[test]
  fn entries_and_total() {
    let manifest = parse("1,chunk_1\n3,part three.bin\n\n5,LASTCHUNK\n").unwrap();

    assert_eq!(manifest.total, 5);
    assert_eq!(
      manifest.chunks.into_iter().collect::<Vec<(ChunkId, String)>>(),
      vec![
        (ChunkId::new(1).unwrap(), "chunk_1".to_owned()),
        (ChunkId::new(3).unwrap(), "part three.bin".to_owned()),
      ]
    );
  }

  #[test]
  fn total_may_precede_entries() {
    let manifest = parse("2,LASTCHUNK\r\n2,b\r\n").unwrap();
    assert_eq!(manifest.total, 2);
    assert_eq!(manifest.chunks.len(), 1);
  }

  #[test]
  fn no_local_chunks() {
    let manifest = parse("4,LASTCHUNK").unwrap();
    assert_eq!(manifest.total, 4);
    assert!(manifest.chunks.is_empty());
  }

  #[test]
  fn missing_total() {
    assert_matches!(parse("1,chunk_1\n"), Err(Error::ManifestTotalMissing { .. }));
  }

  #[test]
  fn total_too_large() {
    assert_matches!(
      parse("18446744073709551615,LASTCHUNK\n"),
      Err(Error::ManifestTotalTooLarge { .. })
    );
    assert_matches!(
      parse("1000001,LASTCHUNK\n"),
      Err(Error::ManifestTotalTooLarge { total: 1_000_001, .. })
    );
    assert_eq!(parse("1000000,LASTCHUNK\n").unwrap().total, 1_000_000);
  }

  #[test]
  fn malformed_entries() {
    assert_matches!(
      parse("1,chunk_1\nchunk_2\n2,LASTCHUNK\n"),
      Err(Error::ManifestEntry { line_number: 2, .. })
    );
    assert_matches!(
      parse("0,chunk_0\n2,LASTCHUNK\n"),
      Err(Error::ManifestEntry { line_number: 1, .. })
    );
    assert_matches!(
      parse("1,\n2,LASTCHUNK\n"),
      Err(Error::ManifestEntry { line_number: 1, .. })
    );
    assert_matches!(
      parse("two,LASTCHUNK\n"),
      Err(Error::ManifestEntry { line_number: 1, .. })
    );
    assert_matches!(
      parse("2,LASTCHUNK\n3,LASTCHUNK\n"),
      Err(Error::ManifestEntry { line_number: 2, .. })
    );
  }

  #[test]
  fn duplicate_chunk() {
    assert_matches!(
      parse("1,a\n1,b\n2,LASTCHUNK\n"),
      Err(Error::ManifestDuplicate { line_number: 2, .. })
    );
  }

  #[test]
  fn load_missing_file() {
    let dir = TempDir::new().unwrap();
    assert_matches!(Manifest::load(dir.path()), Err(Error::ManifestRead { .. }));
  }

  #[test]
  fn load() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("local_chunks.txt"), "2,chunk_2\n2,LASTCHUNK\n").unwrap();
    let manifest = Manifest::load(dir.path()).unwrap();
    assert_eq!(manifest.total, 2);
    assert!(manifest.chunks.contains_key(&ChunkId::new(2).unwrap()));
  }
}
