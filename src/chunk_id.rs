use crate::common::*;

/// Identity of one chunk of the shared file. Chunk ids are dense and start at
/// 1, so a swarm with `n` chunks uses exactly the ids `1..=n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ChunkId(u64);

impl ChunkId {
  pub(crate) fn new(value: u64) -> Option<Self> {
    if value == 0 {
      None
    } else {
      Some(Self(value))
    }
  }

  /// All chunk ids of a swarm with `total` chunks, in ascending order.
  pub(crate) fn all(total: u64) -> impl Iterator<Item = ChunkId> {
    (1..=total).map(Self)
  }

  pub(crate) fn value(self) -> u64 {
    self.0
  }

  pub(crate) fn filename(self) -> String {
    format!("{}{}", consts::CHUNK_FILENAME_PREFIX, self.0)
  }
}

impl FromStr for ChunkId {
  type Err = Error;

  fn from_str(text: &str) -> Result<Self> {
    let value = text
      .trim()
      .parse::<u64>()
      .context(error::ChunkIdParse { text })?;

    Self::new(value).ok_or_else(|| Error::ChunkIdZero { text: text.into() })
  }
}

impl Display for ChunkId {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
