use crate::common::*;

/// Tracker-side record of which peers hold which chunks. Endpoints are kept
/// in registration order. Unless deduplication is enabled, a peer that
/// announces the same chunk twice is listed twice.
#[derive(Debug, Default)]
pub(crate) struct Registry {
  deduplicate: bool,
  chunks: RwLock<HashMap<ChunkId, Vec<PeerEndpoint>>>,
}

impl Registry {
  pub(crate) fn new(deduplicate: bool) -> Self {
    Self {
      deduplicate,
      chunks: RwLock::new(HashMap::new()),
    }
  }

  pub(crate) fn register(&self, chunk: ChunkId, endpoint: PeerEndpoint) {
    let mut chunks = self
      .chunks
      .write()
      .invariant_unwrap("registry lock is never held across a panic");

    let holders = chunks.entry(chunk).or_insert_with(Vec::new);

    if self.deduplicate && holders.contains(&endpoint) {
      return;
    }

    holders.push(endpoint);
  }

  pub(crate) fn locate(&self, chunk: ChunkId) -> Vec<PeerEndpoint> {
    self
      .chunks
      .read()
      .invariant_unwrap("registry lock is never held across a panic")
      .get(&chunk)
      .cloned()
      .unwrap_or_default()
  }
}
