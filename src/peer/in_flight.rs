use crate::common::*;

/// Chunks currently being fetched. Holding a `Claim` is the only way to
/// fetch a chunk, so the same chunk is never requested twice at once.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
  chunks: Mutex<BTreeSet<ChunkId>>,
}

impl InFlight {
  /// Claim `chunk`, or `None` if it is already claimed. The claim is
  /// released when dropped, whether or not the fetch succeeded.
  pub(crate) fn claim(&self, chunk: ChunkId) -> Option<Claim> {
    if self.chunks().insert(chunk) {
      Some(Claim {
        in_flight: self,
        chunk,
      })
    } else {
      None
    }
  }

  #[cfg(test)]
  pub(crate) fn contains(&self, chunk: ChunkId) -> bool {
    self.chunks().contains(&chunk)
  }

  fn chunks(&self) -> std::sync::MutexGuard<BTreeSet<ChunkId>> {
    self
      .chunks
      .lock()
      .invariant_unwrap("in-flight lock is never held across a panic")
  }
}

#[derive(Debug)]
pub(crate) struct Claim<'a> {
  in_flight: &'a InFlight,
  chunk: ChunkId,
}

impl<'a> Drop for Claim<'a> {
  fn drop(&mut self) {
    self.in_flight.chunks().remove(&self.chunk);
  }
}
