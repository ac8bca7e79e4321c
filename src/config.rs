use crate::common::*;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrackerConfig {
  pub(crate) address: String,
  pub(crate) deduplicate: bool,
  /// File that protocol events are appended to.
  pub(crate) log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PeerConfig {
  /// Directory holding the manifest and chunk files.
  pub(crate) folder: PathBuf,
  pub(crate) name: String,
  /// Host the responder binds to and advertises to the tracker.
  pub(crate) host: String,
  pub(crate) transfer_port: u16,
  pub(crate) tracker: String,
  pub(crate) poll_interval: Duration,
  pub(crate) poll_jitter: Duration,
  pub(crate) timeout: Duration,
  pub(crate) log_file: Option<PathBuf>,
}

impl PeerConfig {
  /// Delay before the next acquisition pass: the poll interval plus a random
  /// share of the jitter.
  pub(crate) fn poll_delay(&self) -> Duration {
    let jitter = self.poll_jitter.as_millis() as u64;

    if jitter == 0 {
      return self.poll_interval;
    }

    self.poll_interval + Duration::from_millis(rand::thread_rng().gen_range(0, jitter))
  }
}
