use crate::common::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum Error {
  #[snafu(display("Failed to bind listener on `{}`: {}", address, source))]
  Bind { address: String, source: io::Error },
  #[snafu(display("Chunk {} from peer `{}` was empty", chunk, endpoint))]
  ChunkEmpty {
    chunk: ChunkId,
    endpoint: PeerEndpoint,
  },
  #[snafu(display("Invalid chunk id `{}`: {}", text, source))]
  ChunkIdParse { text: String, source: ParseIntError },
  #[snafu(display("Invalid chunk id `{}`: chunk ids start at 1", text))]
  ChunkIdZero { text: String },
  #[snafu(display("Failed to read chunk from `{}`: {}", path.display(), source))]
  ChunkRead { path: PathBuf, source: io::Error },
  #[snafu(display("Failed to write chunk to `{}`: {}", path.display(), source))]
  ChunkWrite { path: PathBuf, source: io::Error },
  #[snafu(display("{}", source))]
  Clap { source: structopt::clap::Error },
  #[snafu(display("Failed to open event log `{}`: {}", path.display(), source))]
  EventLogOpen { path: PathBuf, source: io::Error },
  #[snafu(display("Line exceeds {} bytes without a newline", limit))]
  LineTooLong { limit: usize },
  #[snafu(display(
    "Manifest `{}` lists chunk {} more than once (line {})",
    path.display(),
    chunk,
    line_number
  ))]
  ManifestDuplicate {
    path: PathBuf,
    chunk: ChunkId,
    line_number: usize,
  },
  #[snafu(display(
    "Malformed entry on line {} of manifest `{}`: `{}`",
    line_number,
    path.display(),
    line
  ))]
  ManifestEntry {
    path: PathBuf,
    line_number: usize,
    line: String,
  },
  #[snafu(display("Failed to read manifest `{}`: {}", path.display(), source))]
  ManifestRead { path: PathBuf, source: io::Error },
  #[snafu(display("Manifest `{}` has no `LASTCHUNK` entry", path.display()))]
  ManifestTotalMissing { path: PathBuf },
  #[snafu(display(
    "Manifest `{}` declares {} chunks, more than the maximum of {}",
    path.display(),
    total,
    max
  ))]
  ManifestTotalTooLarge { path: PathBuf, total: u64, max: u64 },
  #[snafu(display("Empty message"))]
  MessageEmpty,
  #[snafu(display(
    "`{}` message has {} fields, expected {}",
    command,
    actual,
    expected
  ))]
  MessageFieldCount {
    command: &'static str,
    expected: usize,
    actual: usize,
  },
  #[snafu(display("`GET_CHUNK_FROM` message has an incomplete endpoint list: `{}`", line))]
  MessageEndpointList { line: String },
  #[snafu(display("Unknown command `{}`", command))]
  MessageUnknownCommand { command: String },
  #[snafu(display("Invalid number of milliseconds `{}`: {}", text, source))]
  MillisecondsParse { text: String, source: ParseIntError },
  #[snafu(display("Network error: {}", source))]
  Network { source: io::Error },
  #[snafu(display("Failed to connect to peer `{}`: {}", endpoint, source))]
  PeerConnect {
    endpoint: PeerEndpoint,
    source: io::Error,
  },
  #[snafu(display("Invalid port `{}`: {}", text, source))]
  PortParse { text: String, source: ParseIntError },
  #[snafu(display("Chunk responder thread panicked"))]
  ResponderPanic,
  #[snafu(display("Timeout must be at least one millisecond"))]
  TimeoutZero,
  #[snafu(display("Tracker `{}` closed the connection", address))]
  TrackerClosed { address: String },
  #[snafu(display("Failed to connect to tracker `{}`: {}", address, source))]
  TrackerConnect { address: String, source: io::Error },
  #[snafu(display("Unexpected tracker response to `WHERE_CHUNK,{}`: `{}`", chunk, response))]
  TrackerResponse { chunk: ChunkId, response: Message },
}

impl Error {
  /// Errors a long-running loop logs and survives, as opposed to ones that
  /// abort process startup.
  pub(crate) fn is_transient(&self) -> bool {
    matches!(
      self,
      Self::ChunkEmpty { .. }
        | Self::LineTooLong { .. }
        | Self::Network { .. }
        | Self::PeerConnect { .. }
        | Self::TrackerClosed { .. }
        | Self::TrackerConnect { .. }
        | Self::TrackerResponse { .. }
    )
  }
}
