use crate::common::*;

pub(crate) const ABOUT: &str = "Distribute a chunked file across a swarm of peers.";

pub(crate) const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

pub(crate) const DEFAULT_TRACKER_ADDRESS: &str = "localhost:5100";

pub(crate) const DEFAULT_PEER_HOST: &str = "localhost";

/// Milliseconds between acquisition passes.
pub(crate) const DEFAULT_POLL_INTERVAL: &str = "2000";

/// Upper bound, in milliseconds, of the random delay added to each poll.
pub(crate) const DEFAULT_POLL_JITTER: &str = "500";

/// Milliseconds before an unresponsive tracker or peer connection is abandoned.
pub(crate) const DEFAULT_TIMEOUT: &str = "10000";

/// Name under which tracker events are recorded in the event log.
pub(crate) const TRACKER_EVENT_NAME: &str = "P2PTracker";

pub(crate) const MANIFEST_FILENAME: &str = "local_chunks.txt";

pub(crate) const MANIFEST_TOTAL_MARKER: &str = "LASTCHUNK";

/// Largest chunk count a manifest may declare.
pub(crate) const MAX_CHUNKS: u64 = 1_000_000;

pub(crate) const CHUNK_FILENAME_PREFIX: &str = "chunk_";

pub(crate) const FIELD_SEPARATOR: char = ',';

pub(crate) const FRAME_DELIMITER: u8 = b'\n';

/// Longest command line accepted, excluding the delimiter.
pub(crate) const MAX_LINE_LENGTH: usize = 1024 * 1024;
