use crate::common::*;

const FOLDER_HELP: &str = "Read the manifest `local_chunks.txt` and chunk files from `DIR`, and \
                           store fetched chunks there.";

const HOST_HELP: &str = "Serve chunks on `HOST`, and advertise it to the tracker.";

const LOG_FILE_HELP: &str = "Append protocol events to `FILE`, one `<NAME>,<event>` line each.";

const NAME_HELP: &str = "Identify this peer as `NAME` in log output.";

const POLL_INTERVAL_HELP: &str = "Wait `MILLISECONDS` between passes over missing chunks.";

const POLL_JITTER_HELP: &str =
  "Add a random delay of up to `MILLISECONDS` to each wait between passes.";

const TIMEOUT_HELP: &str =
  "Abandon a tracker or peer connection after `MILLISECONDS` without progress.";

const TRACKER_HELP: &str = "Contact the tracker at `HOST:PORT`.";

const TRANSFER_PORT_HELP: &str = "Serve chunks to other peers on `PORT`.";

#[derive(StructOpt, Debug)]
pub(crate) struct Share {
  #[structopt(
    long = "folder",
    value_name = "DIR",
    parse(from_os_str),
    help = FOLDER_HELP,
  )]
  folder: PathBuf,
  #[structopt(long = "transfer-port", value_name = "PORT", help = TRANSFER_PORT_HELP)]
  transfer_port: u16,
  #[structopt(long = "name", value_name = "NAME", help = NAME_HELP)]
  name: String,
  #[structopt(
    long = "tracker",
    value_name = "HOST:PORT",
    default_value = consts::DEFAULT_TRACKER_ADDRESS,
    help = TRACKER_HELP,
  )]
  tracker: String,
  #[structopt(
    long = "host",
    value_name = "HOST",
    default_value = consts::DEFAULT_PEER_HOST,
    help = HOST_HELP,
  )]
  host: String,
  #[structopt(
    long = "poll-interval",
    value_name = "MILLISECONDS",
    default_value = consts::DEFAULT_POLL_INTERVAL,
    parse(try_from_str = parse_milliseconds),
    help = POLL_INTERVAL_HELP,
  )]
  poll_interval: Duration,
  #[structopt(
    long = "poll-jitter",
    value_name = "MILLISECONDS",
    default_value = consts::DEFAULT_POLL_JITTER,
    parse(try_from_str = parse_milliseconds),
    help = POLL_JITTER_HELP,
  )]
  poll_jitter: Duration,
  #[structopt(
    long = "timeout",
    value_name = "MILLISECONDS",
    default_value = consts::DEFAULT_TIMEOUT,
    parse(try_from_str = parse_timeout),
    help = TIMEOUT_HELP,
  )]
  timeout: Duration,
  #[structopt(
    long = "log-file",
    value_name = "FILE",
    parse(from_os_str),
    help = LOG_FILE_HELP,
  )]
  log_file: Option<PathBuf>,
}

fn parse_milliseconds(text: &str) -> Result<Duration, ParseIntError> {
  text.parse().map(Duration::from_millis)
}

/// Socket timeouts cannot be zero, so a zero timeout is rejected here rather
/// than on every connection attempt.
fn parse_timeout(text: &str) -> Result<Duration> {
  let timeout = parse_milliseconds(text).context(error::MillisecondsParse { text })?;

  if timeout == Duration::from_millis(0) {
    return Err(Error::TimeoutZero);
  }

  Ok(timeout)
}

impl Share {
  pub(crate) fn run(self, options: &Options) -> Result<()> {
    Peer::new(self.config())?.run(options)
  }

  fn config(&self) -> PeerConfig {
    PeerConfig {
      folder: self.folder.clone(),
      name: self.name.clone(),
      host: self.host.clone(),
      transfer_port: self.transfer_port,
      tracker: self.tracker.clone(),
      poll_interval: self.poll_interval,
      poll_jitter: self.poll_jitter,
      timeout: self.timeout,
      log_file: self.log_file.clone(),
    }
  }
}
