use crate::common::*;

const ADDRESS_HELP: &str = "Listen for peers on `HOST:PORT`.";

const DEDUPLICATE_HELP: &str =
  "List each peer at most once per chunk, even if it announces the chunk repeatedly. By \
   default every announcement is recorded.";

const LOG_FILE_HELP: &str =
  "Append location replies to `FILE`, one `P2PTracker,<reply>` line each.";

#[derive(StructOpt, Debug)]
pub(crate) struct Track {
  #[structopt(
    long = "address",
    value_name = "HOST:PORT",
    default_value = consts::DEFAULT_TRACKER_ADDRESS,
    help = ADDRESS_HELP,
  )]
  address: String,
  #[structopt(long = "deduplicate", help = DEDUPLICATE_HELP)]
  deduplicate: bool,
  #[structopt(
    long = "log-file",
    value_name = "FILE",
    parse(from_os_str),
    help = LOG_FILE_HELP,
  )]
  log_file: Option<PathBuf>,
}

impl Track {
  pub(crate) fn run(self, options: &Options) -> Result<()> {
    let tracker = Tracker::bind(&self.config())?;

    if !options.quiet {
      println!("Tracker running on {}", tracker.local_addr()?);
    }

    tracker.run()
  }

  fn config(&self) -> TrackerConfig {
    TrackerConfig {
      address: self.address.clone(),
      deduplicate: self.deduplicate,
      log_file: self.log_file.clone(),
    }
  }
}
