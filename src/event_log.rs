use crate::common::*;

/// Protocol events of one tracker or peer process. Every event is logged,
/// and when a log file is configured it is also appended there as a
/// `<name>,<event>` line.
#[derive(Debug)]
pub(crate) struct EventLog {
  name: String,
  file: Option<Mutex<File>>,
}

impl EventLog {
  pub(crate) fn open(name: &str, path: Option<&Path>) -> Result<Self> {
    let file = match path {
      Some(path) => {
        let file = fs::OpenOptions::new()
          .create(true)
          .append(true)
          .open(path)
          .context(error::EventLogOpen { path })?;
        Some(Mutex::new(file))
      }
      None => None,
    };

    Ok(Self {
      name: name.to_owned(),
      file,
    })
  }

  pub(crate) fn disabled(name: &str) -> Self {
    Self {
      name: name.to_owned(),
      file: None,
    }
  }

  pub(crate) fn record(&self, event: impl Display) {
    info!("{}: {}", self.name, event);

    if let Some(file) = &self.file {
      let mut file = file
        .lock()
        .invariant_unwrap("event log lock is never held across a panic");

      if let Err(error) = writeln!(file, "{},{}", self.name, event) {
        warn!("{}: failed to write event log: {}", self.name, error);
      }
    }
  }
}
