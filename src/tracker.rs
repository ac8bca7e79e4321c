use crate::common::*;

pub(crate) use session::Session;

mod session;

/// Rendezvous service that records chunk locations and answers location
/// queries. Chunk bytes never pass through the tracker.
#[derive(Debug)]
pub(crate) struct Tracker {
  listener: TcpListener,
  registry: Arc<Registry>,
  events: Arc<EventLog>,
}

impl Tracker {
  pub(crate) fn bind(config: &TrackerConfig) -> Result<Self> {
    let listener = TcpListener::bind(config.address.as_str()).context(error::Bind {
      address: config.address.as_str(),
    })?;

    let events = EventLog::open(consts::TRACKER_EVENT_NAME, config.log_file.as_deref())?;

    Ok(Self {
      listener,
      registry: Arc::new(Registry::new(config.deduplicate)),
      events: Arc::new(events),
    })
  }

  pub(crate) fn local_addr(&self) -> Result<SocketAddr> {
    self.listener.local_addr().context(error::Network)
  }

  /// Accept connections forever, serving each on its own thread. A failed
  /// accept or session is logged and does not affect other sessions.
  pub(crate) fn run(self) -> Result<()> {
    info!("Tracker listening on {}", self.local_addr()?);

    loop {
      let (stream, address) = match self.listener.accept() {
        Ok(accepted) => accepted,
        Err(error) => {
          warn!("Failed to accept tracker connection: {}", error);
          continue;
        }
      };

      debug!("{} connected", address);

      let registry = self.registry.clone();
      let events = self.events.clone();

      thread::spawn(move || {
        let result = Session::new(stream, registry, events).and_then(Session::run);
        if let Err(error) = result {
          warn!("Session with {} failed: {}", address, error);
        }
      });
    }
  }

  #[cfg(test)]
  pub(crate) fn registry(&self) -> Arc<Registry> {
    self.registry.clone()
  }
}
