use crate::common::*;

use peer::{InFlight, Location, TrackerClient};

/// Outcome of a single attempt to fetch a chunk from one peer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Fetch {
  /// The chunk was downloaded and stored.
  Acquired,
  /// The chunk was already held or already being fetched.
  Skipped,
  /// The attempt failed and may be retried on a later pass.
  Failed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
  Registering,
  Acquiring { pass: u64 },
  Complete,
}

/// Drives a peer from its initial chunks to the complete file: announce what
/// is held, then repeatedly ask the tracker where missing chunks are and
/// fetch them from other peers, announcing each one as it arrives.
pub(crate) struct Acquirer {
  config: PeerConfig,
  store: Arc<Store>,
  endpoint: PeerEndpoint,
  in_flight: InFlight,
  unannounced: Mutex<BTreeSet<ChunkId>>,
  events: EventLog,
}

impl Acquirer {
  pub(crate) fn new(
    config: PeerConfig,
    store: Arc<Store>,
    endpoint: PeerEndpoint,
    events: EventLog,
  ) -> Self {
    Self {
      config,
      store,
      endpoint,
      in_flight: InFlight::default(),
      unannounced: Mutex::new(BTreeSet::new()),
      events,
    }
  }

  /// Run until every chunk is held and announced.
  pub(crate) fn run(&self) {
    let mut state = State::Registering;

    loop {
      state = match state {
        State::Registering => match self.register() {
          Ok(()) => State::Acquiring { pass: 1 },
          Err(error) => {
            warn!("{}: registration failed: {}", self.config.name, error);
            thread::sleep(self.config.poll_delay());
            State::Registering
          }
        },
        State::Acquiring { pass } => {
          if self.store.is_complete() {
            State::Complete
          } else {
            self.pass(pass);
            if self.store.is_complete() {
              State::Complete
            } else {
              thread::sleep(self.config.poll_delay());
              State::Acquiring { pass: pass + 1 }
            }
          }
        }
        State::Complete => {
          while !self.flush_announcements() {
            thread::sleep(self.config.poll_delay());
          }
          info!(
            "{}: all {} chunks acquired",
            self.config.name,
            self.store.total()
          );
          return;
        }
      };
    }
  }

  /// Announce every chunk held at startup over a single tracker connection.
  fn register(&self) -> Result<()> {
    let held = self.store.held();

    if held.is_empty() {
      return Ok(());
    }

    let mut tracker = self.tracker()?;

    for chunk in held {
      tracker.announce(chunk, &self.endpoint)?;
      self.events.record(self.local_chunks(chunk));
    }

    Ok(())
  }

  /// Ask the tracker about each missing chunk and try every peer it names
  /// until one delivers. A tracker failure abandons the rest of the pass.
  fn pass(&self, pass: u64) {
    let missing = self.store.missing();

    debug!(
      "{}: pass {}, {} of {} chunks missing",
      self.config.name,
      pass,
      missing.len(),
      self.store.total()
    );

    self.flush_announcements();

    let mut tracker = match self.tracker() {
      Ok(tracker) => tracker,
      Err(error) => {
        warn!("{}: skipping pass {}: {}", self.config.name, pass, error);
        return;
      }
    };

    for chunk in missing {
      if self.store.contains(chunk) {
        continue;
      }

      self.events.record(Message::WhereChunk { chunk });

      let endpoints = match tracker.locate(chunk) {
        Ok(Location::Known(endpoints)) => endpoints,
        Ok(Location::Unknown) => {
          debug!("{}: no known source for chunk {}", self.config.name, chunk);
          continue;
        }
        Err(error) => {
          warn!("{}: abandoning pass {}: {}", self.config.name, pass, error);
          return;
        }
      };

      for endpoint in endpoints {
        if self.store.contains(chunk) {
          break;
        }

        if endpoint == self.endpoint {
          continue;
        }

        self.fetch(chunk, &endpoint);
      }
    }
  }

  /// Fetch `chunk` from `endpoint`, store it, and announce it to the
  /// tracker before returning. Does nothing if the chunk is already held or
  /// another fetch of it is in progress. Failures are logged, not returned.
  pub(crate) fn fetch(&self, chunk: ChunkId, endpoint: &PeerEndpoint) -> Fetch {
    if self.store.contains(chunk) {
      return Fetch::Skipped;
    }

    let _claim = match self.in_flight.claim(chunk) {
      Some(claim) => claim,
      None => return Fetch::Skipped,
    };

    if self.store.contains(chunk) {
      return Fetch::Skipped;
    }

    let stored = self
      .download(chunk, endpoint)
      .and_then(|bytes| self.store.insert(chunk, &bytes));

    match stored {
      Ok(true) => {}
      Ok(false) => return Fetch::Skipped,
      Err(error) => {
        if error.is_transient() {
          warn!("{}: fetching chunk {} failed: {}", self.config.name, chunk, error);
        } else {
          log::error!("{}: fetching chunk {} failed: {}", self.config.name, chunk, error);
        }
        return Fetch::Failed;
      }
    }

    if let Err(error) = self.announce(chunk) {
      warn!(
        "{}: announcing chunk {} failed, will retry: {}",
        self.config.name, chunk, error
      );
      self.unannounced().insert(chunk);
    }

    Fetch::Acquired
  }

  fn download(&self, chunk: ChunkId, endpoint: &PeerEndpoint) -> Result<Vec<u8>> {
    let mut connection = endpoint.connect(self.config.timeout)?;

    connection.send(&Message::RequestChunk { chunk })?;
    connection.finish()?;

    self.events.record(format!(
      "{}{}{}",
      Message::RequestChunk { chunk },
      consts::FIELD_SEPARATOR,
      endpoint.wire_fields()
    ));

    let bytes = connection.recv_to_end()?;

    if bytes.is_empty() {
      return Err(Error::ChunkEmpty {
        chunk,
        endpoint: endpoint.clone(),
      });
    }

    debug!(
      "{}: received {} bytes of chunk {} from {}",
      self.config.name,
      bytes.len(),
      chunk,
      endpoint
    );

    Ok(bytes)
  }

  fn announce(&self, chunk: ChunkId) -> Result<()> {
    self.tracker()?.announce(chunk, &self.endpoint)?;
    self.events.record(self.local_chunks(chunk));
    Ok(())
  }

  /// Retry announcements that failed after their chunk was stored. Returns
  /// true once none remain.
  fn flush_announcements(&self) -> bool {
    let pending = self.unannounced().clone();

    if pending.is_empty() {
      return true;
    }

    let result = self.tracker().and_then(|mut tracker| {
      for chunk in pending {
        tracker.announce(chunk, &self.endpoint)?;
        self.events.record(self.local_chunks(chunk));
        self.unannounced().remove(&chunk);
      }
      Ok(())
    });

    match result {
      Ok(()) => true,
      Err(error) => {
        warn!("{}: retrying announcements failed: {}", self.config.name, error);
        false
      }
    }
  }

  fn tracker(&self) -> Result<TrackerClient> {
    TrackerClient::connect(&self.config.tracker, self.config.timeout)
  }

  fn local_chunks(&self, chunk: ChunkId) -> Message {
    Message::LocalChunks {
      chunk,
      endpoint: self.endpoint.clone(),
    }
  }

  fn unannounced(&self) -> std::sync::MutexGuard<BTreeSet<ChunkId>> {
    self
      .unannounced
      .lock()
      .invariant_unwrap("announcement lock is never held across a panic")
  }
}
