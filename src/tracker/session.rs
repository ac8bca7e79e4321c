use crate::common::*;

/// Command loop for one peer connected to the tracker.
pub(crate) struct Session {
  connection: Connection,
  registry: Arc<Registry>,
  events: Arc<EventLog>,
}

impl Session {
  pub(crate) fn new(
    stream: TcpStream,
    registry: Arc<Registry>,
    events: Arc<EventLog>,
  ) -> Result<Self> {
    Ok(Self {
      connection: Connection::new(stream).context(error::Network)?,
      registry,
      events,
    })
  }

  /// Serve commands until the peer disconnects. Malformed lines are logged
  /// and skipped. A reset connection ends the session like an orderly close.
  pub(crate) fn run(mut self) -> Result<()> {
    let peer = self.connection.peer();

    loop {
      let line = match self.connection.recv_line() {
        Ok(Some(line)) => line,
        Ok(None) => {
          debug!("{} disconnected", peer);
          return Ok(());
        }
        Err(Error::Network { source }) if source.kind() == io::ErrorKind::ConnectionReset => {
          debug!("{} reset the connection", peer);
          return Ok(());
        }
        Err(error) => return Err(error),
      };

      let line = line.trim();

      if line.is_empty() {
        continue;
      }

      match line.parse::<Message>() {
        Ok(message) => self.handle(message)?,
        Err(error) => warn!("{}: ignoring `{}`: {}", peer, line, error),
      }
    }
  }

  fn handle(&mut self, message: Message) -> Result<()> {
    let peer = self.connection.peer();

    match message {
      Message::LocalChunks { chunk, endpoint } => {
        info!("{}: {},{},{}", peer, Command::LocalChunks.name(), chunk, endpoint.wire_fields());
        self.registry.register(chunk, endpoint);
        Ok(())
      }
      Message::WhereChunk { chunk } => {
        let endpoints = self.registry.locate(chunk);

        let reply = if endpoints.is_empty() {
          Message::ChunkLocationUnknown { chunk }
        } else {
          Message::GetChunkFrom { chunk, endpoints }
        };

        debug!("{}: {}", peer, Message::WhereChunk { chunk });
        self.events.record(&reply);
        self.connection.send(&reply)
      }
      other => {
        warn!(
          "{}: ignoring `{}`, which is not a tracker command",
          peer,
          other.command().name()
        );
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use pretty_assertions::assert_eq;

  fn chunk(value: u64) -> ChunkId {
    ChunkId::new(value).unwrap()
  }

  #[test]
  fn registers_and_locates() {
    let registry = Arc::new(Registry::default());
    let (session, mut remote) = testing::session_pair(registry.clone());
    let handle = thread::spawn(move || session.run());

    remote
      .write_all(b"LOCAL_CHUNKS,3,hostx,5001\nWHERE_CHUNK,3\nWHERE_CHUNK,4\n")
      .unwrap();

    let mut reader = BufReader::new(remote.try_clone().unwrap());
    assert_eq!(testing::read_line(&mut reader), "GET_CHUNK_FROM,3,hostx,5001");
    assert_eq!(testing::read_line(&mut reader), "CHUNK_LOCATION_UNKNOWN,4");

    drop(reader);
    drop(remote);
    assert_matches!(handle.join().unwrap(), Ok(()));

    assert_eq!(
      registry.locate(chunk(3)),
      vec![PeerEndpoint::new("hostx", 5001)]
    );
  }

  #[test]
  fn malformed_lines_are_skipped() {
    let registry = Arc::new(Registry::default());
    let (session, mut remote) = testing::session_pair(registry.clone());
    let handle = thread::spawn(move || session.run());

    remote
      .write_all(
        b"garbage\nLOCAL_CHUNKS,3\nWHERE_CHUNK,zero\nREQUEST_CHUNK,1\n\nLOCAL_CHUNKS,2,hosty,5002\r\n",
      )
      .unwrap();
    remote.write_all(b"WHERE_CHUNK,2\n").unwrap();

    let mut reader = BufReader::new(remote.try_clone().unwrap());
    assert_eq!(testing::read_line(&mut reader), "GET_CHUNK_FROM,2,hosty,5002");

    drop(reader);
    drop(remote);
    assert_matches!(handle.join().unwrap(), Ok(()));

    assert!(registry.locate(chunk(3)).is_empty());
  }

  #[test]
  fn unterminated_final_line_is_processed() {
    let registry = Arc::new(Registry::default());
    let (session, mut remote) = testing::session_pair(registry.clone());
    let handle = thread::spawn(move || session.run());

    remote.write_all(b"LOCAL_CHUNKS,5,hostz,5003").unwrap();
    drop(remote);

    assert_matches!(handle.join().unwrap(), Ok(()));
    assert_eq!(
      registry.locate(chunk(5)),
      vec![PeerEndpoint::new("hostz", 5003)]
    );
  }
}
