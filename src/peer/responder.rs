use crate::common::*;

/// Serves chunks to other peers, one request per connection. A held chunk is
/// written in full and the connection closed; a request for anything else
/// is closed without a reply.
pub(crate) struct Responder {
  listener: TcpListener,
  store: Arc<Store>,
  timeout: Duration,
  name: String,
}

impl Responder {
  pub(crate) fn bind(config: &PeerConfig, store: Arc<Store>) -> Result<Self> {
    let address = format!("{}:{}", config.host, config.transfer_port);

    let listener = TcpListener::bind(address.as_str()).context(error::Bind { address })?;

    Ok(Self {
      listener,
      store,
      timeout: config.timeout,
      name: config.name.clone(),
    })
  }

  pub(crate) fn local_addr(&self) -> Result<SocketAddr> {
    self.listener.local_addr().context(error::Network)
  }

  pub(crate) fn spawn(self) -> thread::JoinHandle<Result<()>> {
    thread::spawn(move || self.run())
  }

  pub(crate) fn run(self) -> Result<()> {
    info!("{}: serving chunks on {}", self.name, self.local_addr()?);

    loop {
      let (stream, address) = match self.listener.accept() {
        Ok(accepted) => accepted,
        Err(error) => {
          warn!("{}: failed to accept chunk request: {}", self.name, error);
          continue;
        }
      };

      let store = self.store.clone();
      let timeout = self.timeout;
      let name = self.name.clone();

      thread::spawn(move || {
        if let Err(error) = Self::serve(stream, &store, timeout, &name) {
          warn!("{}: serving {} failed: {}", name, address, error);
        }
      });
    }
  }

  fn serve(stream: TcpStream, store: &Store, timeout: Duration, name: &str) -> Result<()> {
    let mut connection = Connection::new(stream).context(error::Network)?;
    connection.set_timeout(timeout)?;

    let peer = connection.peer();

    let chunk = match connection.recv()? {
      Some(Message::RequestChunk { chunk }) => chunk,
      Some(other) => {
        warn!(
          "{}: ignoring `{}` from {}, expected `{}`",
          name,
          other.command().name(),
          peer,
          Command::RequestChunk.name()
        );
        return Ok(());
      }
      None => return Ok(()),
    };

    match store.read(chunk)? {
      Some(bytes) => {
        connection.write_all(&bytes)?;
        info!("{}: sent chunk {} ({} bytes) to {}", name, chunk, bytes.len(), peer);
      }
      None => info!("{}: {} requested chunk {}, which is not held", name, peer, chunk),
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use pretty_assertions::assert_eq;

  fn request(endpoint: &PeerEndpoint, line: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(endpoint.to_string()).unwrap();
    stream.write_all(line).unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    response
  }

  #[test]
  fn serves_held_chunk() {
    let payload = (0..=255).cycle().take(100_000).collect::<Vec<u8>>();
    let (_dir, store) = testing::store_bytes(vec![(3, payload.clone())], 3);
    let endpoint = testing::spawn_responder(store);

    assert_eq!(request(&endpoint, b"REQUEST_CHUNK,3\n"), payload);
  }

  #[test]
  fn missing_chunk_closes_without_data() {
    let (_dir, store) = testing::store(&[(1, "one")], 3);
    let endpoint = testing::spawn_responder(store);

    assert!(request(&endpoint, b"REQUEST_CHUNK,2\n").is_empty());
  }

  #[test]
  fn malformed_request_closes_without_data() {
    let (_dir, store) = testing::store(&[(1, "one")], 1);
    let endpoint = testing::spawn_responder(store);

    assert!(request(&endpoint, b"GIVE_ME,1\n").is_empty());
    assert!(request(&endpoint, b"WHERE_CHUNK,1\n").is_empty());
    assert_eq!(request(&endpoint, b"REQUEST_CHUNK,1\n"), b"one");
  }

  #[test]
  fn unterminated_request() {
    let (_dir, store) = testing::store(&[(1, "one")], 1);
    let endpoint = testing::spawn_responder(store);

    let mut stream = TcpStream::connect(endpoint.to_string()).unwrap();
    stream.write_all(b"REQUEST_CHUNK,1").unwrap();
    stream.shutdown(Shutdown::Write).unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();

    assert_eq!(response, b"one");
  }

  #[test]
  fn concurrent_requests() {
    let (_dir, store) = testing::store(&[(1, "one"), (2, "two")], 2);
    let endpoint = testing::spawn_responder(store);

    let handles = (0..8)
      .map(|i| {
        let endpoint = endpoint.clone();
        thread::spawn(move || {
          let chunk = 1 + i % 2;
          let response = request(&endpoint, format!("REQUEST_CHUNK,{}\n", chunk).as_bytes());
          (chunk, response)
        })
      })
      .collect::<Vec<thread::JoinHandle<(u32, Vec<u8>)>>>();

    for handle in handles {
      let (chunk, response) = handle.join().unwrap();
      let expected: &[u8] = if chunk == 1 { b"one" } else { b"two" };
      assert_eq!(response, expected);
    }
  }
}
