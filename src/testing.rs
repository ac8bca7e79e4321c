use crate::common::*;

/// How a fake tracker answers a line.
pub(crate) enum Reply {
  Line(String),
  Silent,
  Close,
}

pub(crate) fn peer_config(tracker: SocketAddr) -> PeerConfig {
  PeerConfig {
    folder: PathBuf::from("."),
    name: "test".into(),
    host: Ipv4Addr::LOCALHOST.to_string(),
    transfer_port: 0,
    tracker: tracker.to_string(),
    poll_interval: Duration::from_millis(20),
    poll_jitter: Duration::from_millis(5),
    timeout: Duration::from_secs(2),
    log_file: None,
  }
}

/// A store in a fresh directory, with a manifest listing `chunks`.
pub(crate) fn store(chunks: &[(u64, &str)], total: u64) -> (TempDir, Arc<Store>) {
  store_bytes(
    chunks
      .iter()
      .map(|(chunk, contents)| (*chunk, contents.as_bytes().to_vec()))
      .collect(),
    total,
  )
}

pub(crate) fn store_bytes(chunks: Vec<(u64, Vec<u8>)>, total: u64) -> (TempDir, Arc<Store>) {
  let dir = TempDir::new().unwrap();
  let mut manifest = String::new();

  for (chunk, contents) in chunks {
    let filename = ChunkId::new(chunk).unwrap().filename();
    fs::write(dir.path().join(&filename), contents).unwrap();
    manifest.push_str(&format!("{},{}\n", chunk, filename));
  }

  manifest.push_str(&format!("{},LASTCHUNK\n", total));
  fs::write(dir.path().join(consts::MANIFEST_FILENAME), manifest).unwrap();

  let store = Store::open(dir.path()).unwrap();

  (dir, Arc::new(store))
}

pub(crate) fn tracker_config(address: impl Into<String>) -> TrackerConfig {
  TrackerConfig {
    address: address.into(),
    deduplicate: false,
    log_file: None,
  }
}

pub(crate) fn spawn_tracker() -> (SocketAddr, Arc<Registry>) {
  spawn_tracker_with(&tracker_config("127.0.0.1:0"))
}

pub(crate) fn spawn_tracker_with(config: &TrackerConfig) -> (SocketAddr, Arc<Registry>) {
  let tracker = Tracker::bind(config).unwrap();

  let address = tracker.local_addr().unwrap();
  let registry = tracker.registry();

  thread::spawn(move || tracker.run());

  (address, registry)
}

/// A tracker stand-in that records every non-blank line it receives and
/// answers according to `respond`.
pub(crate) fn spawn_fake_tracker<F>(respond: F) -> (SocketAddr, Arc<Mutex<Vec<String>>>)
where
  F: Fn(&str) -> Reply + Send + Sync + 'static,
{
  let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
  let address = listener.local_addr().unwrap();
  let lines = Arc::new(Mutex::new(Vec::new()));
  let respond = Arc::new(respond);

  {
    let lines = lines.clone();
    thread::spawn(move || {
      for stream in listener.incoming() {
        let mut connection = Connection::new(stream.unwrap()).unwrap();
        let lines = lines.clone();
        let respond = respond.clone();
        thread::spawn(move || {
          while let Some(line) = connection.recv_line().unwrap() {
            let line = line.trim().to_owned();
            if line.is_empty() {
              continue;
            }
            lines.lock().unwrap().push(line.clone());
            match respond(&line) {
              Reply::Line(reply) => connection.write_all(format!("{}\n", reply).as_bytes()).unwrap(),
              Reply::Silent => {}
              Reply::Close => return,
            }
          }
        });
      }
    });
  }

  (address, lines)
}

pub(crate) fn spawn_responder(store: Arc<Store>) -> PeerEndpoint {
  let responder = peer::Responder::bind(&peer_config(unreachable_endpoint_address()), store).unwrap();
  let port = responder.local_addr().unwrap().port();
  responder.spawn();
  PeerEndpoint::new(Ipv4Addr::LOCALHOST.to_string(), port)
}

/// A chunk source that counts requests and answers each one slowly.
pub(crate) fn spawn_slow_source(payload: Vec<u8>, requests: Arc<AtomicUsize>) -> PeerEndpoint {
  let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
  let port = listener.local_addr().unwrap().port();

  thread::spawn(move || {
    for stream in listener.incoming() {
      let mut connection = Connection::new(stream.unwrap()).unwrap();
      requests.fetch_add(1, Ordering::SeqCst);
      let payload = payload.clone();
      thread::spawn(move || {
        connection.recv_line().unwrap();
        thread::sleep(Duration::from_millis(200));
        connection.write_all(&payload).unwrap();
      });
    }
  });

  PeerEndpoint::new(Ipv4Addr::LOCALHOST.to_string(), port)
}

/// Port 1 on the loopback interface, where nothing listens.
pub(crate) fn unreachable_endpoint_address() -> SocketAddr {
  (Ipv4Addr::LOCALHOST, 1).into()
}

pub(crate) fn unreachable_endpoint() -> PeerEndpoint {
  let address = unreachable_endpoint_address();
  PeerEndpoint::new(address.ip().to_string(), address.port())
}

pub(crate) fn session_pair(registry: Arc<Registry>) -> (crate::tracker::Session, TcpStream) {
  let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
  let remote = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
  let (local, _) = listener.accept().unwrap();
  let events = Arc::new(EventLog::disabled(consts::TRACKER_EVENT_NAME));
  (crate::tracker::Session::new(local, registry, events).unwrap(), remote)
}

pub(crate) fn read_line(reader: &mut impl BufRead) -> String {
  let mut line = String::new();
  reader.read_line(&mut line).unwrap();
  assert!(line.ends_with('\n'), "unterminated line: {:?}", line);
  line.pop();
  line
}

/// Poll `condition` until it holds, panicking after five seconds.
pub(crate) fn wait_until(mut condition: impl FnMut() -> bool) {
  for _ in 0..500 {
    if condition() {
      return;
    }
    thread::sleep(Duration::from_millis(10));
  }
  panic!("condition not met within five seconds");
}
