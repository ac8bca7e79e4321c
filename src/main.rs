fn main() {
  if let Err(code) = chunkswarm::run() {
    std::process::exit(code);
  }
}
