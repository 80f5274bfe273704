fn main() {
    if let Err(e) = hostfetch::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
