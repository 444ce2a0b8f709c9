fn main() {
    if let Err(e) = cxtask::cli::run() {
        eprintln!("[ERROR] {:#}", e);
        std::process::exit(1);
    }
}
