fn main() {
    if let Err(err) = dotgen::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
