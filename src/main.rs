fn main() {
    if let Err(err) = diagram_quality::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
