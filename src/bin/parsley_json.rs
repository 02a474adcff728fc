fn main() {
    env_logger::init();
    parsley::cli::run();
}
