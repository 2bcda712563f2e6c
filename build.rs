fn main() {
    // Host-target test builds (`--no-default-features`) have no ESP-IDF
    // environment to export.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
