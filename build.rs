fn main() {
    // ESP-IDF link/env plumbing is only needed for the device build.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
