fn main() {
    // Host test builds (no `espidf` feature) must not emit the ESP-IDF
    // sysenv — it is only meaningful for the firmware image.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
