pub mod synthetic_image;

/// Install `env_logger` once so `RUST_LOG=debug cargo test` shows pipeline logs.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
