use tracing::Level;

pub fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

/// Same as [`init_logging`] but tolerates an already installed subscriber.
pub fn try_init_logging(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init()
        .is_ok()
}
