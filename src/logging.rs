use env_logger::{Builder, Env};

/// Default filter for a given number of `-v` flags, or `error` when quiet.
pub fn default_filter(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global logger. `RUST_LOG` takes precedence over the
/// verbosity flags. Calling this twice is harmless.
pub fn init(verbosity: u8, quiet: bool) {
    let _ = Builder::from_env(Env::default().default_filter_or(default_filter(verbosity, quiet)))
        .format_timestamp(None)
        .try_init();
}
