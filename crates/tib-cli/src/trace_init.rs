use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a stderr subscriber. `RUST_LOG` overrides the level picked from
/// `verbose` (0 = info, 1 = debug, 2+ = trace).
pub fn init_tracing(verbose: u8) {
    INIT.call_once(|| {
        let default = match verbose {
            0 => "tib_core=info,tib_cli=info",
            1 => "tib_core=debug,tib_cli=debug",
            _ => "tib_core=trace,tib_cli=trace",
        };
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(verbose > 0)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
            )
            .init();
    });
}
