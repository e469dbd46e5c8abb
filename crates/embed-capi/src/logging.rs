//! Optional tracing initialization for host processes.

use std::sync::Once;

use tracing::info;

static INIT: Once = Once::new();

/// Install a stderr tracing subscriber for the library.
///
/// Filter via the `EMBRIDGE_LOG` environment variable (e.g.
/// `EMBRIDGE_LOG=debug`); defaults to `info`. Safe to call more than once;
/// only the first call installs a subscriber. Hosts that already set a
/// global subscriber can skip this entirely.
#[no_mangle]
pub extern "C" fn embridge_init_tracing() {
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("EMBRIDGE_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            info!("embridge tracing initialized");
        }
    });
}
