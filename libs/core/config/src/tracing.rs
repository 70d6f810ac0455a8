use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset in development.
const DEV_FILTER: &str = "info,todo_api=debug,domain_todo_lists=debug,tower_http=debug";

/// Default filter when `RUST_LOG` is unset in production.
const PROD_FILTER: &str = "warn,todo_api=info,domain_todo_lists=info";

/// Install color-eyre so start-up failures print their location.
///
/// Safe to call more than once; later calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize the global subscriber.
///
/// Production (`APP_ENV=production`) logs flattened JSON without targets so
/// log shippers can index fields. Development logs a pretty, human-readable
/// format. Both register `ErrorLayer` so eyre reports carry span traces.
///
/// `RUST_LOG` overrides the default filter. Calling this twice (as tests do)
/// leaves the first subscriber in place.
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if is_production { PROD_FILTER } else { DEV_FILTER })
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping"),
    }
}
