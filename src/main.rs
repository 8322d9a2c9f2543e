//! # docserve - Entry Point
//! src/main.rs
//!
//! Lee la configuración (CLI + entorno), inicializa el logging y ejecuta el
//! servidor hasta que se pida `/shutdown`.

use docserve::config::Config;
use docserve::server::Server;

fn main() {
    let config = Config::new();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(config.log_level)
        .init();

    config.log_summary();

    let server = match Server::bind(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", error_chain(&e));
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("{}", error_chain(&e));
        std::process::exit(1);
    }
}

/// Error con todas sus causas en una línea
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
