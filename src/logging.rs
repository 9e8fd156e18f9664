use std::io::Write;

use env_logger::Env;

/// Sets up `<timestamp> - <LEVEL> - <message>` logging on stderr.
///
/// Defaults to `info`; `RUST_LOG` overrides it, e.g. `RUST_LOG=debug` or
/// `RUST_LOG=info,librespot_discovery=debug` to see the responder's traffic.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .init();
}
