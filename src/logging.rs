//! Tracing subscriber setup
//!
//! Log lines are the menu's report channel: run banners, `main()` detection,
//! symbol summaries, errors and the scripts' own console output all go
//! through `tracing` and come out on stdout as bare messages.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber writing to stdout.
///
/// `RUST_LOG` overrides `default_level` when set.
pub fn init_global(default_level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    build_subscriber(std::io::stdout, filter).init();
}

/// Build a subscriber printing bare messages to `writer`.
///
/// This is the configuration shared between `main` and tests.
pub fn build_subscriber<W>(writer: W, filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false);

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_messages_are_bare() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = build_subscriber(move || writer.clone(), EnvFilter::new("info"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Found main() function, executing...");
            tracing::error!("Error running file: boom");
        });

        assert_eq!(
            captured.text(),
            "Found main() function, executing...\nError running file: boom\n"
        );
    }

    #[test]
    fn test_filter_hides_debug() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = build_subscriber(move || writer.clone(), EnvFilter::new("info"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden");
            tracing::info!("shown");
        });

        assert_eq!(captured.text(), "shown\n");
    }
}
