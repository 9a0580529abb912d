//! The injected warning/error channel (spec §3/§7/§9 "Sink"), kept separate from the return
//! type: a single malformed road must not abort network construction.

/// Receives every warning/error the core degrades on instead of aborting.
pub trait Sink {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to the `log` facade, in the style of `convert_osm`'s `warn!`/`error!` call sites.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl Sink for LogSink {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Records every message instead of logging it; used by tests that assert on which warnings
/// were raised.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub warnings: std::cell::RefCell<Vec<String>>,
    pub errors: std::cell::RefCell<Vec<String>>,
}

impl Sink for CollectingSink {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
        self.warnings.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
        self.errors.borrow_mut().push(message.to_string());
    }
}
