//! Log sinks for `Signal::log`.

use std::fmt::Debug;

use tracing::info;

/// Destination for values emitted by [`Signal::log_with`](crate::Signal::log_with).
pub trait LogSink {
    /// Record `value` under `message`.
    fn log(&self, message: &str, value: &dyn Debug);
}

/// Default sink: one `info` event per value on the `trellis::log` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str, value: &dyn Debug) {
        info!(target: "trellis::log", "{message} {value:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::atom::atom_from_value;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        lines: RefCell<Vec<String>>,
    }

    impl LogSink for Recorder {
        fn log(&self, message: &str, value: &dyn Debug) {
            self.lines.borrow_mut().push(format!("{message} {value:?}"));
        }
    }

    #[test]
    fn logs_initial_value_and_changes() {
        let atom = atom_from_value("a");
        let sink = Rc::new(Recorder::default());
        let logged = atom.as_signal().log_with("letter", sink.clone());

        atom.set("b");
        atom.set("b");
        atom.set("c");

        assert_eq!(logged.get(), "c");
        assert_eq!(
            *sink.lines.borrow(),
            vec!["letter \"a\"", "letter \"b\"", "letter \"c\""]
        );
    }

    #[test]
    fn returns_the_same_signal() {
        let signal = atom_from_value(1).as_signal();
        let logged = signal.log_with("n", Rc::new(Recorder::default()));
        assert!(logged.ptr_eq(&signal));
    }

    #[test]
    fn tracing_sink_does_not_require_a_subscriber() {
        TracingSink.log("no subscriber installed", &42);
    }
}
