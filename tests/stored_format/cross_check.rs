//! Write Cross-Check Tests
//!
//! The cross-check reads every written value back and logs a warning on a
//! mismatch. It never changes the bytes written and never fails a write.

use crate::common::{host_registry, Counter, Drifting};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stratafmt::values::SqlInteger;
use stratafmt::{CodecConfig, FormatIdOutput, ObjectRef};
use tracing::span;
use tracing::{Event, Level, Metadata, Subscriber};

/// Counts `warn` events from the codec target on the current thread.
struct WarnCounter {
    warnings: Arc<AtomicUsize>,
}

impl Subscriber for WarnCounter {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
        span::Id::from_u64(1)
    }

    fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

    fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

    fn event(&self, event: &Event<'_>) {
        let meta = event.metadata();
        if *meta.level() == Level::WARN && meta.target() == "stratafmt::codec" {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _: &span::Id) {}

    fn exit(&self, _: &span::Id) {}
}

/// Write `value` with the cross-check on or off and count the warnings.
fn write_counting(value: ObjectRef<'_>, verify: bool) -> (Vec<u8>, usize) {
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = WarnCounter {
        warnings: Arc::clone(&warnings),
    };
    let bytes = tracing::subscriber::with_default(subscriber, || {
        let mut out = FormatIdOutput::new(Vec::new())
            .with_config(CodecConfig::default().with_verify_writes(verify))
            .with_registry(host_registry());
        out.write_object(value).unwrap();
        out.into_inner()
    });
    (bytes, warnings.load(Ordering::SeqCst))
}

#[test]
fn mismatch_is_logged_and_write_succeeds() {
    let value = Drifting { value: 41 };
    let (checked, warnings) = write_counting(ObjectRef::Formatable(&value), true);
    let (unchecked, quiet) = write_counting(ObjectRef::Formatable(&value), false);

    assert_eq!(checked, vec![0x01, 0xF5, 0x00, 0x00, 0x00, 0x29]);
    assert_eq!(checked, unchecked);
    assert_eq!(quiet, 0);
    let expected = if cfg!(debug_assertions) { 1 } else { 0 };
    assert_eq!(warnings, expected);
}

#[test]
fn faithful_values_log_nothing() {
    let counter = Counter {
        name: "ok".into(),
        count: 9,
    };
    assert_eq!(write_counting(ObjectRef::Formatable(&counter), true).1, 0);
    assert_eq!(
        write_counting(ObjectRef::Formatable(&SqlInteger::null()), true).1,
        0
    );
    assert_eq!(write_counting(ObjectRef::Str("plain"), true).1, 0);
}

#[test]
fn verify_is_off_in_release_builds() {
    let config = CodecConfig::default().with_verify_writes(true);
    assert_eq!(config.verify_enabled(), cfg!(debug_assertions));
}
