use std::panic::PanicHookInfo;
use std::sync::Once;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::filter::FilterFn;
use tracing_subscriber::fmt::format::Format;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static PANICS: AtomicU64 = AtomicU64::new(0);

/// Routes `tracing` output of the itinerary crates to the platform log and
/// reports panics through it. Sessions raise an error banner on their next
/// snapshot after a panic. Call once at startup; later calls are no-ops.
#[uniffi::export]
pub fn init_logging() {
    static LOGGING_SETUP: Once = Once::new();

    LOGGING_SETUP.call_once(|| {
        let filter = FilterFn::new(|metadata| {
            metadata
                .module_path()
                .unwrap_or_default()
                .starts_with("itinerary_map")
        });

        let layer = tracing_subscriber::fmt::layer()
            .event_format(Format::default().with_level(false).without_time())
            .with_ansi(false);

        #[cfg(target_os = "android")]
        let layer = {
            use tracing_logcat::{LogcatMakeWriter, LogcatTag};

            let tag = LogcatTag::Fixed("ItineraryMap-Rust".to_owned());
            match LogcatMakeWriter::new(tag) {
                Ok(writer) => layer.with_writer(writer),
                Err(err) => {
                    eprintln!("logcat unavailable: {err}");
                    return;
                }
            }
        };

        if tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init()
            .is_err()
        {
            return;
        }

        std::panic::set_hook(Box::new(panic_hook));
    })
}

fn panic_hook(info: &PanicHookInfo) {
    PANICS.fetch_add(1, Ordering::SeqCst);
    tracing::error!("{info}")
}

pub(crate) fn panic_count() -> u64 {
    PANICS.load(Ordering::SeqCst)
}

/// Moves `seen` up to `total`; true when that revealed new panics.
pub(crate) fn catch_up(seen: &AtomicU64, total: u64) -> bool {
    seen.fetch_max(total, Ordering::SeqCst) < total
}
