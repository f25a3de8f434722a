//! Server-sent event decoding for the search data stream.
//!
//! The site streams search progress as `data:` events. Each event carries a
//! complete snapshot, so the last parseable event wins.

use serde_json::Value;
use tracing::{trace, warn};

/// Returns the JSON of the last parseable `data:` event in `body`.
///
/// Empty events are skipped; unparseable ones are logged and skipped.
pub fn last_data_event(body: &str) -> Option<Value> {
    let mut last = None;

    for line in body.lines() {
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(data) {
            Ok(value) => last = Some(value),
            Err(e) => {
                let preview: String = data.chars().take(100).collect();
                warn!(error = %e, preview = %preview, "failed to parse SSE data event");
            }
        }
    }

    trace!(found = last.is_some(), bytes = body.len(), "decoded SSE body");
    last
}
