// src/watch/dispatch.rs

//! Handler fan-out for a single file event.
//!
//! Asset files fan out to every handler claiming the extension (a minifier
//! and a runtime detector may both want every `.js`). Source-language files
//! additionally go through ownership resolution so two handlers sharing the
//! source extension (server build, WASM build) do not both compile the same
//! file.

use std::path::Path;

use tracing::{trace, warn};

use crate::handler::FsEventKind;
use crate::watch::path_utils::dotted_extension;
use crate::watch::watcher::WatchShared;

/// What a dispatch round observed, and whether it warrants a reload.
#[derive(Debug, Clone, Copy)]
pub struct DispatchOutcome {
    pub is_source: bool,
    pub any_success: bool,
    pub source_failed: bool,
    pub should_reload: bool,
}

/// Invoke every matching handler for `(name, path, kind)` in registration
/// order and compute the reload gate.
///
/// Reload is warranted when a source-file round saw no handler error, or
/// when any handler (source or asset) succeeded. All-failed rounds never
/// reload.
pub fn dispatch_file_event(
    shared: &WatchShared,
    name: &str,
    path: &Path,
    kind: FsEventKind,
    is_delete: bool,
) -> DispatchOutcome {
    let extension = dotted_extension(name);
    let is_source = !extension.is_empty() && extension == shared.source_extension();

    let mut any_success = false;
    let mut source_failed = false;

    for handler in shared.handlers_snapshot() {
        if !handler
            .supported_extensions()
            .iter()
            .any(|supported| supported == &extension)
        {
            continue;
        }

        if !is_delete && is_source {
            if let Some(analyzer) = shared.analyzer() {
                let entry_point = handler.main_input_file_relative_path();
                match analyzer.file_belongs_to(&entry_point, path, kind) {
                    Ok(true) => {}
                    Ok(false) => {
                        trace!(
                            path = %path.display(),
                            entry_point = %entry_point,
                            "file not owned by handler, skipping"
                        );
                        continue;
                    }
                    Err(err) => {
                        warn!(
                            path = %path.display(),
                            error = %err,
                            "dependency analyzer failed, skipping handler"
                        );
                        continue;
                    }
                }
            }
        }

        match handler.on_file_event(name, &extension, path, kind) {
            Ok(()) => any_success = true,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "handler failed to process file event");
                if is_source {
                    source_failed = true;
                }
            }
        }
    }

    let should_reload = (is_source && !source_failed) || any_success;

    DispatchOutcome {
        is_source,
        any_success,
        source_failed,
        should_reload,
    }
}
