// tests/ignore_rules.rs

//! Ignore-engine behavior through the public classification surface.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use watchreload::watch::{dotted_extension, file_name, WatchShared};
use watchreload::{FileEventHandler, WatchConfig, WatchError};
use watchreload_test_utils::fakes::RecordingHandler;
use watchreload_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn ignore_precedence_over_mixed_token_styles() -> TestResult {
    init_tracing();

    // Application-level tokens plus handler-declared suffix tokens, the way
    // an embedding application actually mixes them.
    let handler = Arc::new(
        RecordingHandler::new(&[".css"]).with_unobserved(&[".exe", ".log", "_worker.js"]),
    );

    let config = WatchConfig::new("/test")
        .with_handler(handler as Arc<dyn FileEventHandler>)
        .with_unobserved_files(|| vec![".git".to_string(), ".vscode".to_string()]);

    let shared = WatchShared::from_config(&config, None);

    assert!(shared.is_ignored(Path::new("/test/main.exe")));
    assert!(shared.is_ignored(Path::new("/test/.git/config")));
    assert!(shared.is_ignored(Path::new("/test/deploy/_worker.js")));
    assert!(!shared.is_ignored(Path::new("/test/main.go")));
    assert!(!shared.is_ignored(Path::new("/test/src/app.js")));

    Ok(())
}

#[test]
fn handlers_added_dynamically_extend_the_ignore_set() -> TestResult {
    init_tracing();

    let initial = Arc::new(RecordingHandler::new(&[".css"]).with_unobserved(&[".exe", ".log"]));

    let config = WatchConfig::new("/test")
        .with_handler(initial as Arc<dyn FileEventHandler>)
        .with_unobserved_files(|| vec![".git".to_string(), ".vscode".to_string()]);

    let shared = WatchShared::from_config(&config, None);

    // Force the lazy build before the dynamic additions.
    assert!(shared.is_ignored(Path::new("/test/main.exe")));

    let deploy = Arc::new(RecordingHandler::new(&[]).with_unobserved(&["_worker.js", "app.wasm"]));
    let bundler = Arc::new(RecordingHandler::new(&[]).with_unobserved(&["dist", "node_modules"]));
    shared.add_files_event_handlers([
        deploy as Arc<dyn FileEventHandler>,
        bundler as Arc<dyn FileEventHandler>,
    ]);

    let cases = [
        ("/test/main.exe", true),
        ("/test/output.log", true),
        ("/test/.git/config", true),
        ("/test/.vscode/settings.json", true),
        ("/test/deploy/_worker.js", true),
        ("/test/deploy/app.wasm", true),
        ("/test/dist/bundle.js", true),
        ("/test/node_modules/package.json", true),
        ("/test/main.go", false),
        ("/test/src/app.js", false),
    ];

    for (path, expected) in cases {
        assert_eq!(
            shared.is_ignored(Path::new(path)),
            expected,
            "is_ignored({path})"
        );
    }

    Ok(())
}

#[test]
fn tokens_from_handlers_added_before_first_query_are_honored() -> TestResult {
    init_tracing();

    // No query has happened yet, so the ignore set does not exist when the
    // handlers arrive; the lazy build must still pick their tokens up.
    let config = WatchConfig::new("/test");
    let shared = WatchShared::from_config(&config, None);

    let handler = Arc::new(RecordingHandler::new(&[]).with_unobserved(&[".exe", "_worker.js"]));
    shared.add_files_event_handlers([handler as Arc<dyn FileEventHandler>]);

    assert!(shared.is_ignored(Path::new("/test/main.exe")));
    assert!(shared.is_ignored(Path::new("/test/deploy/_worker.js")));
    assert!(!shared.is_ignored(Path::new("/test/main.go")));

    Ok(())
}

#[test]
fn hidden_files_are_ignored_except_git() -> TestResult {
    init_tracing();

    let config = WatchConfig::new("/test");
    let shared = WatchShared::from_config(&config, None);

    assert!(shared.is_ignored(Path::new("/test/.env")));
    assert!(shared.is_ignored(Path::new("/test/src/.hidden.css")));
    assert!(shared.is_ignored(Path::new("/test/.vscode")));

    // `.git` itself is exempt from the hidden rule; excluding it is the
    // ignore list's job.
    assert!(!shared.is_ignored(Path::new("/test/.git")));
    assert!(!shared.is_ignored(Path::new("/test/main.go")));

    Ok(())
}

#[test]
fn backslash_paths_normalize_before_matching() -> TestResult {
    init_tracing();

    let config =
        WatchConfig::new("C:\\test").with_unobserved_files(|| vec!["dist".to_string()]);
    let shared = WatchShared::from_config(&config, None);

    assert!(shared.is_ignored(Path::new("C:\\test\\dist\\bundle.js")));
    assert!(shared.is_ignored(Path::new("C:/test/dist/bundle.js")));
    assert!(!shared.is_ignored(Path::new("C:\\test\\src\\app.js")));

    Ok(())
}

#[test]
fn classification_is_independent_of_query_order() -> TestResult {
    init_tracing();

    let build = || {
        let config = WatchConfig::new("/test")
            .with_unobserved_files(|| vec![".git".to_string(), "dist".to_string()]);
        WatchShared::from_config(&config, None)
    };

    let paths = [
        "/test/main.go",
        "/test/dist/bundle.js",
        "/test/.git/config",
        "/test/src/app.js",
    ];

    let forward: Vec<bool> = {
        let shared = build();
        paths
            .iter()
            .map(|p| shared.is_ignored(Path::new(p)))
            .collect()
    };

    let backward: Vec<bool> = {
        let shared = build();
        let mut results: Vec<bool> = paths
            .iter()
            .rev()
            .map(|p| shared.is_ignored(Path::new(p)))
            .collect();
        results.reverse();
        results
    };

    assert_eq!(forward, backward);

    Ok(())
}

#[test]
fn file_name_extracts_last_component() -> TestResult {
    assert_eq!(file_name("theme/index.html")?, "index.html");
    assert_eq!(file_name("theme\\index.html")?, "index.html");
    assert_eq!(file_name("index.html")?, "index.html");
    Ok(())
}

#[test]
fn file_name_rejects_pathological_input() {
    assert!(matches!(file_name(""), Err(WatchError::EmptyPath)));
    assert!(matches!(
        file_name("theme/"),
        Err(WatchError::TrailingSeparator(_))
    ));
    assert!(matches!(
        file_name("/"),
        Err(WatchError::TrailingSeparator(_))
    ));
    assert!(matches!(file_name("."), Err(WatchError::InvalidPath(_))));
}

#[test]
fn dotted_extension_mirrors_suffix_semantics() {
    assert_eq!(dotted_extension("index.html"), ".html");
    assert_eq!(dotted_extension("archive.tar.gz"), ".gz");
    assert_eq!(dotted_extension("Makefile"), "");
    assert_eq!(dotted_extension(".gitignore"), ".gitignore");
}
