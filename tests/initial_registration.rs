// tests/initial_registration.rs

//! Bootstrap walk: directory subscription and startup replay of existing
//! files.

use std::error::Error;
use std::sync::Arc;

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, Watcher};

use watchreload::watch::{initial_registration, register_directory, WatchShared};
use watchreload::{FileEventHandler, FsEventKind, WatchConfig};
use watchreload_test_utils::builders::TempProject;
use watchreload_test_utils::fakes::{RecordingFolderObserver, RecordingHandler, StaticAnalyzer};
use watchreload_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// A real notify watcher whose events nobody reads; registration only needs
/// the subscription side.
fn quiet_watcher() -> RecommendedWatcher {
    RecommendedWatcher::new(|_res: notify::Result<Event>| {}, NotifyConfig::default())
        .expect("failed to create watcher")
}

#[test]
fn empty_tree_emits_no_handler_calls() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    let handler = Arc::new(RecordingHandler::new(&[".css"]));

    let config = WatchConfig::new(project.root())
        .with_handler(handler.clone() as Arc<dyn FileEventHandler>);
    let shared = WatchShared::from_config(&config, Some(quiet_watcher()));

    initial_registration(&shared);

    assert_eq!(handler.call_count(), 0);
    // Only the root itself was subscribed.
    assert_eq!(shared.registered_count(), 1);

    Ok(())
}

#[test]
fn excluded_only_tree_emits_no_handler_calls() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    project.file(".git/config", "[core]");
    project.file("dist/bundle.js", "console.log(1);");

    let handler = Arc::new(RecordingHandler::new(&[".js"]));
    let config = WatchConfig::new(project.root())
        .with_handler(handler.clone() as Arc<dyn FileEventHandler>)
        .with_unobserved_files(|| vec![".git".to_string(), "dist".to_string()]);
    let shared = WatchShared::from_config(&config, Some(quiet_watcher()));

    initial_registration(&shared);

    assert_eq!(handler.call_count(), 0);
    assert_eq!(shared.registered_count(), 1);

    Ok(())
}

#[test]
fn existing_files_replay_as_synthetic_creates() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    project.file("main.css", "body {}");
    project.file("src/app.js", "console.log(1);");
    project.file("README", "docs");

    let assets = Arc::new(RecordingHandler::new(&[".css", ".js"]));
    let packer = Arc::new(RecordingHandler::new(&[".exe"]));

    let config = WatchConfig::new(project.root())
        .with_handler(assets.clone() as Arc<dyn FileEventHandler>)
        .with_handler(packer.clone() as Arc<dyn FileEventHandler>);
    let shared = WatchShared::from_config(&config, Some(quiet_watcher()));

    initial_registration(&shared);

    let events = assets.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.kind == FsEventKind::Create));
    let mut names: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["app.js", "main.css"]);

    assert_eq!(packer.call_count(), 0);

    // Root plus src.
    assert_eq!(shared.registered_count(), 2);

    Ok(())
}

#[test]
fn source_replay_consults_the_analyzer() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    project.file("src/main.go", "package main");

    let server = Arc::new(RecordingHandler::new(&[".go"]).with_main_input("src/main.go"));
    let wasm = Arc::new(RecordingHandler::new(&[".go"]).with_main_input("src/wasm.go"));

    let config = WatchConfig::new(project.root())
        .with_handler(server.clone() as Arc<dyn FileEventHandler>)
        .with_handler(wasm.clone() as Arc<dyn FileEventHandler>)
        .with_analyzer(Arc::new(StaticAnalyzer::owning("src/main.go")));
    let shared = WatchShared::from_config(&config, Some(quiet_watcher()));

    initial_registration(&shared);

    assert_eq!(server.call_count(), 1);
    assert_eq!(wasm.call_count(), 0);

    Ok(())
}

#[test]
fn register_directory_is_idempotent() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    let src = project.dir("src");

    let observer = Arc::new(RecordingFolderObserver::new());
    let config = WatchConfig::new(project.root()).with_folder_events(observer.clone());
    let shared = WatchShared::from_config(&config, Some(quiet_watcher()));

    register_directory(&shared, &src)?;
    register_directory(&shared, &src)?;

    assert_eq!(shared.registered_count(), 1);
    assert_eq!(observer.events_for("src").len(), 1);

    Ok(())
}

#[test]
fn folder_observer_sees_every_registered_directory() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    project.dir("src");
    project.dir("assets/img");

    let observer = Arc::new(RecordingFolderObserver::new());
    let config = WatchConfig::new(project.root()).with_folder_events(observer.clone());
    let shared = WatchShared::from_config(&config, Some(quiet_watcher()));

    initial_registration(&shared);

    // Root, src, assets, assets/img.
    assert_eq!(shared.registered_count(), 4);
    for name in ["src", "assets", "img"] {
        let events = observer.events_for(name);
        assert_eq!(events.len(), 1, "folder events for {name}");
        assert_eq!(events[0].kind, FsEventKind::Create);
    }

    Ok(())
}

#[test]
fn observer_failures_do_not_fail_registration() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    let src = project.dir("src");

    let observer = Arc::new(RecordingFolderObserver::failing());
    let config = WatchConfig::new(project.root()).with_folder_events(observer.clone());
    let shared = WatchShared::from_config(&config, Some(quiet_watcher()));

    register_directory(&shared, &src)?;

    assert_eq!(shared.registered_count(), 1);
    assert_eq!(observer.events_for("src").len(), 1);

    Ok(())
}
