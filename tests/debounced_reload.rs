// tests/debounced_reload.rs

//! Rapid duplicate writes: the admission debounce and the reload coordinator
//! working together.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use watchreload::{FileEventHandler, WatchConfig};
use watchreload_test_utils::builders::TempProject;
use watchreload_test_utils::fakes::{RecordingHandler, ReloadProbe};
use watchreload_test_utils::harness::LoopHarness;
use watchreload_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn rapid_duplicate_writes_collapse_to_one_call_and_one_reload() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    let html = project.file("index.html", "<!DOCTYPE html><html></html>");

    let handler = Arc::new(RecordingHandler::new(&[".html"]));
    let (mut probe, reload) = ReloadProbe::new();

    let config =
        WatchConfig::new(project.root()).with_handler(handler.clone() as Arc<dyn FileEventHandler>);

    let harness = LoopHarness::spawn(&config, Some(reload));

    // Two writes 20 ms apart: the second falls inside the 100 ms window.
    project.file("index.html", "<!DOCTYPE html><html><body>1</body></html>");
    harness.send_write(&html);
    sleep(Duration::from_millis(20)).await;
    project.file("index.html", "<!DOCTYPE html><html><body>2</body></html>");
    harness.send_write(&html);

    assert!(probe.wait(Duration::from_secs(1)).await);
    assert_eq!(handler.call_count(), 1);
    assert_eq!(probe.count(), 1);

    // Past the window the path opens again; the same burst shape repeats.
    sleep(Duration::from_millis(150)).await;
    project.file("index.html", "<!DOCTYPE html><html><body>3</body></html>");
    harness.send_write(&html);
    sleep(Duration::from_millis(20)).await;
    project.file("index.html", "<!DOCTYPE html><html><body>4</body></html>");
    harness.send_write(&html);

    assert!(probe.wait(Duration::from_secs(1)).await);
    harness.finish().await;

    assert_eq!(handler.call_count(), 2);
    assert_eq!(probe.count(), 2);

    Ok(())
}

#[tokio::test]
async fn distinct_files_in_one_burst_each_dispatch_but_reload_once() -> TestResult {
    init_tracing();

    let project = TempProject::new();
    let html = project.file("index.html", "<html></html>");
    let css = project.file("style.css", "body {}");
    let js = project.file("script.js", "console.log(1);");

    let handler = Arc::new(RecordingHandler::new(&[".html", ".css", ".js"]));
    let (mut probe, reload) = ReloadProbe::new();

    let config =
        WatchConfig::new(project.root()).with_handler(handler.clone() as Arc<dyn FileEventHandler>);

    let harness = LoopHarness::spawn(&config, Some(reload));

    // Three different paths inside one 50 ms reload window.
    harness.send_write(&html);
    harness.send_write(&css);
    harness.send_write(&js);

    assert!(probe.wait(Duration::from_secs(1)).await);
    sleep(Duration::from_millis(150)).await;
    harness.finish().await;

    assert_eq!(handler.call_count(), 3);
    assert_eq!(probe.count(), 1);

    Ok(())
}
