//! Runs the real mirror tool when it is installed.

use std::fs;
use std::process::Command;
use std::time::Duration;

use switch_mirror::{
    CommandLauncher, CopyProgressMonitor, MirrorTool, MonitorTiming, RetryPolicy,
};
use tempfile::TempDir;

fn tool_available(tool: MirrorTool) -> bool {
    let info_arg = match tool {
        MirrorTool::Rsync => "--version",
        MirrorTool::Robocopy => "/?",
    };
    Command::new(tool.program()).arg(info_arg).output().is_ok()
}

#[test]
fn test_default_tool_mirrors_and_purges() {
    let tool = MirrorTool::default();
    if !tool_available(tool) {
        eprintln!("{tool} not installed, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    let source = temp.path().join("drop");
    let destination = temp.path().join("bin");
    fs::create_dir_all(source.join("sub")).unwrap();
    fs::write(source.join("a.dll"), "a").unwrap();
    fs::write(source.join("sub/b.pdb"), "b").unwrap();
    fs::create_dir_all(&destination).unwrap();
    fs::write(destination.join("stale.dll"), "old").unwrap();

    let launcher = CommandLauncher::new(tool, RetryPolicy::default());
    let timing = MonitorTiming {
        poll_interval: Duration::from_millis(10),
        window: Duration::from_millis(100),
        max_wait: None,
    };
    let report = CopyProgressMonitor::new(&launcher)
        .with_timing(timing)
        .mirror_directory(&source, &destination, &mut ())
        .unwrap();

    assert!(report.outcome.success, "output: {}", report.outcome.output);
    assert!(!report.estimated);
    assert!(destination.join("a.dll").is_file());
    assert!(destination.join("sub/b.pdb").is_file());
    assert!(!destination.join("stale.dll").exists());
}
