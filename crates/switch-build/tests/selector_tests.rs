use pretty_assertions::assert_eq;
use switch_build::{ArtifactLayout, BuildSelector, BuildStatus, FinishWindow};
use switch_test_utils::build::{FakeBuildServer, candidate, create_artifacts, day};
use tempfile::TempDir;

const DEF: &str = "Product.Main";

fn layout(temp: &TempDir) -> ArtifactLayout {
    ArtifactLayout::new(temp.path().join("drops"), "x64", "Release")
}

#[test]
fn test_reverse_listing_within_day_skips_failed() {
    let temp = TempDir::new().unwrap();
    let layout = layout(&temp);
    let good = candidate("Product.Main_20240101.1", DEF, "2024-01-02", "08:00:00", BuildStatus::Succeeded);
    let bad = candidate("Product.Main_20240102.1", DEF, "2024-01-02", "20:00:00", BuildStatus::Failed);
    create_artifacts(&layout, &good, &["a.dll"]);
    create_artifacts(&layout, &bad, &["a.dll"]);

    let server = FakeBuildServer::new(vec![good.clone(), bad]);
    let selected = BuildSelector::new(&server, &layout)
        .select(DEF, day("2024-01-02"))
        .unwrap();

    assert_eq!(selected, Some(good));
}

#[test]
fn test_later_listing_preferred_within_day() {
    let temp = TempDir::new().unwrap();
    let layout = layout(&temp);
    let first = candidate("Product.Main_20240102.1", DEF, "2024-01-02", "08:00:00", BuildStatus::Succeeded);
    let second = candidate("Product.Main_20240102.2", DEF, "2024-01-02", "20:00:00", BuildStatus::PartiallySucceeded);
    create_artifacts(&layout, &first, &["a.dll"]);
    create_artifacts(&layout, &second, &["a.dll"]);

    let server = FakeBuildServer::new(vec![first, second.clone()]);
    let selected = BuildSelector::new(&server, &layout)
        .select(DEF, day("2024-01-02"))
        .unwrap();

    assert_eq!(selected, Some(second));
}

#[test]
fn test_more_recent_day_wins_regardless_of_listing_order() {
    let temp = TempDir::new().unwrap();
    let layout = layout(&temp);
    let older = candidate("Product.Main_20240103.9", DEF, "2024-01-03", "23:00:00", BuildStatus::Succeeded);
    let newer = candidate("Product.Main_20240105.1", DEF, "2024-01-05", "01:00:00", BuildStatus::Succeeded);
    create_artifacts(&layout, &older, &["a.dll"]);
    create_artifacts(&layout, &newer, &["a.dll"]);

    // Listing puts the newer build first; day order must still win.
    let server = FakeBuildServer::new(vec![newer.clone(), older]);
    let selected = BuildSelector::new(&server, &layout)
        .select(DEF, day("2024-01-06"))
        .unwrap();

    assert_eq!(selected, Some(newer));
}

#[test]
fn test_missing_artifacts_are_skipped() {
    let temp = TempDir::new().unwrap();
    let layout = layout(&temp);
    let with_drop = candidate("Product.Main_20240101.1", DEF, "2024-01-01", "08:00:00", BuildStatus::Succeeded);
    let without_drop = candidate("Product.Main_20240102.1", DEF, "2024-01-02", "08:00:00", BuildStatus::Succeeded);
    create_artifacts(&layout, &with_drop, &["a.dll"]);

    let server = FakeBuildServer::new(vec![with_drop.clone(), without_drop]);
    let selected = BuildSelector::new(&server, &layout)
        .select(DEF, day("2024-01-02"))
        .unwrap();

    assert_eq!(selected, Some(with_drop));
}

#[test]
fn test_number_must_contain_definition_name() {
    let temp = TempDir::new().unwrap();
    let layout = layout(&temp);
    let renamed = candidate("Hotfix_20240102.1", DEF, "2024-01-02", "08:00:00", BuildStatus::Succeeded);
    create_artifacts(&layout, &renamed, &["a.dll"]);

    let server = FakeBuildServer::new(vec![renamed]);
    let selected = BuildSelector::new(&server, &layout)
        .select(DEF, day("2024-01-02"))
        .unwrap();

    assert_eq!(selected, None);
}

#[test]
fn test_window_bounds_the_scan() {
    let temp = TempDir::new().unwrap();
    let layout = layout(&temp);
    let old = candidate("Product.Main_20231201.1", DEF, "2023-12-01", "08:00:00", BuildStatus::Succeeded);
    create_artifacts(&layout, &old, &["a.dll"]);

    let server = FakeBuildServer::new(vec![old]);
    let selected = BuildSelector::new(&server, &layout)
        .select(DEF, day("2024-01-02"))
        .unwrap();

    assert_eq!(selected, None);
    let queries = server.queries();
    assert_eq!(queries.len(), 15);
    assert_eq!(queries[0], FinishWindow::for_day(day("2024-01-02")));
    assert_eq!(queries[14], FinishWindow::for_day(day("2023-12-19")));
}

#[test]
fn test_custom_window_days() {
    let temp = TempDir::new().unwrap();
    let layout = layout(&temp);
    let server = FakeBuildServer::new(vec![]);

    BuildSelector::new(&server, &layout)
        .with_window_days(3)
        .select(DEF, day("2024-03-01"))
        .unwrap();

    let queried: Vec<String> = server
        .queries()
        .iter()
        .map(|w| w.start.date().to_string())
        .collect();
    assert_eq!(queried, vec!["2024-03-01", "2024-02-29", "2024-02-28"]);
}

#[test]
fn test_never_selects_unusable_builds() {
    let temp = TempDir::new().unwrap();
    let layout = layout(&temp);
    let statuses = [
        BuildStatus::InProgress,
        BuildStatus::Failed,
        BuildStatus::Stopped,
        BuildStatus::Succeeded,
        BuildStatus::PartiallySucceeded,
    ];

    let mut builds = Vec::new();
    for (i, status) in statuses.iter().enumerate() {
        for (j, name) in ["Product.Main", "Other"].iter().enumerate() {
            for with_artifacts in [true, false] {
                let number = format!("{name}_2024010{}.{}{}", i + 1, j, u8::from(with_artifacts));
                let b = candidate(&number, DEF, "2024-01-05", &format!("0{i}:0{j}:00"), *status);
                if with_artifacts {
                    create_artifacts(&layout, &b, &["a.dll"]);
                }
                builds.push(b);
            }
        }
    }

    let server = FakeBuildServer::new(builds);
    let selector = BuildSelector::new(&server, &layout);
    let selected = selector.select(DEF, day("2024-01-05")).unwrap().unwrap();

    assert!(selected.status.is_successful());
    assert!(selected.number.contains(DEF));
    assert!(selected.artifact_dir(&layout).is_dir());
    assert!(selector.is_usable(&selected, DEF));
}
