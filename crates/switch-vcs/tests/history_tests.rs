use pretty_assertions::assert_eq;
use switch_vcs::{HistoryQuery, HistorySearcher, RevisionToken, ServerPath};
use switch_test_utils::vcs::FakeVersionControl;

const MANIFEST: &str = "$/Product/Modules/Imaging/Main/_Globals/VersionInformation/Imaging.xml";

fn manifest(version: &str) -> String {
    format!("<Module>\n  <Version>{version}</Version>\n</Module>\n")
}

#[test]
fn test_stops_at_first_match() {
    let vcs = FakeVersionControl::new().with_history(
        MANIFEST,
        &[
            ("5", &manifest("3.4.2")),
            ("4", &manifest("3.4.1")),
            ("3", &manifest("3.4.0")),
            ("2", &manifest("3.3.9")),
            ("1", &manifest("3.3.8")),
        ],
    );

    let found = HistorySearcher::new(&vcs)
        .find_changeset_introducing(&ServerPath::new(MANIFEST), "3.4.0", &HistoryQuery::default())
        .unwrap();

    assert_eq!(found, Some(RevisionToken::new("3")));
    let downloaded: Vec<String> = vcs
        .downloads()
        .iter()
        .map(|(_, rev)| rev.to_string())
        .collect();
    assert_eq!(downloaded, vec!["5", "4", "3"]);
}

#[test]
fn test_newest_matching_revision_wins() {
    let vcs = FakeVersionControl::new().with_history(
        MANIFEST,
        &[
            ("5", &manifest("3.4.1")),
            ("4", &manifest("3.4.1")),
            ("3", &manifest("3.4.0")),
        ],
    );

    let found = HistorySearcher::new(&vcs)
        .find_changeset_introducing(&ServerPath::new(MANIFEST), "3.4.1", &HistoryQuery::default())
        .unwrap();

    assert_eq!(found, Some(RevisionToken::new("5")));
}

#[test]
fn test_no_match_is_not_an_error() {
    let vcs = FakeVersionControl::new()
        .with_history(MANIFEST, &[("2", &manifest("1.0.1")), ("1", &manifest("1.0.0"))]);

    let found = HistorySearcher::new(&vcs)
        .find_changeset_introducing(&ServerPath::new(MANIFEST), "9.9.9", &HistoryQuery::default())
        .unwrap();

    assert_eq!(found, None);
    assert_eq!(vcs.downloads().len(), 2);
}

#[test]
fn test_search_respects_max_results() {
    let vcs = FakeVersionControl::new().with_history(
        MANIFEST,
        &[
            ("3", &manifest("2.0.0")),
            ("2", &manifest("1.5.0")),
            ("1", &manifest("1.0.0")),
        ],
    );
    let query = HistoryQuery::since(Some(RevisionToken::new("1"))).with_max_results(2);

    let found = HistorySearcher::new(&vcs)
        .find_changeset_introducing(&ServerPath::new(MANIFEST), "1.0.0", &query)
        .unwrap();

    assert_eq!(found, None);
    assert_eq!(vcs.downloads().len(), 2);
    assert_eq!(vcs.history_queries(), vec![(ServerPath::new(MANIFEST), query)]);
}

#[test]
fn test_empty_signature_never_matches() {
    let vcs = FakeVersionControl::new().with_history(MANIFEST, &[("1", &manifest("1.0.0"))]);

    let found = HistorySearcher::new(&vcs)
        .find_changeset_introducing(&ServerPath::new(MANIFEST), "", &HistoryQuery::default())
        .unwrap();

    assert_eq!(found, None);
    assert!(vcs.downloads().is_empty());
}
