use pretty_assertions::assert_eq;
use srcview_protocol::SummaryData;
use srcview_protocol::SummaryPage;
use srcview_protocol::ViewState;
use srcview_tui::navigation::NavigationMode;
use srcview_tui::navigation::NavigationState;

fn summary(id: &str) -> ViewState {
    ViewState::Summary(SummaryPage {
        id: id.into(),
        data: SummaryData::default(),
    })
}

#[test]
fn back_and_forward_walk_recorded_views() {
    let mut nav = NavigationState::default();
    nav.navigate(summary("1"), NavigationMode::Push);
    nav.navigate(summary("2"), NavigationMode::Push);

    assert_eq!(nav.back(), Some(&summary("1")));
    assert!(!nav.can_go_back());
    assert_eq!(nav.forward(), Some(&summary("2")));
    assert!(!nav.can_go_forward());
}

#[test]
fn pushing_after_back_drops_the_forward_entries() {
    let mut nav = NavigationState::default();
    nav.navigate(summary("1"), NavigationMode::Push);
    nav.navigate(summary("2"), NavigationMode::Push);
    nav.back();
    nav.navigate(summary("3"), NavigationMode::Push);

    let urls: Vec<&str> = nav.entries().iter().map(|entry| entry.url.as_str()).collect();
    assert_eq!(urls, vec!["#summary=1", "#summary=3"]);
}

#[test]
fn failed_load_leaves_a_placeholder_that_restores_as_an_error() {
    let mut nav = NavigationState::default();
    nav.navigate(summary("1"), NavigationMode::Push);
    nav.push_placeholder("#summary=missing");
    nav.navigate(ViewState::error("Error: could not load"), NavigationMode::Replace);
    assert_eq!(nav.entries().len(), 2);

    nav.back();
    let restored = nav.forward().cloned();
    assert!(matches!(
        restored,
        Some(ViewState::Error(page)) if page.message.contains("#summary=missing")
    ));
}
