use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use pretty_assertions::assert_eq;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use srcview_protocol::ReferenceSpan;
use srcview_tui::elements::ElementId;
use srcview_tui::menu::MenuHost;
use srcview_tui::menu::MenuOutcome;
use srcview_tui::menu::MenuPosition;
use srcview_tui::menus::LineNumberMenu;
use srcview_tui::menus::MenuAction;
use srcview_tui::menus::RefMenu;
use srcview_tui::menus::RefTarget;

const SCREEN: Rect = Rect::new(0, 0, 80, 24);

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn span(impls: u32) -> ReferenceSpan {
    ReferenceSpan {
        text: "Shape".into(),
        context_id: Some("17".into()),
        doc_url: Some("https://docs.example/shape".into()),
        impls,
        ..ReferenceSpan::default()
    }
}

#[test]
fn reference_menu_lists_what_the_symbol_offers() {
    let mut host = MenuHost::new(RefMenu);
    let target = RefTarget::from_span(&span(2)).expect("context id");
    host.open(
        MenuPosition { column: 5, row: 3 },
        ElementId::Span {
            block: 1,
            segment: 0,
        },
        target,
    );

    assert_eq!(
        host.item_ids(),
        vec![
            "ref_menu_view_summary",
            "ref_menu_view_docs",
            "ref_menu_find_uses",
            "ref_menu_find_impls",
        ]
    );
    assert_eq!(host.items()[3].label, "find impls (2)");
}

#[test]
fn keyboard_selection_dispatches_find_impls() {
    let mut host = MenuHost::new(RefMenu);
    host.open(
        MenuPosition { column: 0, row: 0 },
        ElementId::Parent,
        RefTarget::from_span(&span(1)).expect("context id"),
    );

    // Up from the first item wraps to the last one.
    assert_eq!(host.handle_key(key(KeyCode::Up)), MenuOutcome::Consumed);
    assert_eq!(
        host.handle_key(key(KeyCode::Enter)),
        MenuOutcome::Dispatch {
            action: MenuAction::FindImpls("17".into()),
            element: ElementId::Parent,
        }
    );
    assert!(!host.is_open());
}

#[test]
fn span_without_context_id_has_no_menu_target() {
    let span = ReferenceSpan {
        text: "x".into(),
        ..ReferenceSpan::default()
    };
    assert_eq!(RefTarget::from_span(&span), None);
}

#[test]
fn line_menu_dims_edit_and_fills_vcs_template() {
    let mut host = MenuHost::new(LineNumberMenu::new(
        "src/shape.rs",
        Some("https://vcs.example/$file#L$line".into()),
    ));
    host.open(MenuPosition { column: 2, row: 4 }, ElementId::LineNumber(9), 9);

    let items = host.items();
    assert_eq!(items[0].action, MenuAction::Edit("src/shape.rs:9".into()));
    assert!(items[0].unstable);
    assert_eq!(
        items[1].action,
        MenuAction::ViewInVcs("https://vcs.example/src/shape.rs#L9".into())
    );

    let mut buf = Buffer::empty(SCREEN);
    host.render(SCREEN, &mut buf);
    let area = host.area(SCREEN).expect("open menu");
    let edit_cell = &buf[(area.x + 2, area.y + 1)];
    assert!(edit_cell.modifier.contains(Modifier::DIM));
}

#[test]
fn clicking_outside_dismisses_the_line_menu() {
    let mut host = MenuHost::new(LineNumberMenu::new("a.rs", None));
    host.open(MenuPosition { column: 2, row: 2 }, ElementId::LineNumber(1), 1);
    assert_eq!(host.item_ids(), vec!["line_number_menu_edit"]);

    let outcome = host.handle_mouse(
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 70,
            row: 20,
            modifiers: KeyModifiers::NONE,
        },
        SCREEN,
    );
    assert_eq!(outcome, MenuOutcome::Dismissed);
    assert!(!host.is_open());
}
