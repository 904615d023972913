use color_eyre::eyre::Result;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use ratatui::widgets::Wrap;
use srcview_backend_client::BackendClient;
use srcview_backend_client::RequestError;
use srcview_protocol::HighlightRange;
use srcview_protocol::Link;
use srcview_protocol::SearchKind;
use srcview_protocol::SearchPage;
use srcview_protocol::SearchResults;
use srcview_protocol::SourceFile;
use srcview_protocol::SourcePage;
use srcview_protocol::SummaryData;
use srcview_protocol::SummaryPage;
use srcview_protocol::ViewState;
use srcview_protocol::view::search_fragment;
use srcview_protocol::view::source_fragment;
use srcview_protocol::view::summary_fragment;
use tokio::select;
use tokio::sync::mpsc::unbounded_channel;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::config::Config;
use crate::external;
use crate::hint_bar::HintBar;
use crate::navigation::NavigationMode;
use crate::navigation::NavigationState;
use crate::search_view::SearchView;
use crate::source_view::SourceView;
use crate::summary_view::SummaryView;
use crate::text_formatting::truncate_text;
use crate::tui::Tui;

/// What the body of the screen shows.
pub(crate) enum Page {
    Blank,
    Loading,
    Source(SourceView),
    Summary(SummaryView),
    Search(SearchView),
    Error(String),
}

pub(crate) struct App {
    client: BackendClient,
    config: Config,
    app_event_tx: AppEventSender,
    navigation: NavigationState,
    page: Page,
    /// History fragment of the most recently issued request. Responses are
    /// applied in completion order regardless; this only feeds diagnostics.
    latest_request: Option<String>,
}

impl App {
    pub(crate) fn new(client: BackendClient, config: Config, app_event_tx: AppEventSender) -> Self {
        Self {
            client,
            config,
            app_event_tx,
            navigation: NavigationState::default(),
            page: Page::Blank,
            latest_request: None,
        }
    }

    pub async fn run(
        terminal: &mut Tui,
        client: BackendClient,
        config: Config,
        initial: Option<Link>,
    ) -> Result<()> {
        use tokio_stream::StreamExt;
        let (app_event_tx, mut app_event_rx) = unbounded_channel();
        let mut app = Self::new(client, config, AppEventSender::new(app_event_tx));
        if let Some(link) = initial {
            app.handle_app_event(AppEvent::Navigate(link));
        }

        let mut terminal_events = EventStream::new();
        terminal.draw(|frame| app.render(frame.area(), frame.buffer_mut()))?;
        while select! {
            Some(event) = app_event_rx.recv() => {
                app.handle_app_event(event)
            }
            Some(event) = terminal_events.next() => {
                app.handle_terminal_event(event?)
            }
            else => false,
        } {
            terminal.draw(|frame| app.render(frame.area(), frame.buffer_mut()))?;
        }
        Ok(())
    }

    /// Returns `false` when the app should exit.
    pub(crate) fn handle_app_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Navigate(Link::Summary(id)) => self.request_summary(id),
            AppEvent::Navigate(Link::Source { file, highlight }) => {
                self.request_source(file, highlight)
            }
            AppEvent::FindUses(id) => self.request_search(SearchKind::Uses, id),
            AppEvent::FindImpls(id) => self.request_search(SearchKind::Impls, id),
            AppEvent::SummaryLoaded { id, result } => self.on_summary_loaded(id, result),
            AppEvent::SourceLoaded {
                file,
                highlight,
                result,
            } => self.on_source_loaded(file, highlight, result),
            AppEvent::SearchLoaded { kind, id, result } => self.on_search_loaded(kind, id, result),
            AppEvent::Edit(link) => self.request_edit(link),
            AppEvent::EditFinished { link, result } => match result {
                Ok(()) => info!(link, "edit request accepted"),
                Err(err) => warn!(link, status = ?err.status(), error = %err, "edit request failed"),
            },
            AppEvent::OpenExternal(url) => external::open_url(&url),
            AppEvent::HistoryBack => {
                if self.navigation.back().is_some() {
                    self.show_current();
                }
            }
            AppEvent::HistoryForward => {
                if self.navigation.forward().is_some() {
                    self.show_current();
                }
            }
            AppEvent::ExitRequest => return false,
        }
        true
    }

    fn begin_request(&mut self, fragment: String) {
        debug!(fragment, "request issued");
        self.latest_request = Some(fragment);
        self.page = Page::Loading;
    }

    fn request_summary(&mut self, id: String) {
        self.begin_request(summary_fragment(&id));
        let client = self.client.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = client.summary(&id).await;
            tx.send(AppEvent::SummaryLoaded { id, result });
        });
    }

    fn request_source(&mut self, file: String, highlight: Option<HighlightRange>) {
        let start_line = highlight.map(|range| range.line_start).unwrap_or(1);
        self.begin_request(source_fragment(&file, start_line));
        let client = self.client.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = client.source(&file).await;
            tx.send(AppEvent::SourceLoaded {
                file,
                highlight,
                result,
            });
        });
    }

    fn request_search(&mut self, kind: SearchKind, id: String) {
        self.begin_request(search_fragment(kind, &id));
        let client = self.client.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = match kind {
                SearchKind::Uses => client.find_uses(&id).await,
                SearchKind::Impls => client.find_impls(&id).await,
            };
            tx.send(AppEvent::SearchLoaded { kind, id, result });
        });
    }

    fn request_edit(&self, link: String) {
        let client = self.client.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = client.edit(&link).await;
            tx.send(AppEvent::EditFinished { link, result });
        });
    }

    /// Overlapping requests are not cancelled; the last one to complete
    /// wins. Note when that is not the one the user asked for last.
    fn note_completion(&self, fragment: &str) {
        if let Some(latest) = self.latest_request.as_deref()
            && latest != fragment
        {
            debug!(fragment, latest, "applying superseded response");
        }
    }

    fn on_summary_loaded(&mut self, id: String, result: Result<SummaryData, RequestError>) {
        let fragment = summary_fragment(&id);
        self.note_completion(&fragment);
        match result {
            Ok(data) => self.show(ViewState::Summary(SummaryPage { id, data })),
            Err(err) => self.show_failure(fragment, &id, &err),
        }
    }

    fn on_source_loaded(
        &mut self,
        file: String,
        highlight: Option<HighlightRange>,
        result: Result<SourceFile, RequestError>,
    ) {
        let start_line = highlight.map(|range| range.line_start).unwrap_or(1);
        let fragment = source_fragment(&file, start_line);
        self.note_completion(&fragment);
        match result {
            Ok(source) => self.show(ViewState::Source(SourcePage {
                file,
                path: source.path,
                lines: source.lines,
                highlight,
                start_line,
            })),
            Err(err) => self.show_failure(fragment, &file, &err),
        }
    }

    fn on_search_loaded(
        &mut self,
        kind: SearchKind,
        id: String,
        result: Result<SearchResults, RequestError>,
    ) {
        let fragment = search_fragment(kind, &id);
        self.note_completion(&fragment);
        match result {
            Ok(results) => self.show(ViewState::Search(SearchPage { kind, id, results })),
            Err(err) => self.show_failure(fragment, &id, &err),
        }
    }

    fn show(&mut self, view: ViewState) {
        self.navigation.navigate(view, NavigationMode::Push);
        self.show_current();
    }

    /// A failed request still records where the user tried to go, then shows
    /// an error in place of the page.
    fn show_failure(&mut self, fragment: String, target: &str, err: &RequestError) {
        warn!(target, status = ?err.status(), error = %err, "request failed");
        let message = format!("Error: could not load {fragment}");
        self.navigation.push_placeholder(fragment);
        self.navigation
            .navigate(ViewState::error(message), NavigationMode::Replace);
        self.show_current();
    }

    fn show_current(&mut self) {
        let scroll_step = self.config.scroll_step;
        self.page = match self.navigation.current() {
            None => Page::Blank,
            Some(ViewState::Source(page)) => Page::Source(SourceView::new(
                page.clone(),
                self.config.vcs_link.clone(),
                scroll_step,
            )),
            Some(ViewState::Summary(page)) => {
                Page::Summary(SummaryView::new(page.clone(), scroll_step))
            }
            Some(ViewState::Search(page)) => Page::Search(SearchView::new(page, scroll_step)),
            Some(ViewState::Error(page)) => Page::Error(page.message.clone()),
        };
    }

    fn menu_open(&self) -> bool {
        match &self.page {
            Page::Source(view) => view.interactive.any_menu_open(),
            Page::Summary(view) => view.interactive.any_menu_open(),
            Page::Search(view) => view.interactive.any_menu_open(),
            Page::Blank | Page::Loading | Page::Error(_) => false,
        }
    }

    /// Returns `false` when the app should exit.
    pub(crate) fn handle_terminal_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                true
            }
            _ => true,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return self.handle_app_event(AppEvent::ExitRequest);
        }
        if !self.menu_open() {
            let alt = key.modifiers.contains(KeyModifiers::ALT);
            match key.code {
                KeyCode::Char('q') => return self.handle_app_event(AppEvent::ExitRequest),
                KeyCode::Left if alt => return self.handle_app_event(AppEvent::HistoryBack),
                KeyCode::Backspace => return self.handle_app_event(AppEvent::HistoryBack),
                KeyCode::Right if alt => return self.handle_app_event(AppEvent::HistoryForward),
                _ => {}
            }
        }
        let tx = &self.app_event_tx;
        match &mut self.page {
            Page::Source(view) => view.handle_key(key, tx),
            Page::Summary(view) => view.handle_key(key, tx),
            Page::Search(view) => view.handle_key(key, tx),
            Page::Blank | Page::Loading | Page::Error(_) => false,
        };
        true
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        let tx = &self.app_event_tx;
        match &mut self.page {
            Page::Source(view) => view.handle_mouse(event, tx),
            Page::Summary(view) => view.handle_mouse(event, tx),
            Page::Search(view) => view.handle_mouse(event, tx),
            Page::Blank | Page::Loading | Page::Error(_) => false,
        };
    }

    fn hints(&self) -> Line<'static> {
        let mut hints = vec!["q quit", "Alt-\u{2190} back", "Alt-\u{2192} forward"];
        match &self.page {
            Page::Source(_) => hints.extend([
                "right-click symbol for menu",
                "click line number",
                "\u{2190}/\u{2192} scroll",
            ]),
            Page::Summary(_) => hints.extend(["right-click symbol for menu", "d docs"]),
            Page::Search(_) => hints.push("click a hit to open it"),
            Page::Blank | Page::Loading | Page::Error(_) => {}
        }
        if self.menu_open() {
            hints = vec!["\u{2191}/\u{2193} select", "Enter choose", "Esc close"];
        }
        Line::from(hints.join(" \u{b7} ")).dim()
    }

    pub(crate) fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let [top, body, bottom] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let url = self
            .navigation
            .current_entry()
            .map(|entry| entry.url.as_str())
            .unwrap_or("");
        let title = format!(" srcview  {}", truncate_text(url, top.width.saturating_sub(11) as usize));
        buf.set_stringn(
            top.x,
            top.y,
            format!("{title:<width$}", width = top.width as usize),
            top.width as usize,
            Style::default().add_modifier(Modifier::REVERSED),
        );

        let body = Rect::new(
            body.x + 1,
            body.y.saturating_add(1),
            body.width.saturating_sub(2),
            body.height.saturating_sub(1),
        );
        match &mut self.page {
            Page::Blank => Paragraph::new("Nothing loaded. Start with `srcview <link>`.")
                .dim()
                .render(body, buf),
            Page::Loading => Paragraph::new("Loading...").render(body, buf),
            Page::Error(message) => Paragraph::new(message.clone())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .render(body, buf),
            Page::Source(view) => view.render(body, buf),
            Page::Summary(view) => view.render(body, buf),
            Page::Search(view) => view.render(body, buf),
        }

        HintBar::new(vec![self.hints()]).render(bottom, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use srcview_protocol::HistoryEntry;
    use srcview_protocol::Markup;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn app() -> (App, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = unbounded_channel();
        let client = BackendClient::new("http://127.0.0.1:9/").unwrap();
        let config = Config {
            vcs_link: Some("https://example.com/$file#L$line".into()),
            ..Config::default()
        };
        (App::new(client, config, AppEventSender::new(tx)), rx)
    }

    fn parse_error() -> RequestError {
        RequestError::Parse {
            endpoint: "summary".into(),
            source: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
        }
    }

    fn screen(app: &mut App) -> Vec<String> {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn summary_loaded(app: &mut App, id: &str) {
        app.handle_app_event(AppEvent::SummaryLoaded {
            id: id.into(),
            result: Ok(SummaryData {
                signature: Markup::plain(format!("fn item_{id}()")),
                ..SummaryData::default()
            }),
        });
    }

    #[test]
    fn failed_summary_shows_error_and_records_history() {
        let (mut app, _rx) = app();
        app.handle_app_event(AppEvent::SummaryLoaded {
            id: "X".into(),
            result: Err(parse_error()),
        });

        assert!(matches!(app.page, Page::Error(_)));
        assert_eq!(
            app.navigation.entries(),
            &[HistoryEntry::placeholder("#summary=X")]
        );
        let lines = screen(&mut app);
        assert!(lines[0].contains("#summary=X"));
        assert!(lines[2].contains("Error: could not load #summary=X"));
    }

    #[test]
    fn loaded_summary_is_pushed_with_its_state() {
        let (mut app, _rx) = app();
        summary_loaded(&mut app, "1");

        let entry = app.navigation.current_entry().unwrap();
        assert_eq!(entry.url, "#summary=1");
        assert!(matches!(entry.state, Some(ViewState::Summary(_))));
        assert!(matches!(&app.page, Page::Summary(view) if view.page().id == "1"));
    }

    #[test]
    fn back_and_forward_restore_without_requests() {
        let (mut app, mut rx) = app();
        summary_loaded(&mut app, "1");
        summary_loaded(&mut app, "2");

        let back = KeyEvent::new(KeyCode::Left, KeyModifiers::ALT);
        assert!(app.handle_terminal_event(Event::Key(back)));
        assert!(matches!(&app.page, Page::Summary(view) if view.page().id == "1"));

        let forward = KeyEvent::new(KeyCode::Right, KeyModifiers::ALT);
        app.handle_terminal_event(Event::Key(forward));
        assert!(matches!(&app.page, Page::Summary(view) if view.page().id == "2"));

        // Nothing was sent to the backend.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn overlapping_summaries_apply_in_completion_order() {
        let (mut app, _rx) = app();
        app.handle_app_event(AppEvent::Navigate(Link::summary("1")));
        assert!(matches!(app.page, Page::Loading));
        assert_eq!(app.latest_request.as_deref(), Some("#summary=1"));
        assert!(screen(&mut app).iter().any(|line| line.contains("Loading...")));

        app.handle_app_event(AppEvent::Navigate(Link::summary("2")));
        assert_eq!(app.latest_request.as_deref(), Some("#summary=2"));

        summary_loaded(&mut app, "2");
        summary_loaded(&mut app, "1");

        assert!(matches!(&app.page, Page::Summary(view) if view.page().id == "1"));
        let urls: Vec<&str> = app
            .navigation
            .entries()
            .iter()
            .map(|entry| entry.url.as_str())
            .collect();
        assert_eq!(urls, vec!["#summary=2", "#summary=1"]);
    }

    #[test]
    fn restored_summary_starts_collapsed() {
        let (mut app, _rx) = app();
        app.handle_app_event(AppEvent::SummaryLoaded {
            id: "1".into(),
            result: Ok(SummaryData {
                doc_summary: "Short.".into(),
                doc_rest: Some("Long.".into()),
                ..SummaryData::default()
            }),
        });
        if let Page::Summary(view) = &mut app.page {
            view.toggle_docs();
            assert!(view.show_docs());
        }
        summary_loaded(&mut app, "2");
        app.handle_app_event(AppEvent::HistoryBack);
        assert!(matches!(&app.page, Page::Summary(view) if !view.show_docs()));
    }

    #[test]
    fn source_response_renders_three_lines() {
        let (mut app, _rx) = app();
        app.handle_app_event(AppEvent::SourceLoaded {
            file: "src/main.rs".into(),
            highlight: Some(HighlightRange::lines(1, 1)),
            result: Ok(SourceFile {
                path: vec!["src".into(), "main.rs".into()],
                lines: vec![Markup::plain("fn main() {"), Markup::plain(""), Markup::plain("}")],
            }),
        });

        assert_eq!(app.navigation.current_entry().unwrap().url, "#src=src/main.rs:1");
        let lines = screen(&mut app);
        assert_eq!(lines[2], " src / main.rs");
        assert_eq!(lines[4], " 1 fn main() {");
        assert_eq!(lines[5], " 2");
        assert_eq!(lines[6], " 3 }");
        let Page::Source(view) = &app.page else {
            panic!("expected a source page");
        };
        assert!(view.interactive.states.is_selected(&crate::elements::ElementId::Line(1)));
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let (mut app, _rx) = app();
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(!app.handle_terminal_event(Event::Key(q)));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!app.handle_terminal_event(Event::Key(ctrl_c)));
    }

    #[test]
    fn search_failure_records_impls_fragment() {
        let (mut app, _rx) = app();
        app.handle_app_event(AppEvent::SearchLoaded {
            kind: SearchKind::Impls,
            id: "4".into(),
            result: Err(parse_error()),
        });
        assert_eq!(app.navigation.current_entry().unwrap().url, "#impls=4");
        assert!(matches!(app.page, Page::Error(_)));
    }
}
