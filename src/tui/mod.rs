//! # Terminal front-end
//!
//! The ratatui/crossterm adapter around [`crate::session`]. It turns key presses
//! into [`Action`]s, runs the [`Effect`]s returned by [`update`] and draws the
//! session. Only this module knows about the terminal.
//!
//! The loop runs on a single thread. Network calls are spawned onto the same
//! current-thread runtime and report back through a channel, so the screen keeps
//! redrawing while a fetch is in flight. A fetch superseded by a newer one is
//! aborted.

mod ui;

use crate::client::TemplateClient;
use crate::error::Result;
use crate::fs_utils::{self, GenerateOptions};
use crate::session::{Action, Effect, Session, update};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

const PAGE: isize = 10;

/// Which input receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Search,
    List,
    Output,
}

impl Focus {
    const fn next(self) -> Self {
        match self {
            Self::Search => Self::List,
            Self::List => Self::Output,
            Self::Output => Self::Search,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Search => Self::Output,
            Self::List => Self::Search,
            Self::Output => Self::List,
        }
    }
}

/// Adapter-only state: focus and list scroll position
#[derive(Debug)]
pub(crate) struct TuiState {
    pub(crate) focus: Focus,
    pub(crate) list: ListState,
}

impl TuiState {
    fn new() -> Self {
        Self {
            focus: Focus::List,
            list: ListState::default(),
        }
    }
}

/// Runs the interactive selector until the user quits
///
/// # Errors
///
/// Returns `GitignoreError::Io` if the terminal cannot be driven. Service and
/// filesystem errors are shown inside the UI instead.
pub async fn run(client: TemplateClient, output_dir: String, options: GenerateOptions) -> Result<()> {
    let mut terminal = ratatui::try_init()?;
    let result = event_loop(&mut terminal, client, Session::new(output_dir, options)).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    client: TemplateClient,
    mut session: Session,
) -> Result<()> {
    let (tx, mut rx): (UnboundedSender<Action>, UnboundedReceiver<Action>) =
        mpsc::unbounded_channel();
    let mut executor = Executor {
        client,
        tx,
        in_flight: None,
    };
    let mut tui = TuiState::new();
    let mut events = EventStream::new();

    let effect = update(&mut session, Action::ReloadCatalog);
    if executor.perform(&mut session, effect) {
        return Ok(());
    }

    loop {
        terminal.draw(|frame| ui::draw(frame, &session, &mut tui))?;

        let action = tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    handle_key(&mut tui, &session, key)
                }
                Some(Ok(_)) => None,
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(action) = rx.recv() => Some(action),
        };

        if let Some(action) = action {
            let effect = update(&mut session, action);
            if executor.perform(&mut session, effect) {
                return Ok(());
            }
        }
    }
}

/// Runs effects on behalf of the loop
struct Executor {
    client: TemplateClient,
    tx: UnboundedSender<Action>,
    in_flight: Option<JoinHandle<()>>,
}

impl Executor {
    /// Returns `true` when the session asked to quit
    fn perform(&mut self, session: &mut Session, mut effect: Effect) -> bool {
        loop {
            match effect {
                Effect::None => return false,
                Effect::Quit => {
                    self.abort_in_flight();
                    return true;
                }
                Effect::LoadCatalog => {
                    let client = self.client.clone();
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = client.list_catalog().await;
                        let _ = tx.send(Action::CatalogLoaded(result));
                    });
                    return false;
                }
                Effect::Fetch { request, query } => {
                    self.abort_in_flight();
                    let client = self.client.clone();
                    let tx = self.tx.clone();
                    self.in_flight = Some(tokio::spawn(async move {
                        let result = client.fetch_templates(&query).await;
                        let _ = tx.send(Action::FetchFinished {
                            request,
                            query,
                            result,
                        });
                    }));
                    return false;
                }
                Effect::Write {
                    dir,
                    content,
                    options,
                } => {
                    let result = fs_utils::generate(&dir, &content, &options);
                    effect = update(session, Action::WriteFinished(result));
                }
            }
        }
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// Maps a key press to a session action, updating focus along the way
pub(crate) fn handle_key(tui: &mut TuiState, session: &Session, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return Some(Action::Quit),
        KeyCode::Char('g') if ctrl => return Some(Action::Generate),
        KeyCode::Char('r') if ctrl => return Some(Action::ReloadCatalog),
        KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Tab => {
            tui.focus = tui.focus.next();
            return None;
        }
        KeyCode::BackTab => {
            tui.focus = tui.focus.prev();
            return None;
        }
        _ => {}
    }

    match tui.focus {
        Focus::List => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveHighlight(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveHighlight(1)),
            KeyCode::PageUp => Some(Action::MoveHighlight(-PAGE)),
            KeyCode::PageDown => Some(Action::MoveHighlight(PAGE)),
            KeyCode::Home => Some(Action::MoveHighlight(isize::MIN)),
            KeyCode::End => Some(Action::MoveHighlight(isize::MAX)),
            KeyCode::Char(' ') => Some(Action::ToggleHighlighted),
            KeyCode::Enter => Some(Action::PreviewHighlighted),
            KeyCode::Char('p') => Some(Action::PreviewSelection),
            KeyCode::Char('/') => {
                tui.focus = Focus::Search;
                None
            }
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        Focus::Search => match key.code {
            KeyCode::Up => Some(Action::MoveHighlight(-1)),
            KeyCode::Down => Some(Action::MoveHighlight(1)),
            KeyCode::Enter => {
                tui.focus = Focus::List;
                None
            }
            code => edit(session.filter(), code).map(Action::SetFilter),
        },
        Focus::Output => match key.code {
            KeyCode::Enter => Some(Action::Generate),
            code => edit(session.output_dir(), code).map(Action::SetOutputDir),
        },
    }
}

fn edit(current: &str, code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c) => {
            let mut text = current.to_string();
            text.push(c);
            Some(text)
        }
        KeyCode::Backspace => {
            let mut text = current.to_string();
            text.pop()?;
            Some(text)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateCatalog;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn session() -> Session {
        let mut session = Session::new("./", GenerateOptions::default());
        update(
            &mut session,
            Action::CatalogLoaded(Ok(TemplateCatalog::parse("java,python"))),
        );
        session
    }

    #[test]
    fn test_list_keys() {
        let session = session();
        let mut tui = TuiState::new();
        assert!(matches!(
            handle_key(&mut tui, &session, press(KeyCode::Char(' '))),
            Some(Action::ToggleHighlighted)
        ));
        assert!(matches!(
            handle_key(&mut tui, &session, press(KeyCode::Enter)),
            Some(Action::PreviewHighlighted)
        ));
        assert!(matches!(
            handle_key(&mut tui, &session, press(KeyCode::Down)),
            Some(Action::MoveHighlight(1))
        ));
        assert!(matches!(
            handle_key(&mut tui, &session, press(KeyCode::Char('q'))),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_search_typing_extends_filter() {
        let mut session = session();
        let mut tui = TuiState::new();
        tui.focus = Focus::Search;

        let action = handle_key(&mut tui, &session, press(KeyCode::Char('q')));
        assert!(matches!(&action, Some(Action::SetFilter(f)) if f == "q"));
        update(&mut session, action.unwrap());

        let action = handle_key(&mut tui, &session, press(KeyCode::Backspace));
        assert!(matches!(&action, Some(Action::SetFilter(f)) if f.is_empty()));
        update(&mut session, action.unwrap());

        assert!(handle_key(&mut tui, &session, press(KeyCode::Backspace)).is_none());
    }

    #[test]
    fn test_output_editing_and_generate() {
        let session = session();
        let mut tui = TuiState::new();
        tui.focus = Focus::Output;

        let action = handle_key(&mut tui, &session, press(KeyCode::Char('x')));
        assert!(matches!(&action, Some(Action::SetOutputDir(d)) if d == "./x"));
        assert!(matches!(
            handle_key(&mut tui, &session, press(KeyCode::Enter)),
            Some(Action::Generate)
        ));
    }

    #[test]
    fn test_global_keys() {
        let session = session();
        let mut tui = TuiState::new();
        tui.focus = Focus::Search;
        assert!(matches!(
            handle_key(&mut tui, &session, ctrl('g')),
            Some(Action::Generate)
        ));
        assert!(matches!(
            handle_key(&mut tui, &session, ctrl('c')),
            Some(Action::Quit)
        ));
        assert!(matches!(
            handle_key(&mut tui, &session, ctrl('r')),
            Some(Action::ReloadCatalog)
        ));
    }

    #[test]
    fn test_focus_cycle() {
        let session = session();
        let mut tui = TuiState::new();
        assert_eq!(tui.focus, Focus::List);
        handle_key(&mut tui, &session, press(KeyCode::Tab));
        assert_eq!(tui.focus, Focus::Output);
        handle_key(&mut tui, &session, press(KeyCode::Tab));
        assert_eq!(tui.focus, Focus::Search);
        handle_key(&mut tui, &session, press(KeyCode::BackTab));
        assert_eq!(tui.focus, Focus::Output);
        tui.focus = Focus::List;
        handle_key(&mut tui, &session, press(KeyCode::Char('/')));
        assert_eq!(tui.focus, Focus::Search);
    }
}
