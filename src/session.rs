//! # Interactive session
//!
//! State of one interactive run, driven by [`update`]. The function is pure: it
//! mutates the [`Session`] and returns the single [`Effect`] the front-end must
//! perform (network, disk, quit). Results of effects come back as actions.
//!
//! ## Transitions
//!
//! | Phase            | Action                                   | Next phase / effect                              |
//! |------------------|------------------------------------------|--------------------------------------------------|
//! | any              | `Quit`                                   | `Effect::Quit`                                   |
//! | any              | `ReloadCatalog`                          | `LoadingCatalog`, `Effect::LoadCatalog`          |
//! | `LoadingCatalog` | `CatalogLoaded`                          | `Browsing` (error shown in preview on failure)   |
//! | other            | `CatalogLoaded`                          | unchanged; list replaced, error shown only when no fetch is pending |
//! | any              | `SetFilter`, `MoveHighlight`, `SetOutputDir` | unchanged, no effect                         |
//! | any              | `ToggleHighlighted`                      | `Done` becomes `Browsing`, no effect             |
//! | any              | `PreviewHighlighted`, `PreviewSelection` | cache hit: `Browsing`; miss: `Previewing` + `Effect::Fetch` |
//! | any              | `Generate` with nothing selected         | unchanged, validation message, no effect         |
//! | any              | `Generate`, cached valid content         | `Generating` + `Effect::Write`                   |
//! | any              | `Generate`, cache miss                   | `Generating` + `Effect::Fetch`                   |
//! | any              | `FetchFinished` for a superseded request | cache filled, nothing else                       |
//! | `Previewing`     | `FetchFinished`                          | `Browsing`, content or error in preview          |
//! | `Generating`     | `FetchFinished`                          | valid: `Effect::Write`; otherwise `Browsing` + error |
//! | `Generating`     | `WriteFinished`                          | `Done` on success, `Browsing` + error otherwise  |
//!
//! Every fetch gets a fresh [`RequestId`]; only the latest one may change the
//! preview or trigger a write, so a newer request always wins.

use crate::error::GitignoreError;
use crate::fs_utils::GenerateOptions;
use crate::template::{TemplateCatalog, TemplateContent, TemplateName, TemplateQuery};
use std::collections::HashMap;
use std::path::PathBuf;

/// Identifies one fetch issued by the session
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LoadingCatalog,
    Browsing,
    Previewing,
    Generating,
    Done,
}

/// What the preview pane shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Hint,
    Loading,
    Content(TemplateContent),
    Message(String),
    Error(String),
}

#[derive(Debug)]
pub enum Action {
    ReloadCatalog,
    CatalogLoaded(Result<TemplateCatalog, GitignoreError>),
    SetFilter(String),
    MoveHighlight(isize),
    ToggleHighlighted,
    PreviewHighlighted,
    PreviewSelection,
    SetOutputDir(String),
    Generate,
    FetchFinished {
        request: RequestId,
        query: TemplateQuery,
        result: Result<TemplateContent, GitignoreError>,
    },
    WriteFinished(Result<PathBuf, GitignoreError>),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    LoadCatalog,
    Fetch {
        request: RequestId,
        query: TemplateQuery,
    },
    Write {
        dir: PathBuf,
        content: TemplateContent,
        options: GenerateOptions,
    },
    Quit,
}

/// Fetched content keyed by [`TemplateQuery::cache_key`]. Lives as long as the session.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, TemplateContent>,
}

impl ResultCache {
    #[must_use]
    pub fn get(&self, query: &TemplateQuery) -> Option<&TemplateContent> {
        self.entries.get(&query.cache_key())
    }

    pub fn insert(&mut self, query: &TemplateQuery, content: TemplateContent) {
        self.entries.insert(query.cache_key(), content);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Preview,
    Generate,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    catalog: TemplateCatalog,
    filter: String,
    visible: Vec<TemplateName>,
    highlighted: Option<usize>,
    selected: Vec<TemplateName>,
    output_dir: String,
    options: GenerateOptions,
    cache: ResultCache,
    preview: Preview,
    pending: Option<(RequestId, Intent)>,
    next_request: RequestId,
}

impl Session {
    #[must_use]
    pub fn new(output_dir: impl Into<String>, options: GenerateOptions) -> Self {
        Self {
            phase: Phase::LoadingCatalog,
            catalog: TemplateCatalog::default(),
            filter: String::new(),
            visible: Vec::new(),
            highlighted: None,
            selected: Vec::new(),
            output_dir: output_dir.into(),
            options,
            cache: ResultCache::default(),
            preview: Preview::Hint,
            pending: None,
            next_request: 0,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Catalog entries matching the current filter
    #[must_use]
    pub fn visible(&self) -> &[TemplateName] {
        &self.visible
    }

    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Selected names, in the order they were picked
    #[must_use]
    pub fn selected(&self) -> &[TemplateName] {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, name: &TemplateName) -> bool {
        self.selected.contains(name)
    }

    #[must_use]
    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    #[must_use]
    pub const fn preview(&self) -> &Preview {
        &self.preview
    }

    #[must_use]
    pub const fn cache(&self) -> &ResultCache {
        &self.cache
    }

    fn highlighted_name(&self) -> Option<&TemplateName> {
        self.highlighted.and_then(|i| self.visible.get(i))
    }

    fn refilter(&mut self) {
        self.visible = self.catalog.search(&self.filter);
        self.highlighted = match (self.visible.len(), self.highlighted) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
    }

    fn move_highlight(&mut self, delta: isize) {
        let Some(last) = self.visible.len().checked_sub(1) else {
            self.highlighted = None;
            return;
        };
        let current = self.highlighted.unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.highlighted = Some(next);
    }

    fn toggle_highlighted(&mut self) {
        let Some(name) = self.highlighted_name().cloned() else {
            return;
        };
        if let Some(pos) = self.selected.iter().position(|n| *n == name) {
            self.selected.remove(pos);
        } else {
            self.selected.push(name);
        }
        if self.phase == Phase::Done {
            self.phase = Phase::Browsing;
        }
    }

    fn selection_query(&self) -> Option<TemplateQuery> {
        TemplateQuery::new(self.selected.iter().cloned()).ok()
    }

    fn target_dir(&self) -> PathBuf {
        let dir = self.output_dir.trim();
        if dir.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(dir)
        }
    }

    fn issue(&mut self, intent: Intent, query: TemplateQuery) -> Effect {
        self.next_request += 1;
        let request = self.next_request;
        self.pending = Some((request, intent));
        Effect::Fetch { request, query }
    }

    fn write_effect(&self, content: TemplateContent) -> Effect {
        Effect::Write {
            dir: self.target_dir(),
            content,
            options: self.options.clone(),
        }
    }

    fn show_fetched(&mut self, query: &TemplateQuery, content: TemplateContent) {
        self.preview = if content.is_valid() {
            Preview::Content(content)
        } else {
            Preview::Error(format!("Template not found: {query}"))
        };
    }

    fn request_preview(&mut self, query: TemplateQuery) -> Effect {
        if let Some(content) = self.cache.get(&query).cloned() {
            self.pending = None;
            self.phase = Phase::Browsing;
            self.show_fetched(&query, content);
            return Effect::None;
        }
        self.phase = Phase::Previewing;
        self.preview = Preview::Loading;
        self.issue(Intent::Preview, query)
    }

    fn generate(&mut self) -> Effect {
        let Some(query) = self.selection_query() else {
            self.preview =
                Preview::Error("Please select at least one template (use Space)".to_string());
            return Effect::None;
        };
        match self.cache.get(&query).cloned() {
            Some(content) if content.is_valid() => {
                self.pending = None;
                self.phase = Phase::Generating;
                self.write_effect(content)
            }
            Some(_) => {
                self.pending = None;
                self.phase = Phase::Browsing;
                self.preview = Preview::Error(format!("Template not found: {query}"));
                Effect::None
            }
            None => {
                self.phase = Phase::Generating;
                self.preview = Preview::Loading;
                self.issue(Intent::Generate, query)
            }
        }
    }

    fn fetch_finished(
        &mut self,
        request: RequestId,
        query: &TemplateQuery,
        result: Result<TemplateContent, GitignoreError>,
    ) -> Effect {
        if let Ok(content) = &result {
            self.cache.insert(query, content.clone());
        }
        let intent = match self.pending {
            Some((current, intent)) if current == request => intent,
            _ => return Effect::None,
        };
        self.pending = None;

        match (intent, result) {
            (Intent::Preview, Ok(content)) => {
                self.phase = Phase::Browsing;
                self.show_fetched(query, content);
                Effect::None
            }
            (Intent::Generate, Ok(content)) if content.is_valid() => self.write_effect(content),
            (Intent::Generate, Ok(_)) => {
                self.phase = Phase::Browsing;
                self.preview =
                    Preview::Error(format!("Failed to fetch templates: not found: {query}"));
                Effect::None
            }
            (_, Err(e)) => {
                self.phase = Phase::Browsing;
                self.preview = Preview::Error(format!("Error: {e}"));
                Effect::None
            }
        }
    }
}

/// Applies `action` to `session` and returns what the front-end has to do next
pub fn update(session: &mut Session, action: Action) -> Effect {
    match action {
        Action::Quit => Effect::Quit,
        Action::ReloadCatalog => {
            session.phase = Phase::LoadingCatalog;
            session.pending = None;
            session.preview = Preview::Message("Loading templates...".to_string());
            Effect::LoadCatalog
        }
        Action::CatalogLoaded(result) => {
            // A fetch or write started while the list was loading owns phase and preview
            let owns_screen = session.phase == Phase::LoadingCatalog;
            if owns_screen {
                session.phase = Phase::Browsing;
            }
            match result {
                Ok(catalog) => {
                    session.catalog = catalog;
                    session.refilter();
                    if owns_screen {
                        session.preview = Preview::Hint;
                    }
                }
                Err(e) if owns_screen || session.pending.is_none() => {
                    session.preview = Preview::Error(format!("Error loading templates: {e}"));
                }
                Err(_) => {}
            }
            Effect::None
        }
        Action::SetFilter(filter) => {
            session.filter = filter;
            session.refilter();
            Effect::None
        }
        Action::MoveHighlight(delta) => {
            session.move_highlight(delta);
            Effect::None
        }
        Action::ToggleHighlighted => {
            session.toggle_highlighted();
            Effect::None
        }
        Action::PreviewHighlighted => match session.highlighted_name().cloned() {
            Some(name) => match TemplateQuery::new([name]) {
                Ok(query) => session.request_preview(query),
                Err(_) => Effect::None,
            },
            None => Effect::None,
        },
        Action::PreviewSelection => match session.selection_query() {
            Some(query) => session.request_preview(query),
            None => {
                session.preview = Preview::Message(
                    "Select at least one template (use Space) to preview".to_string(),
                );
                Effect::None
            }
        },
        Action::SetOutputDir(dir) => {
            session.output_dir = dir;
            Effect::None
        }
        Action::Generate => session.generate(),
        Action::FetchFinished {
            request,
            query,
            result,
        } => session.fetch_finished(request, &query, result),
        Action::WriteFinished(result) => {
            match result {
                Ok(path) => {
                    session.phase = Phase::Done;
                    session.preview = Preview::Message(format!(
                        "Success! File written to {}\n\nPress Esc to quit",
                        path.display()
                    ));
                }
                Err(e) => {
                    session.phase = Phase::Browsing;
                    session.preview = Preview::Error(format!("Error writing file: {e}"));
                }
            }
            Effect::None
        }
    }
}
