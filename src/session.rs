//! Interactive session state: the current query, the language, the
//! highlighted suggestion and the line commands that drive them.
//!
//! A plain line of input is a new query. Lines starting with `:` are
//! commands:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `:down` / `:up` | move the suggestion highlight |
//! | `:pick [n]` | search the highlighted (or n-th) suggestion |
//! | `:accept` | search the "did you mean" recommendation |
//! | `:clear` | clear the query and the display |
//! | `:retry` | run the current query again |
//! | `:lang <tag>` | switch language and re-run the query |
//! | `:help` / `:quit` | |

use wikifind_search::{Language, ResultView};

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// New query text (may be blank, which clears).
    Query(String),
    /// A `:` command.
    Command(Command),
    /// A `:` line that is not a known command.
    Unknown(String),
}

/// Session commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Down,
    Up,
    /// 1-based suggestion number, or the highlighted one.
    Pick(Option<usize>),
    Accept,
    Clear,
    Retry,
    Lang(String),
    Help,
    Quit,
}

/// Parse one line of input.
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Input::Query(trimmed.to_owned());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    let parsed = match (name, arg) {
        ("down" | "d", None) => Command::Down,
        ("up" | "u", None) => Command::Up,
        ("pick" | "p", None) => Command::Pick(None),
        ("pick" | "p", Some(n)) => match n.parse() {
            Ok(n) => Command::Pick(Some(n)),
            Err(_) => return Input::Unknown(trimmed.to_owned()),
        },
        ("accept" | "a", None) => Command::Accept,
        ("clear" | "c", None) => Command::Clear,
        ("retry" | "r", None) => Command::Retry,
        ("lang" | "l", Some(tag)) => Command::Lang(tag.to_owned()),
        ("help" | "h" | "?", None) => Command::Help,
        ("quit" | "q" | "exit", None) => Command::Quit,
        _ => return Input::Unknown(trimmed.to_owned()),
    };
    if parts.next().is_some() {
        return Input::Unknown(trimmed.to_owned());
    }
    Input::Command(parsed)
}

/// Keyboard-style highlight over the current suggestion list.
///
/// Starts with nothing highlighted. Moving down stops at the last entry;
/// moving up from the first entry removes the highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionCursor {
    items: Vec<String>,
    index: Option<usize>,
}

impl SuggestionCursor {
    /// Replace the suggestions and reset the highlight.
    pub fn set(&mut self, items: Vec<String>) {
        self.items = items;
        self.index = None;
    }

    pub fn down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.index = Some(self.index.map_or(0, |i| (i + 1).min(last)));
    }

    pub fn up(&mut self) {
        self.index = match self.index {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Highlighted position, if any.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Highlighted suggestion, if any.
    pub fn selected(&self) -> Option<&str> {
        self.index.and_then(|i| self.items.get(i)).map(String::as_str)
    }

    /// Suggestion by 1-based position.
    pub fn nth(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

/// What the front end should do after handling input.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Submit this text as the query.
    Search(String),
    /// Clear the query and the display.
    Clear,
    /// Redraw the last view (the highlight moved).
    Redraw,
    /// The language changed; persist it and re-run the current query.
    ChangeLanguage(Language),
    /// Show command help.
    Help,
    /// Exit.
    Quit,
    /// Tell the user something without searching.
    Notice(String),
}

/// Per-run interactive state.
#[derive(Debug, Clone)]
pub struct Session {
    language: Language,
    query: String,
    cursor: SuggestionCursor,
    recommendation: Option<String>,
    last_view: Option<ResultView>,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            query: String::new(),
            cursor: SuggestionCursor::default(),
            recommendation: None,
            last_view: None,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// The current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> &SuggestionCursor {
        &self.cursor
    }

    /// The most recent view delivered by the search core.
    pub fn last_view(&self) -> Option<&ResultView> {
        self.last_view.as_ref()
    }

    /// Record a view from the search core.
    pub fn on_view(&mut self, view: ResultView) {
        match &view {
            ResultView::Suggestions { suggestions, .. } => {
                self.cursor.set(suggestions.clone());
                self.recommendation = None;
            }
            ResultView::Results { recommendation, .. } => {
                self.cursor.set(Vec::new());
                self.recommendation = recommendation.clone();
            }
            _ => {
                self.cursor.set(Vec::new());
                self.recommendation = None;
            }
        }
        self.last_view = Some(view);
    }

    /// Apply one line of input.
    pub fn handle(&mut self, input: Input) -> Action {
        match input {
            Input::Query(text) => self.search(text),
            Input::Unknown(line) => Action::Notice(format!("unknown command: {line} (:help)")),
            Input::Command(command) => self.command(command),
        }
    }

    fn command(&mut self, command: Command) -> Action {
        match command {
            Command::Down => {
                self.cursor.down();
                Action::Redraw
            }
            Command::Up => {
                self.cursor.up();
                Action::Redraw
            }
            Command::Pick(n) => {
                let picked = match n {
                    Some(n) => self.cursor.nth(n),
                    None => self.cursor.selected(),
                };
                match picked.map(str::to_owned) {
                    Some(text) => self.search(text),
                    None => Action::Notice("no suggestion selected".into()),
                }
            }
            Command::Accept => match self.recommendation.clone() {
                Some(term) => self.search(term),
                None => Action::Notice("nothing to accept".into()),
            },
            Command::Clear => self.search(String::new()),
            Command::Retry => {
                if self.query.is_empty() {
                    Action::Notice("nothing to retry".into())
                } else {
                    Action::Search(self.query.clone())
                }
            }
            Command::Lang(tag) => match Language::new(&tag) {
                Ok(language) => {
                    self.language = language.clone();
                    Action::ChangeLanguage(language)
                }
                Err(e) => Action::Notice(e.to_string()),
            },
            Command::Help => Action::Help,
            Command::Quit => Action::Quit,
        }
    }

    fn search(&mut self, text: String) -> Action {
        let text = text.trim().to_owned();
        self.query.clone_from(&text);
        if text.is_empty() {
            self.cursor.set(Vec::new());
            self.recommendation = None;
            self.last_view = None;
            Action::Clear
        } else {
            Action::Search(text)
        }
    }
}
