//! Interactive resolution of a single field.
//!
//! A [`Form`] asks for one value, either as free text or as a choice from a
//! list of options that is loaded in the background. When the loader returns
//! exactly one option it is selected without asking. The form never validates
//! the value; an empty string is a legitimate result.

use std::{fmt, future::Future, sync::Arc};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use futures::{future::BoxFuture, FutureExt};
use tracing::debug;

use super::{
    fetch::{Fetch, FetchMsg, Operation, Outcome, SUCCESS_DISPLAY_DELAY},
    program::{is_interrupt, is_quit, key_press, Cmd, Model, Program, TerminalError},
    styles,
};
use crate::{client::ApiError, context::CloudConfig};

/// Appended to the confirmation line of an auto-selected value
pub const ONLY_OPTION: &str = " (only option available)";
pub const LOADING_LABEL: &str = "fetching resources";
pub const CHAR_LIMIT: usize = 156;
const INPUT_WIDTH: usize = 50;
const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOption {
    pub label: String,
    pub value: String,
}

impl FormOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

pub type OptionsFuture = BoxFuture<'static, Result<Vec<FormOption>, ApiError>>;

/// Produces the options of a select field.
#[derive(Clone)]
pub struct OptionsLoader(Arc<dyn Fn(CloudConfig) -> OptionsFuture + Send + Sync>);

impl OptionsLoader {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(CloudConfig) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<FormOption>, ApiError>> + Send + 'static,
    {
        Self(Arc::new(move |config| f(config).boxed()))
    }

    /// A loader that always yields the same options.
    pub fn fixed(options: Vec<FormOption>) -> Self {
        Self::new(move |_| {
            let options = options.clone();
            async move { Ok(options) }
        })
    }

    pub fn load(&self, config: CloudConfig) -> OptionsFuture {
        (self.0)(config)
    }
}

pub enum FormField {
    TextInput { title: String },
    SingleSelect { title: String, options: OptionsLoader },
}

impl FormField {
    pub fn input(title: impl Into<String>) -> Self {
        FormField::TextInput { title: title.into() }
    }

    pub fn select(title: impl Into<String>, options: OptionsLoader) -> Self {
        FormField::SingleSelect {
            title: title.into(),
            options,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            FormField::TextInput { title } | FormField::SingleSelect { title, .. } => title,
        }
    }
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::TextInput { title } => f.debug_struct("TextInput").field("title", title).finish(),
            FormField::SingleSelect { title, .. } => {
                f.debug_struct("SingleSelect").field("title", title).finish_non_exhaustive()
            }
        }
    }
}

/// Case-insensitive subsequence match.
pub fn fuzzy_match(pattern: &str, text: &str) -> bool {
    let mut haystack = text.chars().flat_map(char::to_lowercase);
    pattern
        .chars()
        .flat_map(char::to_lowercase)
        .all(|wanted| haystack.any(|c| c == wanted))
}

#[derive(Debug, Default, Clone)]
struct TextInput {
    chars: Vec<char>,
    cursor: usize,
}

impl TextInput {
    fn value(&self) -> String {
        self.chars.iter().collect()
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.chars.len() < CHAR_LIMIT {
                    self.chars.insert(self.cursor, c);
                    self.cursor += 1;
                }
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.chars.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.chars.len() => {
                self.chars.remove(self.cursor);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.chars.len(),
            _ => {}
        }
    }

    fn view(&self) -> String {
        let start = self.cursor.saturating_sub(INPUT_WIDTH - 1);
        let end = (start + INPUT_WIDTH).min(self.chars.len());
        let before: String = self.chars[start..self.cursor].iter().collect();
        let under = self.chars.get(self.cursor).copied().unwrap_or(' ');
        let after: String = self.chars[(self.cursor + 1).min(end)..end].iter().collect();
        format!("> {}{}{}", before, color_print::cformat!("<rev>{}</>", under), after)
    }
}

#[derive(Debug, Default, Clone)]
struct SelectList {
    items: Vec<FormOption>,
    filter: String,
    filtering: bool,
    cursor: usize,
}

impl SelectList {
    fn visible(&self) -> Vec<&FormOption> {
        self.items
            .iter()
            .filter(|option| fuzzy_match(&self.filter, &option.label))
            .collect()
    }

    fn selected(&self) -> Option<&FormOption> {
        self.visible().get(self.cursor).copied()
    }

    fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.cursor = 0;
    }

    fn move_by(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Init,
    LoadingOptions,
    Ready,
    UserInput,
    ValueEntered,
    Failed,
    Cancelled,
}

pub enum FormMsg {
    Input(Event),
    Options(FetchMsg<Vec<FormOption>, ApiError>),
    Entered(String),
    /// The confirmation has been on screen long enough
    Close,
}

impl From<Event> for FormMsg {
    fn from(event: Event) -> Self {
        FormMsg::Input(event)
    }
}

pub struct Form {
    title: String,
    options: Option<Fetch<Vec<FormOption>, ApiError>>,
    select: bool,
    list: SelectList,
    input: TextInput,
    status: FormStatus,
    value: Option<String>,
    error: Option<ApiError>,
    meta: &'static str,
}

impl Form {
    pub fn new(config: &CloudConfig, field: FormField) -> Self {
        let (title, options) = match field {
            FormField::TextInput { title } => (title, None),
            FormField::SingleSelect { title, options } => {
                let config = config.clone();
                let operation = Operation::new(move || options.load(config.clone()));
                (title, Some(Fetch::new(LOADING_LABEL, operation)))
            }
        };

        Self {
            title,
            select: options.is_some(),
            options,
            list: SelectList::default(),
            input: TextInput::default(),
            status: FormStatus::Init,
            value: None,
            error: None,
            meta: "",
        }
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Options currently shown, after filtering.
    pub fn visible_options(&self) -> Vec<&FormOption> {
        self.list.visible()
    }

    /// A run that ends without a commit yields an empty value.
    pub fn into_outcome(self) -> Outcome<String, ApiError> {
        match (self.status, self.error) {
            (FormStatus::Cancelled, _) => Outcome::Cancelled,
            (_, Some(error)) => Outcome::Failed(error),
            (_, None) => Outcome::Succeeded(self.value.unwrap_or_default()),
        }
    }

    fn is_done(&self) -> bool {
        matches!(
            self.status,
            FormStatus::ValueEntered | FormStatus::Failed | FormStatus::Cancelled
        )
    }

    fn cancel(&mut self) -> Cmd<FormMsg> {
        debug!("'{}' cancelled", self.title);
        self.status = FormStatus::Cancelled;
        Cmd::Quit
    }

    fn options_loaded(&mut self, result: Result<Vec<FormOption>, ApiError>) -> Cmd<FormMsg> {
        if self.status != FormStatus::LoadingOptions {
            return Cmd::None;
        }
        // the loader has done its job; dropping it stops the spinner
        self.options = None;

        match result {
            Ok(options) => {
                debug!("Loaded {} option(s) for '{}'", options.len(), self.title);
                let only = match options.as_slice() {
                    [only] => Some(only.value.clone()),
                    _ => None,
                };
                self.list.items = options;
                match only {
                    // straight to the confirmation, the list is never drawn
                    Some(value) => {
                        self.meta = ONLY_OPTION;
                        self.value = Some(value);
                        self.status = FormStatus::ValueEntered;
                        Cmd::After(SUCCESS_DISPLAY_DELAY, FormMsg::Close)
                    }
                    None => {
                        self.status = FormStatus::Ready;
                        Cmd::None
                    }
                }
            }
            Err(error) => {
                self.error = Some(error);
                self.status = FormStatus::Failed;
                Cmd::Quit
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<FormMsg> {
        if self.is_done() {
            return Cmd::None;
        }
        if is_interrupt(&key) {
            return self.cancel();
        }

        match self.status {
            FormStatus::UserInput => match key.code {
                KeyCode::Enter => Cmd::Emit(FormMsg::Entered(self.input.value())),
                KeyCode::Esc => self.cancel(),
                _ => {
                    self.input.handle_key(&key);
                    Cmd::None
                }
            },
            FormStatus::Ready => self.handle_list_key(key),
            FormStatus::LoadingOptions if is_quit(&key) => self.cancel(),
            _ => Cmd::None,
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Cmd<FormMsg> {
        if self.list.filtering {
            match key.code {
                // applies the filter, never commits
                KeyCode::Enter => self.list.filtering = false,
                KeyCode::Esc => {
                    self.list.filtering = false;
                    self.list.set_filter(String::new());
                }
                KeyCode::Backspace => {
                    let mut filter = self.list.filter.clone();
                    filter.pop();
                    self.list.set_filter(filter);
                }
                KeyCode::Up => self.list.move_by(-1),
                KeyCode::Down => self.list.move_by(1),
                KeyCode::Char(c) => {
                    let filter = format!("{}{}", self.list.filter, c);
                    self.list.set_filter(filter);
                }
                _ => {}
            }
            return Cmd::None;
        }

        match key.code {
            KeyCode::Enter => {
                let value = self
                    .list
                    .selected()
                    .map(|option| option.value.clone())
                    .unwrap_or_default();
                Cmd::Emit(FormMsg::Entered(value))
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.move_by(-1);
                Cmd::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.move_by(1);
                Cmd::None
            }
            KeyCode::Char('/') => {
                self.list.filtering = true;
                Cmd::None
            }
            KeyCode::Esc if !self.list.filter.is_empty() => {
                self.list.set_filter(String::new());
                Cmd::None
            }
            KeyCode::Esc | KeyCode::Char('q') => self.cancel(),
            _ => Cmd::None,
        }
    }

    fn list_view(&self) -> String {
        let mut lines = vec![styles::title(&self.title)];
        if self.list.filtering || !self.list.filter.is_empty() {
            let caret = if self.list.filtering { "█" } else { "" };
            lines.push(format!("Filter: {}{}", self.list.filter, caret));
        }

        let visible = self.list.visible();
        if visible.is_empty() {
            lines.push(styles::help("No items."));
        }
        let start = self.list.cursor.saturating_sub(PAGE_SIZE - 1);
        for (index, option) in visible.iter().enumerate().skip(start).take(PAGE_SIZE) {
            if index == self.list.cursor {
                lines.push(styles::highlight(&format!("> {}", option.label)));
            } else {
                lines.push(format!("  {}", option.label));
            }
        }

        let help = if self.list.filtering {
            "enter apply filter • esc clear filter"
        } else {
            "↑/↓ navigate • / filter • enter select • esc quit"
        };
        lines.push(styles::help(help));
        lines.join("\n")
    }
}

impl Model for Form {
    type Msg = FormMsg;

    fn init(&mut self) -> Cmd<FormMsg> {
        match self.options.as_mut() {
            Some(fetch) => {
                self.status = FormStatus::LoadingOptions;
                fetch.init().map(FormMsg::Options)
            }
            None if self.select => {
                self.status = FormStatus::Ready;
                Cmd::None
            }
            None => {
                self.status = FormStatus::UserInput;
                Cmd::None
            }
        }
    }

    fn update(&mut self, msg: FormMsg) -> Cmd<FormMsg> {
        match msg {
            FormMsg::Options(FetchMsg::Completed(result)) => self.options_loaded(result),
            FormMsg::Options(msg) => match self.options.as_mut() {
                Some(fetch) => fetch.update(msg).map(FormMsg::Options),
                None => Cmd::None,
            },
            FormMsg::Entered(value) => {
                self.status = FormStatus::ValueEntered;
                self.value = Some(value);
                Cmd::After(SUCCESS_DISPLAY_DELAY, FormMsg::Close)
            }
            FormMsg::Close => Cmd::Quit,
            FormMsg::Input(event) => match key_press(&event) {
                Some(key) => self.handle_key(*key),
                None => Cmd::None,
            },
        }
    }

    fn view(&self) -> String {
        match self.status {
            FormStatus::Init | FormStatus::Cancelled => String::new(),
            FormStatus::LoadingOptions => self
                .options
                .as_ref()
                .map(|fetch| fetch.view())
                .unwrap_or_default(),
            FormStatus::Ready => self.list_view(),
            FormStatus::UserInput => format!("{}: {}", self.title, self.input.view()),
            FormStatus::ValueEntered => {
                styles::entered(&self.title, self.value.as_deref().unwrap_or_default(), self.meta)
            }
            FormStatus::Failed => self
                .error
                .as_ref()
                .map(|error| styles::error(&error.to_string()))
                .unwrap_or_default(),
        }
    }
}

/// Ask for the field on the terminal.
pub async fn run(config: &CloudConfig, field: FormField) -> Result<Outcome<String, ApiError>, TerminalError> {
    Ok(Program::new(Form::new(config, field)).run().await?.into_outcome())
}
