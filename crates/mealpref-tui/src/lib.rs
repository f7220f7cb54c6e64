// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use mealpref_app::{
    Allergy, AllergyField, AppCommand, AppMode, AppState, Bounds, COMMON_ALLERGIES, DislikedFood,
    Dropdown, DropdownEvent, EditorCommand, EntityKind, FavoriteFood, FormCommand,
    INSTRUCTION_EXAMPLES, ItemId, LengthLevel, ListEditor, MAX_INSTRUCTIONS_CHARS, Panel,
    PointerHub, PreferencesPayload, Profile, ProfileForm,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const DROPDOWN_WIDTH: u16 = 32;
const ROLE_LABEL: &str = "Zenaris Nutzer";
const INSTRUCTIONS_PLACEHOLDER: &str =
    "Texture preferences, temperature preferences, cultural/religious restrictions...";

pub trait AppRuntime {
    fn submit_preferences(&mut self, payload: &PreferencesPayload) -> Result<()>;
    fn cancel_preferences(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Draft,
    Edit,
}

impl Slot {
    fn field_command<F>(self, field: F) -> EditorCommand<F> {
        match self {
            Self::Draft => EditorCommand::SetDraftField(field),
            Self::Edit => EditorCommand::SetEditField(field),
        }
    }

    fn name_action(self, name: String) -> ListAction {
        match self {
            Self::Draft => ListAction::SetDraftName(name),
            Self::Edit => ListAction::SetEditName(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputTarget {
    List(Slot),
    Instructions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ListAction {
    SetDraftName(String),
    Add,
    Remove(ItemId),
    StartEdit(ItemId),
    SetEditName(String),
    CommitEdit,
    CancelEdit,
}

impl ListAction {
    fn into_command<F>(self) -> EditorCommand<F> {
        match self {
            Self::SetDraftName(name) => EditorCommand::SetDraftName(name),
            Self::Add => EditorCommand::Add,
            Self::Remove(id) => EditorCommand::Remove(id),
            Self::StartEdit(id) => EditorCommand::StartEdit(id),
            Self::SetEditName(name) => EditorCommand::SetEditName(name),
            Self::CommitEdit => EditorCommand::CommitEdit,
            Self::CancelEdit => EditorCommand::CancelEdit,
        }
    }
}

#[derive(Debug)]
struct PanelDropdown {
    panel: Panel,
    slot: Slot,
    widget: Dropdown<&'static str>,
    area: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Default)]
struct ViewData {
    cursor: usize,
    input: Option<InputTarget>,
    dropdown: Option<PanelDropdown>,
    hub: PointerHub,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(error) = execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture) {
        let _ = restore_terminal();
        return Err(error).context("enter alternate screen");
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(error) => {
            let _ = restore_terminal();
            return Err(error).context("create terminal");
        }
    };

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();
    info!(profile = %state.form.profile().name, "form opened");

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        match terminal.size() {
            Ok(size) => {
                sync_dropdown_bounds(&mut view_data, Rect::new(0, 0, size.width, size.height));
            }
            Err(error) => {
                result = Err(error).context("read terminal size");
                break;
            }
        }

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let next = match poll_event(Duration::from_millis(120)) {
            Ok(next) => next,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if let Some(event) = next
            && handle_event(state, runtime, &mut view_data, &internal_tx, event)
        {
            break;
        }
    }

    let restored = restore_terminal();
    result.and(restored)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )
    .context("leave alternate screen")
}

fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if !event::poll(timeout).context("poll event")? {
        return Ok(None);
    }
    event::read().context("read event").map(Some)
}

// Returns true when the app should quit.
fn handle_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    event: Event,
) -> bool {
    match event {
        Event::Key(key) => handle_key_event(state, runtime, view_data, internal_tx, key),
        Event::Mouse(mouse) => {
            if let MouseEventKind::Down(_) = mouse.kind {
                handle_mouse_down(state, view_data, mouse.column, mouse.row);
            }
            false
        }
        _ => false,
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.dropdown.is_some() {
        handle_dropdown_key(state, view_data, internal_tx, key);
        return false;
    }

    match state.mode {
        AppMode::Input => handle_input_key(state, view_data, internal_tx, key),
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('f'), KeyModifiers::NONE) | (KeyCode::Tab, _) => {
            state.dispatch(AppCommand::NextPanel);
            view_data.cursor = 0;
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) | (KeyCode::BackTab, _) => {
            state.dispatch(AppCommand::PrevPanel);
            view_data.cursor = 0;
        }
        (KeyCode::Char('j') | KeyCode::Down, _) => move_cursor(state, view_data, 1),
        (KeyCode::Char('k') | KeyCode::Up, _) => move_cursor(state, view_data, -1),
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            if state.focus == Panel::Instructions {
                begin_instructions(state, view_data);
            } else {
                view_data.input = Some(InputTarget::List(Slot::Draft));
                state.dispatch(AppCommand::EnterInput);
            }
        }
        (KeyCode::Char('e') | KeyCode::Enter, _) => begin_edit(state, view_data, internal_tx),
        (KeyCode::Char('d'), KeyModifiers::NONE) => remove_selected(state, view_data, internal_tx),
        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            open_dropdown(state, view_data, internal_tx, Slot::Draft);
        }
        (KeyCode::Char(digit @ '1'..='6'), _) => {
            let index = digit as usize - '1' as usize;
            add_preset(state, view_data, internal_tx, index);
        }
        (KeyCode::Char('i'), KeyModifiers::NONE) => begin_instructions(state, view_data),
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            save_preferences(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('x'), KeyModifiers::NONE) => {
            revert_preferences(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        _ => {}
    }
}

fn handle_input_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match view_data.input {
        Some(InputTarget::Instructions) => {
            handle_instructions_key(state, view_data, internal_tx, key);
        }
        Some(InputTarget::List(slot)) => {
            handle_list_input_key(state, view_data, internal_tx, slot, key);
        }
        None => leave_input(state, view_data),
    }
}

fn handle_instructions_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let ch = match key.code {
        KeyCode::Esc => {
            leave_input(state, view_data);
            return;
        }
        KeyCode::Backspace => {
            state.dispatch(AppCommand::Form(FormCommand::InstructionsBackspace));
            return;
        }
        KeyCode::Enter => '\n',
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => ch,
        _ => return,
    };
    let events = state.dispatch(AppCommand::Form(FormCommand::PushInstructionChar(ch)));
    if events.is_empty() {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("special instructions are limited to {MAX_INSTRUCTIONS_CHARS} characters"),
        );
    }
}

fn handle_list_input_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    slot: Slot,
    key: KeyEvent,
) {
    let panel = state.focus;
    match key.code {
        KeyCode::Esc => {
            if slot == Slot::Edit {
                dispatch_list(state, panel, ListAction::CancelEdit);
            }
            leave_input(state, view_data);
        }
        KeyCode::Enter => match slot {
            Slot::Draft => {
                if dispatch_list(state, panel, ListAction::Add) {
                    emit_status(state, view_data, internal_tx, format!("{} added", noun(panel)));
                }
            }
            Slot::Edit => {
                if dispatch_list(state, panel, ListAction::CommitEdit) {
                    leave_input(state, view_data);
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("{} updated", noun(panel)),
                    );
                }
            }
        },
        KeyCode::Tab => open_dropdown(state, view_data, internal_tx, slot),
        KeyCode::Backspace => {
            let current = slot_name(&state.form, panel, slot).map(str::to_owned);
            if let Some(mut name) = current {
                name.pop();
                dispatch_list(state, panel, slot.name_action(name));
            }
        }
        KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if slot != Slot::Edit || panel != Panel::Allergies {
                return;
            }
            let flag = state
                .form
                .allergies
                .editing()
                .map(|session| !session.draft.attributes.is_common);
            if let Some(flag) = flag {
                state.dispatch(AppCommand::Form(FormCommand::Allergies(
                    EditorCommand::SetEditField(AllergyField::Common(flag)),
                )));
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let current = slot_name(&state.form, panel, slot).map(str::to_owned);
            if let Some(mut name) = current {
                name.push(ch);
                dispatch_list(state, panel, slot.name_action(name));
            }
        }
        _ => {}
    }
}

fn handle_dropdown_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(open) = view_data.dropdown.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => open.widget.highlight_next(),
        KeyCode::Char('k') | KeyCode::Up => open.widget.highlight_prev(),
        KeyCode::Enter => {
            let Some(DropdownEvent::Changed(value)) = open.widget.select_highlighted() else {
                return;
            };
            let (panel, slot) = (open.panel, open.slot);
            view_data.dropdown = None;
            apply_choice(state, view_data, internal_tx, panel, slot, value);
        }
        KeyCode::Esc => {
            open.widget.close();
            view_data.dropdown = None;
        }
        _ => {}
    }
}

fn handle_mouse_down(state: &mut AppState, view_data: &mut ViewData, column: u16, row: u16) {
    let notified = view_data.hub.pointer_down(column, row);
    debug!(column, row, notified, "pointer down");

    let Some(open) = view_data.dropdown.as_mut() else {
        return;
    };
    if open.widget.take_outside_close().is_some() {
        view_data.dropdown = None;
        return;
    }
    let Some(value) = option_under_pointer(open, row) else {
        return;
    };
    open.widget.select(value);
    let (panel, slot) = (open.panel, open.slot);
    view_data.dropdown = None;
    if let Some(command) = choice_command(panel, slot, value) {
        state.dispatch(AppCommand::Form(command));
    }
}

fn option_under_pointer(open: &PanelDropdown, row: u16) -> Option<&'static str> {
    let offset = row.checked_sub(open.area.y.saturating_add(1))?;
    open.widget
        .options()
        .get(usize::from(offset))
        .map(|option| option.value)
}

fn sync_dropdown_bounds(view_data: &mut ViewData, frame_area: Rect) {
    let Some(open) = view_data.dropdown.as_mut() else {
        return;
    };
    let area = dropdown_rect(frame_area, open.widget.options().len());
    open.area = area;
    open.widget
        .set_bounds(Bounds::new(area.x, area.y, area.width, area.height));
}

fn open_dropdown(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    slot: Slot,
) {
    let panel = state.focus;
    let Some(mut widget) = slot_dropdown(&state.form, panel, slot) else {
        emit_status(state, view_data, internal_tx, "no choices on this panel");
        return;
    };
    widget.open(&view_data.hub);
    view_data.dropdown = Some(PanelDropdown {
        panel,
        slot,
        widget,
        area: Rect::default(),
    });
}

fn apply_choice(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    panel: Panel,
    slot: Slot,
    value: &str,
) {
    match choice_command(panel, slot, value) {
        Some(command) => {
            state.dispatch(AppCommand::Form(command));
        }
        None => emit_status(
            state,
            view_data,
            internal_tx,
            format!("unknown choice {value:?}"),
        ),
    }
}

fn begin_instructions(state: &mut AppState, view_data: &mut ViewData) {
    if state.focus != Panel::Instructions {
        state.dispatch(AppCommand::FocusPanel(Panel::Instructions));
        view_data.cursor = 0;
    }
    view_data.input = Some(InputTarget::Instructions);
    state.dispatch(AppCommand::EnterInput);
}

fn begin_edit(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let panel = state.focus;
    if panel == Panel::Instructions {
        begin_instructions(state, view_data);
        return;
    }
    let Some(id) = selected_id(state, view_data) else {
        emit_status(state, view_data, internal_tx, "nothing to edit");
        return;
    };
    if dispatch_list(state, panel, ListAction::StartEdit(id)) {
        view_data.input = Some(InputTarget::List(Slot::Edit));
        state.dispatch(AppCommand::EnterInput);
    }
}

fn remove_selected(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let panel = state.focus;
    let Some(id) = selected_id(state, view_data) else {
        return;
    };
    if dispatch_list(state, panel, ListAction::Remove(id)) {
        clamp_cursor(state, view_data);
        emit_status(state, view_data, internal_tx, format!("{} removed", noun(panel)));
    }
}

fn add_preset(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    index: usize,
) {
    let Some(name) = COMMON_ALLERGIES.get(index) else {
        return;
    };
    if state.focus != Panel::Allergies {
        state.dispatch(AppCommand::FocusPanel(Panel::Allergies));
        view_data.cursor = 0;
    }
    let events = state.dispatch(AppCommand::Form(FormCommand::Allergies(
        EditorCommand::PresetAdd((*name).to_owned()),
    )));
    if !events.is_empty() {
        emit_status(state, view_data, internal_tx, format!("{name} added"));
    }
}

fn save_preferences<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let payload = state.form.payload();
    let submitted = payload
        .validate()
        .and_then(|()| runtime.submit_preferences(&payload));
    if let Err(error) = submitted {
        warn!(error = %format!("{error:#}"), "save failed");
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("save failed: {error:#}"),
        );
        return;
    }
    state.dispatch(AppCommand::MarkSaved);
    emit_status(
        state,
        view_data,
        internal_tx,
        format!("preferences saved ({} items)", payload.item_count()),
    );
}

fn revert_preferences<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    view_data.dropdown = None;
    view_data.input = None;
    state.dispatch(AppCommand::Revert);
    clamp_cursor(state, view_data);
    if let Err(error) = runtime.cancel_preferences() {
        warn!(error = %format!("{error:#}"), "cancel failed");
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("cancel failed: {error:#}"),
        );
        return;
    }
    emit_status(state, view_data, internal_tx, "changes discarded");
}

fn leave_input(state: &mut AppState, view_data: &mut ViewData) {
    view_data.input = None;
    state.dispatch(AppCommand::ExitToNav);
}

fn move_cursor(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let len = state.form.display_order(state.focus).len();
    if len == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = view_data.cursor as isize + delta;
    view_data.cursor = next.clamp(0, len as isize - 1) as usize;
}

fn clamp_cursor(state: &AppState, view_data: &mut ViewData) {
    let len = state.form.display_order(state.focus).len();
    view_data.cursor = view_data.cursor.min(len.saturating_sub(1));
}

fn selected_id(state: &AppState, view_data: &ViewData) -> Option<ItemId> {
    state
        .form
        .display_order(state.focus)
        .get(view_data.cursor)
        .copied()
}

fn list_command(panel: Panel, action: ListAction) -> Option<FormCommand> {
    match panel {
        Panel::FavoriteFoods => Some(FormCommand::Favorites(action.into_command())),
        Panel::DislikedFoods => Some(FormCommand::Disliked(action.into_command())),
        Panel::Allergies => Some(FormCommand::Allergies(action.into_command())),
        Panel::Instructions => None,
    }
}

fn dispatch_list(state: &mut AppState, panel: Panel, action: ListAction) -> bool {
    let Some(command) = list_command(panel, action) else {
        return false;
    };
    !state.dispatch(AppCommand::Form(command)).is_empty()
}

fn choice_command(panel: Panel, slot: Slot, value: &str) -> Option<FormCommand> {
    match panel {
        Panel::FavoriteFoods => FavoriteFood::parse_choice(value)
            .map(|field| FormCommand::Favorites(slot.field_command(field))),
        Panel::DislikedFoods => DislikedFood::parse_choice(value)
            .map(|field| FormCommand::Disliked(slot.field_command(field))),
        Panel::Allergies => {
            Allergy::parse_choice(value).map(|field| FormCommand::Allergies(slot.field_command(field)))
        }
        Panel::Instructions => None,
    }
}

fn editor_name<K: EntityKind>(editor: &ListEditor<K>, slot: Slot) -> Option<&str> {
    match slot {
        Slot::Draft => Some(editor.draft().name.as_str()),
        Slot::Edit => editor.editing().map(|session| session.draft.name.as_str()),
    }
}

fn slot_name(form: &ProfileForm, panel: Panel, slot: Slot) -> Option<&str> {
    match panel {
        Panel::FavoriteFoods => editor_name(&form.favorites, slot),
        Panel::DislikedFoods => editor_name(&form.disliked, slot),
        Panel::Allergies => editor_name(&form.allergies, slot),
        Panel::Instructions => None,
    }
}

fn editor_dropdown<K: EntityKind>(
    editor: &ListEditor<K>,
    slot: Slot,
) -> Option<Dropdown<&'static str>> {
    let attributes = match slot {
        Slot::Draft => &editor.draft().attributes,
        Slot::Edit => &editor.editing()?.draft.attributes,
    };
    Some(Dropdown::new(
        K::choice_options(),
        K::choice_value(attributes),
        K::CHOICE_PLACEHOLDER,
    ))
}

fn slot_dropdown(form: &ProfileForm, panel: Panel, slot: Slot) -> Option<Dropdown<&'static str>> {
    match panel {
        Panel::FavoriteFoods => editor_dropdown(&form.favorites, slot),
        Panel::DislikedFoods => editor_dropdown(&form.disliked, slot),
        Panel::Allergies => editor_dropdown(&form.allergies, slot),
        Panel::Instructions => None,
    }
}

fn noun(panel: Panel) -> &'static str {
    match panel {
        Panel::FavoriteFoods => FavoriteFood::NOUN,
        Panel::DislikedFoods => DislikedFood::NOUN,
        Panel::Allergies => Allergy::NOUN,
        Panel::Instructions => "instructions",
    }
}

fn draft_placeholder(panel: Panel) -> &'static str {
    match panel {
        Panel::FavoriteFoods => "Add favorite food...",
        Panel::DislikedFoods => "Add disliked food...",
        Panel::Allergies => "Other allergy/intolerance...",
        Panel::Instructions => INSTRUCTIONS_PLACEHOLDER,
    }
}

fn panel_color(panel: Panel) -> Color {
    match panel {
        Panel::FavoriteFoods => Color::Green,
        Panel::DislikedFoods => Color::Yellow,
        Panel::Allergies => Color::Red,
        Panel::Instructions => Color::Magenta,
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(render_header_text(state.form.profile()))
        .block(Block::default().title("Meal Preferences").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let selected = Panel::ALL
        .iter()
        .position(|panel| *panel == state.focus)
        .unwrap_or(0);
    let tab_titles = Panel::ALL
        .iter()
        .map(|panel| tab_title(*panel, &state.form))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("mealpref").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(panel_color(state.focus))
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[1]);

    if state.focus == Panel::Instructions {
        render_instructions(frame, layout[2], state, view_data);
    } else {
        let body = Paragraph::new(render_list_text(state, view_data))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(state.focus.label())
                    .border_style(Style::default().fg(panel_color(state.focus))),
            );
        frame.render_widget(body, layout[2]);
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[3]);

    if let Some(open) = &view_data.dropdown {
        let area = dropdown_rect(frame.area(), open.widget.options().len());
        frame.render_widget(Clear, area);
        let list = Paragraph::new(render_dropdown_text(&open.widget)).block(
            Block::default()
                .title(open.widget.display_label().to_owned())
                .borders(Borders::ALL)
                .style(Style::default().fg(panel_color(open.panel))),
        );
        frame.render_widget(list, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_instructions(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Panel::Instructions.label())
        .border_style(Style::default().fg(panel_color(Panel::Instructions)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let body = Paragraph::new(render_instructions_text(state, view_data)).wrap(Wrap { trim: false });
    frame.render_widget(body, parts[0]);

    let instructions = &state.form.instructions;
    let counter_color = match instructions.level() {
        LengthLevel::Warning => Color::Red,
        LengthLevel::Normal => Color::Magenta,
    };
    let counter = Paragraph::new(instructions.counter_label())
        .style(Style::default().fg(counter_color))
        .alignment(Alignment::Right);
    frame.render_widget(counter, parts[1]);
}

fn render_header_text(profile: &Profile) -> String {
    [
        format!(
            "[{}] {}  {}  {}",
            profile.initial(),
            profile.name,
            profile.emoji,
            ROLE_LABEL
        ),
        format!(
            "Geburtstag {} | Emoji {} | Zuletzt Online {}",
            profile.birthday_label(),
            profile.emoji,
            profile.last_online_label
        ),
    ]
    .join("\n")
}

fn tab_title(panel: Panel, form: &ProfileForm) -> String {
    if panel.is_list() {
        format!("{} ({})", panel.label(), form.item_count(panel))
    } else {
        panel.label().to_owned()
    }
}

fn render_list_text(state: &AppState, view_data: &ViewData) -> String {
    let form = &state.form;
    let selected = selected_id(state, view_data);
    let typing_draft = state.mode == AppMode::Input
        && view_data.input == Some(InputTarget::List(Slot::Draft));

    let mut lines = Vec::new();
    match state.focus {
        Panel::FavoriteFoods => {
            let draft = form.favorites.draft();
            lines.push(draft_line(
                Panel::FavoriteFoods,
                &draft.name,
                draft.attributes.category.label(),
                typing_draft,
            ));
            lines.push(String::new());
            if form.favorites.is_empty() {
                lines.push("No favorite foods added yet".to_owned());
            }
            for (category, items) in form.favorites.grouped() {
                lines.push(category.label().to_owned());
                for item in items {
                    let line = match form.favorites.editing() {
                        Some(session) if session.id == item.id => edit_line(
                            &session.draft.name,
                            session.draft.attributes.category.label(),
                        ),
                        _ => format!("  {}", item.name),
                    };
                    lines.push(mark_selected(line, selected == Some(item.id)));
                }
            }
        }
        Panel::DislikedFoods => {
            let draft = form.disliked.draft();
            lines.push(draft_line(
                Panel::DislikedFoods,
                &draft.name,
                draft.attributes.severity.label(),
                typing_draft,
            ));
            lines.push(String::new());
            if form.disliked.is_empty() {
                lines.push("No disliked foods added yet".to_owned());
            }
            for item in form.disliked.items() {
                let line = match form.disliked.editing() {
                    Some(session) if session.id == item.id => edit_line(
                        &session.draft.name,
                        session.draft.attributes.severity.label(),
                    ),
                    _ => format!("  {} ({})", item.name, item.attributes.severity.label()),
                };
                lines.push(mark_selected(line, selected == Some(item.id)));
            }
        }
        Panel::Allergies => {
            let presets = COMMON_ALLERGIES
                .iter()
                .enumerate()
                .map(|(index, name)| format!("{} {name}", index + 1))
                .collect::<Vec<String>>()
                .join("  ");
            lines.push(format!("Common Allergies: {presets}"));
            let draft = form.allergies.draft();
            lines.push(draft_line(
                Panel::Allergies,
                &draft.name,
                draft.attributes.severity.label(),
                typing_draft,
            ));
            lines.push(String::new());
            if form.allergies.is_empty() {
                lines.push("No allergies or intolerances added yet".to_owned());
            }
            for item in form.allergies.items() {
                let line = match form.allergies.editing() {
                    Some(session) if session.id == item.id => {
                        let mut line = edit_line(
                            &session.draft.name,
                            session.draft.attributes.severity.label(),
                        );
                        if session.draft.attributes.is_common {
                            line.push_str(" common");
                        }
                        line
                    }
                    _ => {
                        let common = if item.attributes.is_common {
                            " · common"
                        } else {
                            ""
                        };
                        format!(
                            "  {} ({}){common}",
                            item.name,
                            item.attributes.severity.label()
                        )
                    }
                };
                lines.push(mark_selected(line, selected == Some(item.id)));
            }
        }
        Panel::Instructions => {}
    }
    lines.join("\n")
}

fn draft_line(panel: Panel, name: &str, choice: &str, typing: bool) -> String {
    let shown = if name.is_empty() && !typing {
        draft_placeholder(panel)
    } else {
        name
    };
    let cursor = if typing { "_" } else { "" };
    format!("+ {shown}{cursor} [{choice}]")
}

fn edit_line(name: &str, choice: &str) -> String {
    format!("  ✎ {name}_ [{choice}]")
}

fn mark_selected(line: String, selected: bool) -> String {
    if selected {
        format!(">{}", &line[1..])
    } else {
        line
    }
}

fn render_instructions_text(state: &AppState, view_data: &ViewData) -> String {
    let typing = view_data.input == Some(InputTarget::Instructions);
    let text = state.form.instructions.text();
    let mut lines = Vec::new();
    if text.is_empty() && !typing {
        lines.push(INSTRUCTIONS_PLACEHOLDER.to_owned());
    } else if typing {
        lines.push(format!("{text}_"));
    } else {
        lines.push(text.to_owned());
    }
    lines.push(String::new());
    lines.push("Examples:".to_owned());
    for example in INSTRUCTION_EXAMPLES {
        lines.push(format!("  - {example}"));
    }
    lines.join("\n")
}

fn render_dropdown_text(widget: &Dropdown<&'static str>) -> String {
    widget
        .options()
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let pointer = if index == widget.highlighted() { ">" } else { " " };
            let check = if widget.selected_index() == Some(index) {
                "*"
            } else {
                " "
            };
            format!("{pointer}{check} {}", option.label)
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let mode = match state.mode {
        AppMode::Nav => "NAV",
        AppMode::Input => "INPUT",
    };
    let hints = if view_data.dropdown.is_some() {
        "j/k move | enter select | esc close"
    } else {
        match (state.mode, view_data.input) {
            (AppMode::Input, Some(InputTarget::Instructions)) => "type | backspace | esc done",
            (AppMode::Input, Some(InputTarget::List(Slot::Edit))) => {
                "type | tab choice | enter save | esc cancel"
            }
            (AppMode::Input, _) => "type | tab choice | enter add | esc done",
            (AppMode::Nav, _) => {
                "f/b panel | j/k | a add | e edit | d del | c choice | 1-6 preset | i notes | s save | x cancel | ? | ctrl+q"
            }
        }
    };
    let dirty = if state.is_dirty() { " | unsaved" } else { "" };
    match &state.status_line {
        Some(status) => format!("{mode}{dirty} | {status} | {hints}"),
        None => format!("{mode}{dirty} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: f/b or tab/shift+tab panels | j/k select | a add | e/enter edit | d remove\n\
nav: c draft choice | 1-6 common allergy | i special instructions | s save | x cancel changes\n\
input: type name | backspace | enter add/save | tab choice | esc leave or cancel edit\n\
input (allergy edit): ctrl+k toggle common\n\
choice: j/k move | enter select | esc close | click outside close"
}

fn dropdown_rect(area: Rect, option_count: usize) -> Rect {
    let width = DROPDOWN_WIDTH.min(area.width);
    let rows = u16::try_from(option_count).unwrap_or(u16::MAX).saturating_add(2);
    let height = rows.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
