// src/menu.rs
//! Keypress-driven menu widgets: single-select, multi-select, text
//! prompt, tabbed view, and a press-any-key gate.
//!
//! Each widget is a small state machine ({active, confirmed,
//! cancelled}) wrapped in a crossterm event loop. When stdin/stdout is
//! not a terminal (or raw mode cannot be entered) the same contracts
//! are served by a numbered-line fallback. Cancellation (Esc, q,
//! Ctrl-C, or a closed input stream) is an ordinary result, never an
//! error.

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Stylize,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    tty::IsTty,
};
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Active,
    Confirmed,
    Cancelled,
}

pub struct MenuItem<T> {
    pub label: String,
    pub description: String,
    pub value: T,
}

impl<T> MenuItem<T> {
    pub fn new(label: impl Into<String>, description: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            value,
        }
    }
}

fn interactive() -> bool {
    io::stdin().is_tty() && io::stdout().is_tty()
}

/// Restores cooked mode even on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn is_cancel(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
        || matches!(key.code, KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Reads one line from stdin; `None` means the stream is closed or
/// interrupted.
fn read_line() -> Option<String> {
    let mut buffer = String::new();
    match io::stdin().lock().read_line(&mut buffer) {
        Ok(0) => None,
        Ok(_) => Some(buffer.trim().to_string()),
        Err(_) => None,
    }
}

/// Fallback selection parsing: empty input picks the first item, a
/// valid 1-based number picks that item, anything else cancels.
fn parse_single_choice(input: &str, len: usize) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    match trimmed.parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}

/// Fallback toggle parsing: comma-separated 1-based numbers; invalid
/// entries are ignored.
fn parse_multi_toggles(input: &str, len: usize) -> Vec<usize> {
    input
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1 && *n <= len)
        .map(|n| n - 1)
        .collect()
}

fn clear_frame(out: &mut impl Write, lines: u16) -> io::Result<()> {
    if lines > 0 {
        execute!(
            out,
            cursor::MoveUp(lines),
            cursor::MoveToColumn(0),
            Clear(ClearType::FromCursorDown)
        )?;
    }
    Ok(())
}

/// Clears the whole screen; used between screens of the interactive
/// loop.
pub fn clear_screen() {
    let mut out = io::stdout();
    let _ = execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0));
}

// --- Single-select ---

/// An ordered list with a cursor. Enter confirms the item under the
/// cursor, Esc cancels; the two outcomes are distinguishable
/// (`Some(value)` vs `None`). The cursor clamps at both ends.
pub struct SelectMenu<T> {
    title: String,
    items: Vec<MenuItem<T>>,
    cursor: usize,
    phase: Phase,
}

impl<T: Clone> SelectMenu<T> {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem<T>>) -> Self {
        Self {
            title: title.into(),
            items,
            cursor: 0,
            phase: Phase::Active,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.phase != Phase::Active {
            return;
        }
        if is_cancel(key) {
            self.phase = Phase::Cancelled;
            return;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.items.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => self.phase = Phase::Confirmed,
            KeyCode::Char('q') => self.phase = Phase::Cancelled,
            _ => {}
        }
    }

    fn result(&self) -> Option<T> {
        match self.phase {
            Phase::Confirmed => self.items.get(self.cursor).map(|item| item.value.clone()),
            _ => None,
        }
    }

    pub fn run(mut self) -> Result<Option<T>> {
        if self.items.is_empty() {
            return Ok(None);
        }
        if !interactive() {
            return Ok(self.run_fallback());
        }
        let guard = match RawModeGuard::enter() {
            Ok(guard) => guard,
            Err(_) => return Ok(self.run_fallback()),
        };
        let mut out = io::stdout();
        let mut drawn = 0u16;
        while self.phase == Phase::Active {
            drawn = self.render(&mut out, drawn)?;
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Ok(_) => {}
                Err(_) => self.phase = Phase::Cancelled,
            }
        }
        clear_frame(&mut out, drawn)?;
        drop(guard);
        Ok(self.result())
    }

    fn render(&self, out: &mut impl Write, previous: u16) -> io::Result<u16> {
        clear_frame(out, previous)?;
        let mut lines = 0u16;
        if !self.title.is_empty() {
            write!(out, "  {}\r\n\r\n", self.title.as_str().bold())?;
            lines += 2;
        }
        for (i, item) in self.items.iter().enumerate() {
            if i == self.cursor {
                write!(out, "  › {}\r\n", item.label.as_str().reverse())?;
            } else {
                write!(out, "    {}\r\n", item.label)?;
            }
            lines += 1;
            if !item.description.is_empty() {
                write!(out, "      {}\r\n", item.description.as_str().dim())?;
                lines += 1;
            }
        }
        write!(
            out,
            "\r\n  {}\r\n",
            "↑↓ navigate · Enter select · Esc cancel".dim()
        )?;
        lines += 2;
        out.flush()?;
        Ok(lines)
    }

    fn run_fallback(mut self) -> Option<T> {
        println!();
        if !self.title.is_empty() {
            println!("  {}\n", self.title);
        }
        for (i, item) in self.items.iter().enumerate() {
            println!("  [{}] {}", i + 1, item.label);
            if !item.description.is_empty() {
                println!("      {}", item.description);
            }
        }
        println!();
        print!("  Select (number or Enter for first): ");
        let _ = io::stdout().flush();
        let line = read_line()?;
        match parse_single_choice(&line, self.items.len()) {
            Some(index) => {
                self.cursor = index;
                self.phase = Phase::Confirmed;
                self.result()
            }
            None => {
                self.phase = Phase::Cancelled;
                None
            }
        }
    }
}

// --- Multi-select ---

/// A checklist. Selection is tracked by item index (the canonical
/// mechanism; values need not be comparable); Space toggles, Enter
/// confirms the full selection (possibly empty), Esc cancels.
/// Confirming an empty selection returns `Some(vec![])`, distinct from
/// the `None` of cancellation.
pub struct MultiSelectMenu<T> {
    title: String,
    items: Vec<MenuItem<T>>,
    cursor: usize,
    selected: BTreeSet<usize>,
    phase: Phase,
}

impl<T: Clone> MultiSelectMenu<T> {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem<T>>) -> Self {
        Self {
            title: title.into(),
            items,
            cursor: 0,
            selected: BTreeSet::new(),
            phase: Phase::Active,
        }
    }

    /// Seeds the selection with every item whose value matches.
    pub fn preselect(mut self, pred: impl Fn(&T) -> bool) -> Self {
        for (i, item) in self.items.iter().enumerate() {
            if pred(&item.value) {
                self.selected.insert(i);
            }
        }
        self
    }

    fn toggle(&mut self, index: usize) {
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.phase != Phase::Active {
            return;
        }
        if is_cancel(key) {
            self.phase = Phase::Cancelled;
            return;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.items.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') => self.toggle(self.cursor),
            KeyCode::Enter => self.phase = Phase::Confirmed,
            KeyCode::Char('q') => self.phase = Phase::Cancelled,
            _ => {}
        }
    }

    fn result(&self) -> Option<Vec<T>> {
        match self.phase {
            Phase::Confirmed => Some(
                self.selected
                    .iter()
                    .filter_map(|i| self.items.get(*i).map(|item| item.value.clone()))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn run(mut self) -> Result<Option<Vec<T>>> {
        if self.items.is_empty() {
            return Ok(None);
        }
        if !interactive() {
            return Ok(self.run_fallback());
        }
        let guard = match RawModeGuard::enter() {
            Ok(guard) => guard,
            Err(_) => return Ok(self.run_fallback()),
        };
        let mut out = io::stdout();
        let mut drawn = 0u16;
        while self.phase == Phase::Active {
            drawn = self.render(&mut out, drawn)?;
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Ok(_) => {}
                Err(_) => self.phase = Phase::Cancelled,
            }
        }
        clear_frame(&mut out, drawn)?;
        drop(guard);
        Ok(self.result())
    }

    fn render(&self, out: &mut impl Write, previous: u16) -> io::Result<u16> {
        clear_frame(out, previous)?;
        let mut lines = 0u16;
        if !self.title.is_empty() {
            write!(out, "  {}\r\n\r\n", self.title.as_str().bold())?;
            lines += 2;
        }
        for (i, item) in self.items.iter().enumerate() {
            let check = if self.selected.contains(&i) { "✓" } else { "○" };
            if i == self.cursor {
                write!(out, "  › {check} {}\r\n", item.label.as_str().reverse())?;
            } else {
                write!(out, "    {check} {}\r\n", item.label)?;
            }
            lines += 1;
            if !item.description.is_empty() {
                write!(out, "        {}\r\n", item.description.as_str().dim())?;
                lines += 1;
            }
        }
        write!(
            out,
            "\r\n  {}\r\n",
            "↑↓ navigate · Space toggle · Enter confirm · Esc cancel".dim()
        )?;
        lines += 2;
        out.flush()?;
        Ok(lines)
    }

    fn run_fallback(mut self) -> Option<Vec<T>> {
        println!();
        if !self.title.is_empty() {
            println!("  {}\n", self.title);
        }
        for (i, item) in self.items.iter().enumerate() {
            let check = if self.selected.contains(&i) { "✓" } else { " " };
            println!("  [{check}] {}. {}", i + 1, item.label);
        }
        println!();
        print!("  Numbers to toggle (comma-separated), or Enter to confirm: ");
        let _ = io::stdout().flush();
        let line = read_line()?;
        for index in parse_multi_toggles(&line, self.items.len()) {
            self.toggle(index);
        }
        self.phase = Phase::Confirmed;
        self.result()
    }
}

// --- Free-text prompt ---

/// A one-line input. Enter on empty input yields the default; Esc or a
/// closed stream yields `None`, never the default.
pub struct TextPrompt {
    label: String,
    default: String,
    buffer: String,
    phase: Phase,
}

impl TextPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_default(label, "")
    }

    pub fn with_default(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default: default.into(),
            buffer: String::new(),
            phase: Phase::Active,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.phase != Phase::Active {
            return;
        }
        if is_cancel(key) {
            self.phase = Phase::Cancelled;
            return;
        }
        match key.code {
            KeyCode::Enter => self.phase = Phase::Confirmed,
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.push(c);
            }
            _ => {}
        }
    }

    fn result(&self) -> Option<String> {
        match self.phase {
            Phase::Confirmed => {
                let typed = self.buffer.trim();
                if typed.is_empty() {
                    Some(self.default.clone())
                } else {
                    Some(typed.to_string())
                }
            }
            _ => None,
        }
    }

    pub fn run(mut self) -> Result<Option<String>> {
        if !interactive() {
            return Ok(self.run_fallback());
        }
        let guard = match RawModeGuard::enter() {
            Ok(guard) => guard,
            Err(_) => return Ok(self.run_fallback()),
        };
        let mut out = io::stdout();
        while self.phase == Phase::Active {
            self.render(&mut out)?;
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Ok(_) => {}
                Err(_) => self.phase = Phase::Cancelled,
            }
        }
        write!(out, "\r\n")?;
        out.flush()?;
        drop(guard);
        Ok(self.result())
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        let hint = if self.default.is_empty() {
            String::new()
        } else {
            format!(" [{}]", self.default)
        };
        write!(out, "  {}{}: {}", self.label, hint.as_str().dim(), self.buffer)?;
        out.flush()
    }

    fn run_fallback(mut self) -> Option<String> {
        let hint = if self.default.is_empty() {
            String::new()
        } else {
            format!(" [{}]", self.default)
        };
        print!("  {}{}: ", self.label, hint);
        let _ = io::stdout().flush();
        match read_line() {
            Some(line) => {
                self.buffer = line;
                self.phase = Phase::Confirmed;
                self.result()
            }
            None => {
                self.phase = Phase::Cancelled;
                None
            }
        }
    }
}

/// Prompts for a number, re-prompting inline on unparseable input.
pub fn prompt_number(label: &str, default: u32) -> Result<Option<u32>> {
    loop {
        let Some(text) = TextPrompt::with_default(label, default.to_string()).run()? else {
            return Ok(None);
        };
        match text.parse::<u32>() {
            Ok(n) => return Ok(Some(n)),
            Err(_) => println!("  ✗ Invalid number"),
        }
    }
}

// --- Tabbed view ---

/// A pure display loop over (label, content) tabs. Left/Right cycle
/// with wraparound; content is re-rendered from its closure on every
/// draw so it always reflects current data; Esc exits with no result.
pub struct TabbedView<'a> {
    tabs: Vec<(String, Box<dyn Fn() -> String + 'a>)>,
    active: usize,
    phase: Phase,
}

impl<'a> TabbedView<'a> {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: 0,
            phase: Phase::Active,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, render: impl Fn() -> String + 'a) -> Self {
        self.tabs.push((label.into(), Box::new(render)));
        self
    }

    fn next(&mut self) {
        self.active = (self.active + 1) % self.tabs.len();
    }

    fn prev(&mut self) {
        self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
    }

    fn current_content(&self) -> String {
        (self.tabs[self.active].1)()
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.phase != Phase::Active {
            return;
        }
        if is_cancel(key) {
            self.phase = Phase::Cancelled;
            return;
        }
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.prev(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.next(),
            KeyCode::Char('q') => self.phase = Phase::Cancelled,
            _ => {}
        }
    }

    pub fn run(mut self) -> Result<()> {
        if self.tabs.is_empty() {
            return Ok(());
        }
        if !interactive() {
            self.run_fallback();
            return Ok(());
        }
        let guard = match RawModeGuard::enter() {
            Ok(guard) => guard,
            Err(_) => {
                self.run_fallback();
                return Ok(());
            }
        };
        let mut out = io::stdout();
        while self.phase == Phase::Active {
            self.render(&mut out)?;
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Ok(_) => {}
                Err(_) => self.phase = Phase::Cancelled,
            }
        }
        execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        drop(guard);
        Ok(())
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        write!(out, "  ")?;
        for (i, (label, _)) in self.tabs.iter().enumerate() {
            if i == self.active {
                write!(out, "{}", format!(" {label} ").as_str().reverse())?;
            } else {
                write!(out, " {label} ")?;
            }
            write!(out, "  ")?;
        }
        write!(out, "{}\r\n\r\n", "(←/→ to switch · Esc to exit)".dim())?;
        let content = self.current_content();
        write!(out, "{}\r\n", content.replace('\n', "\r\n"))?;
        out.flush()
    }

    fn run_fallback(&mut self) {
        loop {
            println!();
            let mut bar = String::from("  ");
            for (i, (label, _)) in self.tabs.iter().enumerate() {
                if i == self.active {
                    bar.push_str(&format!("[{label}]  "));
                } else {
                    bar.push_str(&format!(" {label}   "));
                }
            }
            println!("{bar}\n");
            println!("{}", self.current_content());
            println!("\n  ←/→ or n/p to switch tabs, q to exit");
            print!("  > ");
            let _ = io::stdout().flush();
            match read_line().as_deref() {
                None | Some("") | Some("q") | Some("quit") | Some("exit") => break,
                Some("n") | Some("right") | Some("l") => self.next(),
                Some("p") | Some("left") | Some("h") => self.prev(),
                Some(_) => {}
            }
        }
    }
}

// --- Press-any-key gate ---

/// Blocks until any key (or line, in fallback mode), then clears the
/// screen for the next render.
pub fn press_any_key() -> Result<()> {
    println!("  {}", "(press any key)".dim());
    if interactive() {
        match RawModeGuard::enter() {
            Ok(_guard) => loop {
                match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break,
                    Ok(_) => {}
                    Err(_) => break,
                }
            },
            Err(_) => {
                let _ = read_line();
            }
        }
    } else {
        let _ = read_line();
    }
    clear_screen();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn items() -> Vec<MenuItem<&'static str>> {
        vec![
            MenuItem::new("one", "", "a"),
            MenuItem::new("two", "", "b"),
            MenuItem::new("three", "", "c"),
        ]
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut menu = SelectMenu::new("t", items());
        for _ in 0..5 {
            menu.handle_key(key(KeyCode::Up));
        }
        assert_eq!(menu.cursor, 0);
        for _ in 0..5 {
            menu.handle_key(key(KeyCode::Down));
        }
        assert_eq!(menu.cursor, 2);
        menu.handle_key(key(KeyCode::Char('j')));
        assert_eq!(menu.cursor, 2);
        menu.handle_key(key(KeyCode::Char('k')));
        assert_eq!(menu.cursor, 1);
    }

    #[test]
    fn enter_confirms_item_under_cursor() {
        let mut menu = SelectMenu::new("t", items());
        menu.handle_key(key(KeyCode::Down));
        menu.handle_key(key(KeyCode::Enter));
        assert_eq!(menu.result(), Some("b"));
    }

    #[test]
    fn escape_cancels_and_terminal_state_is_final() {
        let mut menu = SelectMenu::new("t", items());
        menu.handle_key(key(KeyCode::Esc));
        assert_eq!(menu.result(), None);
        // No transition out of a terminal state.
        menu.handle_key(key(KeyCode::Enter));
        assert_eq!(menu.result(), None);
        assert_eq!(menu.phase, Phase::Cancelled);
    }

    #[test]
    fn multi_select_toggles_by_index() {
        let mut menu = MultiSelectMenu::new("t", items());
        menu.handle_key(key(KeyCode::Char(' ')));
        menu.handle_key(key(KeyCode::Down));
        menu.handle_key(key(KeyCode::Down));
        menu.handle_key(key(KeyCode::Char(' ')));
        menu.handle_key(key(KeyCode::Enter));
        assert_eq!(menu.result(), Some(vec!["a", "c"]));
    }

    #[test]
    fn multi_select_empty_confirm_differs_from_cancel() {
        let mut confirmed = MultiSelectMenu::new("t", items());
        confirmed.handle_key(key(KeyCode::Enter));
        assert_eq!(confirmed.result(), Some(Vec::new()));

        let mut cancelled = MultiSelectMenu::new("t", items());
        cancelled.handle_key(key(KeyCode::Char(' ')));
        cancelled.handle_key(key(KeyCode::Esc));
        assert_eq!(cancelled.result(), None);
    }

    #[test]
    fn multi_select_preselects_by_value() {
        let mut menu = MultiSelectMenu::new("t", items()).preselect(|v| *v == "b");
        menu.handle_key(key(KeyCode::Enter));
        assert_eq!(menu.result(), Some(vec!["b"]));
    }

    #[test]
    fn text_prompt_edits_and_defaults() {
        let mut prompt = TextPrompt::with_default("count", "10");
        prompt.handle_key(key(KeyCode::Char('1')));
        prompt.handle_key(key(KeyCode::Char('2')));
        prompt.handle_key(key(KeyCode::Backspace));
        prompt.handle_key(key(KeyCode::Char('5')));
        prompt.handle_key(key(KeyCode::Enter));
        assert_eq!(prompt.result(), Some("15".to_string()));

        let mut empty = TextPrompt::with_default("count", "10");
        empty.handle_key(key(KeyCode::Enter));
        assert_eq!(empty.result(), Some("10".to_string()));

        let mut cancelled = TextPrompt::with_default("count", "10");
        cancelled.handle_key(key(KeyCode::Esc));
        assert_eq!(cancelled.result(), None);
    }

    #[test]
    fn tabs_wrap_both_directions() {
        let mut view = TabbedView::new()
            .tab("a", || String::new())
            .tab("b", || String::new())
            .tab("c", || String::new());
        assert_eq!(view.active, 0);
        view.handle_key(key(KeyCode::Left));
        assert_eq!(view.active, 2);
        view.handle_key(key(KeyCode::Right));
        assert_eq!(view.active, 0);
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.active, 1);
    }

    #[test]
    fn tab_content_is_rendered_fresh_each_time() {
        use std::cell::Cell;
        let calls = Cell::new(0u32);
        let view = TabbedView::new().tab("a", || {
            calls.set(calls.get() + 1);
            format!("call {}", calls.get())
        });
        assert_eq!(view.current_content(), "call 1");
        assert_eq!(view.current_content(), "call 2");
    }

    #[test]
    fn fallback_choice_parsing() {
        assert_eq!(parse_single_choice("", 3), Some(0));
        assert_eq!(parse_single_choice("  ", 3), Some(0));
        assert_eq!(parse_single_choice("2", 3), Some(1));
        assert_eq!(parse_single_choice("3", 3), Some(2));
        assert_eq!(parse_single_choice("4", 3), None);
        assert_eq!(parse_single_choice("x", 3), None);
    }

    #[test]
    fn fallback_toggle_parsing_skips_garbage() {
        assert_eq!(parse_multi_toggles("1, 3, nope, 9", 3), vec![0, 2]);
        assert!(parse_multi_toggles("", 3).is_empty());
    }
}
