//! Screen stack and selection state.
//!
//! Screens are only ever pushed or popped, so "back" is always the previous
//! entry of the stack. The selection set belongs to the `List` frame that
//! built it: pushing another screen parks it, popping back restores it.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A navigable view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// The full catalog.
    List,
    /// Read-only view of one game.
    Detail(String),
    /// Editor for one game.
    Edit(String),
    /// Filter form and random pick.
    Recommend,
}

impl Screen {
    /// Identifier of the game this screen refers to, if any.
    pub fn game_id(&self) -> Option<&str> {
        match self {
            Screen::Detail(id) | Screen::Edit(id) => Some(id),
            Screen::List | Screen::Recommend => None,
        }
    }

    /// Short title used in headers and logs.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::List => "Games",
            Screen::Detail(_) => "Game",
            Screen::Edit(_) => "Edit",
            Screen::Recommend => "Game Bot",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.game_id() {
            Some(id) => write!(f, "{}({id})", self.title()),
            None => f.write_str(self.title()),
        }
    }
}

/// Result of [`Navigator::pop_screen`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopOutcome {
    /// The stack still has a screen; this is the one now showing.
    Resumed(Screen),
    /// The last screen was popped and the application should exit.
    Exit,
}

#[derive(Debug, Clone)]
struct Frame {
    screen: Screen,
    parked_selection: BTreeSet<String>,
}

impl Frame {
    fn new(screen: Screen) -> Self {
        Self {
            screen,
            parked_selection: BTreeSet::new(),
        }
    }
}

/// Navigation state: a history of screens plus the active selection.
#[derive(Debug, Clone)]
pub struct Navigator {
    frames: Vec<Frame>,
    selected: BTreeSet<String>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start on the game list.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(Screen::List)],
            selected: BTreeSet::new(),
        }
    }

    /// Screen currently showing; `None` once the stack has been emptied.
    pub fn current(&self) -> Option<&Screen> {
        self.frames.last().map(|frame| &frame.screen)
    }

    /// Screens from bottom (oldest) to top (current).
    pub fn screens(&self) -> impl Iterator<Item = &Screen> + '_ {
        self.frames.iter().map(|frame| &frame.screen)
    }

    /// Number of screens in the history.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether the last screen has been popped.
    pub fn is_terminated(&self) -> bool {
        self.frames.is_empty()
    }

    /// Show `screen` on top of the current one.
    pub fn push_screen(&mut self, screen: Screen) {
        if let Some(top) = self.frames.last_mut() {
            if top.screen == Screen::List {
                top.parked_selection = std::mem::take(&mut self.selected);
            }
        }
        debug!(%screen, depth = self.frames.len() + 1, "Push screen");
        self.frames.push(Frame::new(screen));
    }

    /// Go back one screen.
    pub fn pop_screen(&mut self) -> PopOutcome {
        let popped = self.frames.pop();
        self.selected.clear();
        let Some(top) = self.frames.last_mut() else {
            debug!(popped = ?popped.map(|frame| frame.screen), "Navigation stack emptied");
            return PopOutcome::Exit;
        };
        self.selected = std::mem::take(&mut top.parked_selection);
        let screen = top.screen.clone();
        debug!(%screen, depth = self.frames.len(), "Pop screen");
        PopOutcome::Resumed(screen)
    }

    /// Flip whether `id` is selected and return the new membership.
    ///
    /// Selections only exist on the list screen; elsewhere this does nothing.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.current() != Some(&Screen::List) {
            debug!(game_id = %id, "Ignoring selection outside the game list");
            return false;
        }
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Drop every selection.
    pub fn clear_selections(&mut self) {
        self.selected.clear();
    }

    /// Identifiers currently selected.
    pub fn selected_ids(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// How many games are selected.
    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }
}
