use gamebot_core::{
    models::{Complexity, Duration, GameEntry, Size, MAX_PLAYERS, MIN_PLAYERS},
    FilterCriteria, Recommender, Suggestion,
};

const MAX_TEXT_LEN: usize = 96;

/// Single-line text input used for the name and picture fields.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(initial: &str) -> Self {
        Self {
            value: initial.to_string(),
            cursor: initial.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.value.chars().count() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn insert(&mut self, ch: char) {
        if ch.is_control() || self.value.chars().count() >= MAX_TEXT_LEN {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }
}

/// Editable attributes of a game, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    MinPlayers,
    MaxPlayers,
    Duration,
    Complexity,
    Size,
    Coop,
    Picture,
}

impl EditField {
    pub const ALL: [EditField; 8] = [
        EditField::Name,
        EditField::MinPlayers,
        EditField::MaxPlayers,
        EditField::Duration,
        EditField::Complexity,
        EditField::Size,
        EditField::Coop,
        EditField::Picture,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditField::Name => "Name",
            EditField::MinPlayers => "Min players",
            EditField::MaxPlayers => "Max players",
            EditField::Duration => "Duration",
            EditField::Complexity => "Complexity",
            EditField::Size => "Size",
            EditField::Coop => "Co-op",
            EditField::Picture => "Picture",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, EditField::Name | EditField::Picture)
    }

    pub fn text(self, entry: &GameEntry) -> Option<&str> {
        match self {
            EditField::Name => Some(entry.name.as_str()),
            EditField::Picture => Some(entry.picture.as_str()),
            _ => None,
        }
    }

    /// Apply a text edit. Returns whether the entry changed.
    pub fn set_text(self, entry: &mut GameEntry, value: &str) -> bool {
        let target = match self {
            EditField::Name => &mut entry.name,
            EditField::Picture => &mut entry.picture,
            _ => return false,
        };
        let value = value.trim();
        if target.as_str() == value {
            return false;
        }
        *target = value.to_string();
        true
    }

    /// Step a non-text field by `delta`. Returns whether the entry changed.
    ///
    /// The player pair stays ordered: pushing min past max drags max along
    /// and the other way round.
    pub fn adjust(self, entry: &mut GameEntry, delta: i8) -> bool {
        let before = entry.clone();
        match self {
            EditField::MinPlayers => {
                entry.min_players = step_players(entry.min_players, delta);
                if entry.min_players > entry.max_players {
                    entry.max_players = entry.min_players;
                }
            }
            EditField::MaxPlayers => {
                entry.max_players = step_players(entry.max_players, delta);
                if entry.max_players < entry.min_players {
                    entry.min_players = entry.max_players;
                }
            }
            EditField::Duration => entry.duration = cycle(Duration::ALL, entry.duration, delta),
            EditField::Complexity => {
                entry.complexity = cycle(Complexity::ALL, entry.complexity, delta)
            }
            EditField::Size => entry.size = cycle(Size::ALL, entry.size, delta),
            EditField::Coop => entry.is_coop = !entry.is_coop,
            EditField::Name | EditField::Picture => {}
        }
        *entry != before
    }
}

fn step_players(current: u8, delta: i8) -> u8 {
    (current as i16 + delta as i16).clamp(MIN_PLAYERS as i16, MAX_PLAYERS as i16) as u8
}

/// Walk `unset -> all[0] -> ... -> all[n-1] -> unset` in the direction of `delta`.
fn cycle<T: Copy + PartialEq>(all: &[T], current: Option<T>, delta: i8) -> Option<T> {
    let slots = all.len() as isize + 1;
    let position = current
        .and_then(|value| all.iter().position(|candidate| *candidate == value))
        .map(|idx| idx as isize + 1)
        .unwrap_or(0);
    let next = (position + delta.signum() as isize).rem_euclid(slots);
    if next == 0 {
        None
    } else {
        Some(all[next as usize - 1])
    }
}

/// Cursor and in-progress text input for the edit screen.
#[derive(Debug, Clone, Default)]
pub struct EditForm {
    pub cursor: usize,
    pub input: Option<TextInput>,
}

impl EditForm {
    pub fn field(&self) -> EditField {
        EditField::ALL[self.cursor.min(EditField::ALL.len() - 1)]
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let last = EditField::ALL.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.input = None;
    }
}

/// One row of the bot's filter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotField {
    Players,
    Complexity(Complexity),
    Duration(Duration),
    Size(Size),
    Coop,
    Competitive,
}

impl BotField {
    pub fn all() -> Vec<BotField> {
        let mut fields = vec![BotField::Players];
        fields.extend(Complexity::ALL.iter().copied().map(BotField::Complexity));
        fields.extend(Duration::ALL.iter().copied().map(BotField::Duration));
        fields.extend(Size::ALL.iter().copied().map(BotField::Size));
        fields.push(BotField::Coop);
        fields.push(BotField::Competitive);
        fields
    }

    pub fn group(self) -> &'static str {
        match self {
            BotField::Players => "Players",
            BotField::Complexity(_) => "Complexity",
            BotField::Duration(_) => "Duration",
            BotField::Size(_) => "Size",
            BotField::Coop | BotField::Competitive => "Mode",
        }
    }

    pub fn label(self) -> String {
        match self {
            BotField::Players => "Players".to_string(),
            BotField::Complexity(value) => value.to_string(),
            BotField::Duration(value) => value.to_string(),
            BotField::Size(value) => value.to_string(),
            BotField::Coop => "Co-op".to_string(),
            BotField::Competitive => "Competitive".to_string(),
        }
    }

    pub fn is_on(self, criteria: &FilterCriteria) -> bool {
        match self {
            BotField::Players => true,
            BotField::Complexity(value) => criteria.complexities.contains(&value),
            BotField::Duration(value) => criteria.durations.contains(&value),
            BotField::Size(value) => criteria.sizes.contains(&value),
            BotField::Coop => criteria.want_coop,
            BotField::Competitive => criteria.want_competitive,
        }
    }
}

/// Filter selections plus the outcome of the last "find a game".
#[derive(Debug, Clone)]
pub struct BotForm {
    pub criteria: FilterCriteria,
    pub cursor: usize,
    pub recommender: Option<Recommender>,
    pub suggestion: Option<Suggestion>,
    fields: Vec<BotField>,
}

impl BotForm {
    pub fn new(players: u8) -> Self {
        Self {
            criteria: FilterCriteria::for_players(players),
            cursor: 0,
            recommender: None,
            suggestion: None,
            fields: BotField::all(),
        }
    }

    pub fn fields(&self) -> &[BotField] {
        &self.fields
    }

    pub fn field(&self) -> BotField {
        self.fields[self.cursor.min(self.fields.len() - 1)]
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let last = self.fields.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Left/right on the focused row.
    pub fn adjust(&mut self, delta: i16) {
        match self.field() {
            BotField::Players => self.criteria.adjust_players(delta),
            _ => self.toggle(),
        }
    }

    /// Space on the focused row.
    pub fn toggle(&mut self) {
        match self.field() {
            BotField::Players => {}
            BotField::Complexity(value) => self.criteria.toggle_complexity(value),
            BotField::Duration(value) => self.criteria.toggle_duration(value),
            BotField::Size(value) => self.criteria.toggle_size(value),
            BotField::Coop => self.criteria.want_coop = !self.criteria.want_coop,
            BotField::Competitive => {
                self.criteria.want_competitive = !self.criteria.want_competitive
            }
        }
    }

    pub fn dismiss(&mut self) -> bool {
        self.suggestion.take().is_some()
    }
}
