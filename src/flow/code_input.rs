//! Multi-field code input state machine.
//!
//! Flow Overview:
//! - One cell per code digit, each empty or holding one ASCII digit.
//! - Transitions are pure over `{ cells, active_index }`; each returns a
//!   [`Transition`] carrying the focus target and, when every cell is
//!   filled, the completed code.
//! - Completion is edge-triggered: a filled value is emitted once and
//!   latched, and the latch drops as soon as the value stops being
//!   complete, so refilling fires again.
//!
//! The machine is rendering-agnostic: the host binds each cell to a
//! focusable input, applies `focus_target` (focus plus select-contents,
//! for overwrite-on-type), and forwards key and paste events here. Tab is
//! left to the host's native focus order.

/// Default cell count for 6-digit codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// What the rendering layer should apply after a transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    /// Cell that should receive focus, with its contents selected. `None`
    /// leaves focus where it is.
    pub focus_target: Option<usize>,
    /// The full code, present exactly once per distinct filled value.
    pub completed: Option<String>,
}

/// Per-cell data for an accessible rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub value: Option<char>,
    /// Label of the form `Digit 3 of 6`.
    pub label: String,
    pub focused: bool,
    /// Mirrors the parent error state onto every cell (`aria-invalid`).
    pub invalid: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeInputState {
    cells: Vec<Option<char>>,
    active_index: usize,
    last_emitted: Option<String>,
}

impl Default for CodeInputState {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeInputState {
    /// Six empty cells with focus on the first.
    #[must_use]
    pub fn new() -> Self {
        Self::with_length(DEFAULT_CODE_LENGTH)
    }

    /// A custom cell count (at least one cell).
    #[must_use]
    pub fn with_length(length: usize) -> Self {
        Self {
            cells: vec![None; length.max(1)],
            active_index: 0,
            last_emitted: None,
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Option<char>] {
        &self.cells
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Concatenation of the filled cells, in order.
    #[must_use]
    pub fn value(&self) -> String {
        self.cells.iter().flatten().collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Accessible label for one cell.
    #[must_use]
    pub fn cell_label(&self, index: usize) -> String {
        format!("Digit {} of {}", index + 1, self.cells.len())
    }

    /// Render-ready view of every cell. `error` mirrors onto each cell's
    /// `invalid` flag.
    #[must_use]
    pub fn view(&self, error: bool) -> Vec<CellView> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, value)| CellView {
                value: *value,
                label: self.cell_label(index),
                focused: index == self.active_index,
                invalid: error,
            })
            .collect()
    }

    /// A printable keystroke at the active cell. Digits are stored and
    /// advance focus; anything else is suppressed.
    pub fn on_char(&mut self, c: char) -> Transition {
        if !c.is_ascii_digit() {
            return Transition::default();
        }
        self.cells[self.active_index] = Some(c);
        let focus_target = if self.active_index + 1 < self.cells.len() {
            Some(self.move_focus(self.active_index + 1))
        } else {
            None
        };
        Transition {
            focus_target,
            completed: self.emit_if_complete(),
        }
    }

    /// Backspace: clear in place when the cell has a digit; on an empty
    /// cell move back one and clear there. Empty at the first cell is a
    /// no-op.
    pub fn on_backspace(&mut self) -> Transition {
        if self.cells[self.active_index].is_some() {
            self.cells[self.active_index] = None;
            self.last_emitted = None;
            return Transition::default();
        }
        if self.active_index == 0 {
            return Transition::default();
        }
        let target = self.move_focus(self.active_index - 1);
        self.cells[target] = None;
        self.last_emitted = None;
        Transition {
            focus_target: Some(target),
            completed: None,
        }
    }

    /// Delete: clear the active cell, keep focus.
    pub fn on_delete(&mut self) -> Transition {
        self.cells[self.active_index] = None;
        self.last_emitted = None;
        Transition::default()
    }

    pub fn on_arrow_left(&mut self) -> Transition {
        if self.active_index == 0 {
            return Transition::default();
        }
        Transition {
            focus_target: Some(self.move_focus(self.active_index - 1)),
            completed: None,
        }
    }

    pub fn on_arrow_right(&mut self) -> Transition {
        if self.active_index + 1 >= self.cells.len() {
            return Transition::default();
        }
        Transition {
            focus_target: Some(self.move_focus(self.active_index + 1)),
            completed: None,
        }
    }

    pub fn on_home(&mut self) -> Transition {
        Transition {
            focus_target: Some(self.move_focus(0)),
            completed: None,
        }
    }

    pub fn on_end(&mut self) -> Transition {
        Transition {
            focus_target: Some(self.move_focus(self.cells.len() - 1)),
            completed: None,
        }
    }

    /// Paste: keep only the digits, distribute from the active cell
    /// (overwriting), and drop whatever does not fit. Focus lands on the
    /// first still-empty cell, or the last cell when none remain.
    pub fn on_paste(&mut self, text: &str) -> Transition {
        let digits: Vec<char> = text.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Transition::default();
        }
        let start = self.active_index;
        for (offset, digit) in digits.iter().enumerate() {
            let index = start + offset;
            if index >= self.cells.len() {
                break;
            }
            self.cells[index] = Some(*digit);
        }
        let target = self
            .cells
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.cells.len() - 1);
        Transition {
            focus_target: Some(self.move_focus(target)),
            completed: self.emit_if_complete(),
        }
    }

    /// Empty every cell and return focus to the first. Used when a failed
    /// verification clears the input.
    pub fn clear(&mut self) -> Transition {
        self.cells.fill(None);
        self.last_emitted = None;
        Transition {
            focus_target: Some(self.move_focus(0)),
            completed: None,
        }
    }

    fn move_focus(&mut self, index: usize) -> usize {
        self.active_index = index;
        index
    }

    /// One emission per distinct filled value; the latch drops whenever
    /// the value stops being complete.
    fn emit_if_complete(&mut self) -> Option<String> {
        if !self.is_complete() {
            self.last_emitted = None;
            return None;
        }
        let value = self.value();
        if self.last_emitted.as_ref() == Some(&value) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}
