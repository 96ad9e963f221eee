//! Pointer-drag token selection.
//!
//! A small interaction state machine over the cleaned token sequence,
//! independent of any rendering. The caller feeds it pointer events by
//! token index; it produces an inclusive [`SelectionRange`] once a drag
//! spans enough tokens. Events may arrive at high frequency and are all
//! O(1).

/// Minimum number of tokens a selection must span to become a quote
pub const MIN_QUOTE_TOKENS: usize = 3;

/// Inclusive index range over the cleaned token sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Number of tokens spanned
    pub fn token_count(&self) -> usize {
        self.end - self.start + 1
    }

    /// Check if an index falls inside the range (for highlight rendering)
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

/// Screen position of a pointer event.
///
/// Carried through so the caller can anchor its extract affordance at the
/// spot where the drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

/// What a completed gesture amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The drag spans at least [`MIN_QUOTE_TOKENS`]; the engine is now
    /// ready to extract and exposes the range until taken or cancelled.
    Selected(SelectionRange),

    /// Pointer down and up on the same token with no drag in between.
    /// Not a selection; the caller should treat it as a seek request to
    /// this token's start time.
    Click(usize),

    /// The drag was too short (or no drag was in progress); any pending
    /// range has been discarded.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Dragging {
        anchor: usize,
        range: SelectionRange,
        moved: bool,
    },
    ReadyToExtract {
        range: SelectionRange,
        at: PointerPosition,
    },
}

/// Drag-selection state machine over `token_count` cleaned tokens
#[derive(Debug)]
pub struct SelectionEngine {
    token_count: usize,
    state: State,
}

impl SelectionEngine {
    /// Create an engine for a cleaned sequence of `token_count` tokens
    pub fn new(token_count: usize) -> Self {
        Self {
            token_count,
            state: State::Idle,
        }
    }

    /// Point the engine at a different cleaned sequence.
    /// Any in-progress gesture or pending range is dropped.
    pub fn set_token_count(&mut self, token_count: usize) {
        self.token_count = token_count;
        self.state = State::Idle;
    }

    /// Pointer pressed on a token: begin a drag anchored there.
    /// Starting a new drag discards any pending range. Out-of-range
    /// indices are ignored.
    pub fn pointer_down(&mut self, index: usize) {
        if index >= self.token_count {
            return;
        }

        self.state = State::Dragging {
            anchor: index,
            range: SelectionRange {
                start: index,
                end: index,
            },
            moved: false,
        };
    }

    /// Pointer moved onto a token while dragging: extend the range between
    /// the anchor and this token, in either direction. A no-op outside a
    /// drag or for out-of-range indices.
    pub fn pointer_enter(&mut self, index: usize) {
        if index >= self.token_count {
            return;
        }

        if let State::Dragging { anchor, range, moved } = &mut self.state {
            range.start = (*anchor).min(index);
            range.end = (*anchor).max(index);
            if index != *anchor {
                *moved = true;
            }
        }
    }

    /// Pointer released at `at`: end the drag.
    ///
    /// A range spanning at least [`MIN_QUOTE_TOKENS`] is kept and reported
    /// as [`DragOutcome::Selected`]; a motionless press-and-release reports
    /// [`DragOutcome::Click`]; anything else is discarded.
    pub fn pointer_up(&mut self, at: PointerPosition) -> DragOutcome {
        match self.state {
            State::Dragging { anchor, range, moved } => {
                if range.token_count() >= MIN_QUOTE_TOKENS {
                    self.state = State::ReadyToExtract { range, at };
                    DragOutcome::Selected(range)
                } else {
                    self.state = State::Idle;
                    if moved {
                        DragOutcome::Discarded
                    } else {
                        DragOutcome::Click(anchor)
                    }
                }
            }
            _ => DragOutcome::Discarded,
        }
    }

    /// Consume the pending range to perform an extraction.
    /// The engine returns to idle whether or not the caller succeeds.
    pub fn take_range(&mut self) -> Option<SelectionRange> {
        match self.state {
            State::ReadyToExtract { range, .. } => {
                self.state = State::Idle;
                Some(range)
            }
            _ => None,
        }
    }

    /// Abandon the pending range (user cancelled)
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    /// Current range, during a drag or while ready to extract
    pub fn range(&self) -> Option<SelectionRange> {
        match self.state {
            State::Dragging { range, .. } | State::ReadyToExtract { range, .. } => Some(range),
            State::Idle => None,
        }
    }

    /// Where the extract affordance should be anchored, once ready
    pub fn extract_anchor(&self) -> Option<PointerPosition> {
        match self.state {
            State::ReadyToExtract { at, .. } => Some(at),
            _ => None,
        }
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging { .. })
    }
}
