/// Which corners of a button are drawn rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Corners {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl Corners {
    pub const NONE: Corners = Corners {
        top_left: false,
        top_right: false,
        bottom_left: false,
        bottom_right: false,
    };
    pub const ALL: Corners = Corners {
        top_left: true,
        top_right: true,
        bottom_left: true,
        bottom_right: true,
    };
    pub const TOP: Corners = Corners {
        top_left: true,
        top_right: true,
        bottom_left: false,
        bottom_right: false,
    };
    pub const BOTTOM: Corners = Corners {
        top_left: false,
        top_right: false,
        bottom_left: true,
        bottom_right: true,
    };

    pub fn count(&self) -> usize {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
        .iter()
        .filter(|c| **c)
        .count()
    }
}

/// Corner rounding for the cell at (`row`, `column`) of a grid whose rows
/// have the given lengths. Rules are a first-match chain; `row_lengths`
/// must not contain empty rows.
pub fn corners_for(row_lengths: &[usize], row: usize, column: usize) -> Corners {
    let rows = row_lengths.len();
    if rows == 0 || row >= rows {
        return Corners::NONE;
    }
    let first_len = row_lengths[0];
    let last = rows - 1;
    let last_len = row_lengths[last];

    if rows == 1 && first_len == 1 {
        Corners::ALL
    } else if row == 0 && first_len == 1 {
        Corners::TOP
    } else if row == last && row_lengths[row] == 1 {
        Corners::BOTTOM
    } else if row == 0 && column == 0 {
        Corners {
            top_left: true,
            ..Corners::NONE
        }
    } else if row == 0 && column + 1 == first_len {
        Corners {
            top_right: true,
            ..Corners::NONE
        }
    } else if row == last && column == 0 {
        Corners {
            bottom_left: true,
            ..Corners::NONE
        }
    } else if row == last && column + 1 == last_len {
        Corners {
            bottom_right: true,
            ..Corners::NONE
        }
    } else {
        Corners::NONE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridButton {
    pub row: usize,
    pub column: usize,
    pub text: String,
    pub corners: Corners,
}

/// Rendered inline keyboard: buttons grouped by row with corner rounding
/// already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineGrid {
    rows: Vec<Vec<GridButton>>,
}

impl InlineGrid {
    /// Build a grid from button labels. Empty rows are dropped; a grid with
    /// no buttons at all is `None`.
    pub fn build(labels: Vec<Vec<String>>) -> Option<Self> {
        let labels: Vec<Vec<String>> = labels.into_iter().filter(|r| !r.is_empty()).collect();
        if labels.is_empty() {
            return None;
        }

        let lengths: Vec<usize> = labels.iter().map(Vec::len).collect();
        let rows = labels
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, text)| GridButton {
                        row: i,
                        column: j,
                        text,
                        corners: corners_for(&lengths, i, j),
                    })
                    .collect()
            })
            .collect();

        Some(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<GridButton>] {
        &self.rows
    }

    pub fn buttons(&self) -> impl Iterator<Item = &GridButton> {
        self.rows.iter().flatten()
    }

    pub fn button(&self, row: usize, column: usize) -> Option<&GridButton> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn labels(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|r| r.iter().map(|b| b.text.as_str()).collect())
            .collect()
    }
}

/// Visual state of one inline button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    Idle,
    Hover,
    Pressed,
    /// Released while the pointer is still over the button; drawn like hover.
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    Down,
    Up,
}

impl ButtonState {
    pub fn next(self, event: PointerEvent) -> ButtonState {
        match (self, event) {
            (_, PointerEvent::Leave) => ButtonState::Idle,
            (_, PointerEvent::Down) => ButtonState::Pressed,
            (ButtonState::Idle, PointerEvent::Enter) => ButtonState::Hover,
            (ButtonState::Pressed, PointerEvent::Up) => ButtonState::Released,
            (state, _) => state,
        }
    }

    pub fn is_highlighted(self) -> bool {
        !matches!(self, ButtonState::Idle)
    }
}
