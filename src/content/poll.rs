/// How the options of a poll may be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Radio group: one shared group key, picking one clears the others.
    Exclusive,
    /// Checkboxes: every option has its own key.
    Independent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollControl {
    /// Stable position of the option, independent of its label.
    pub option_id: usize,
    pub control_id: String,
    pub group: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollView {
    pub message_id: i64,
    pub question: String,
    pub selection: Selection,
    pub controls: Vec<PollControl>,
    selected: Vec<bool>,
}

impl PollView {
    pub fn build(
        message_id: i64,
        question: impl Into<String>,
        options: Vec<String>,
        allows_multiple_answers: bool,
    ) -> Self {
        let selection = if allows_multiple_answers {
            Selection::Independent
        } else {
            Selection::Exclusive
        };

        let controls: Vec<PollControl> = options
            .into_iter()
            .enumerate()
            .map(|(i, text)| PollControl {
                option_id: i,
                control_id: format!("poll_{}_{}", message_id, i),
                group: match selection {
                    Selection::Exclusive => format!("poll_{}", message_id),
                    Selection::Independent => format!("poll_{}_{}", message_id, i),
                },
                label: text.clone(),
                value: text,
            })
            .collect();

        Self {
            message_id,
            question: question.into(),
            selection,
            selected: vec![false; controls.len()],
            controls,
        }
    }

    pub fn allows_multiple_answers(&self) -> bool {
        self.selection == Selection::Independent
    }

    /// Click on an option. Radio options stay picked when clicked again;
    /// checkboxes flip. Returns false for an unknown option.
    pub fn toggle(&mut self, option_id: usize) -> bool {
        if option_id >= self.selected.len() {
            return false;
        }
        match self.selection {
            Selection::Exclusive => {
                for (i, picked) in self.selected.iter_mut().enumerate() {
                    *picked = i == option_id;
                }
            }
            Selection::Independent => {
                self.selected[option_id] = !self.selected[option_id];
            }
        }
        true
    }

    pub fn is_selected(&self, option_id: usize) -> bool {
        self.selected.get(option_id).copied().unwrap_or(false)
    }

    pub fn selected(&self) -> Vec<&PollControl> {
        self.controls
            .iter()
            .filter(|c| self.is_selected(c.option_id))
            .collect()
    }
}
