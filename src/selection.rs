use crate::catalog::Catalog;
use crate::input::IntentBatch;

/// Focused application and, within it, the focused launch variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub application: usize,
    pub variant: usize,
}

impl Selection {
    pub fn new(application: usize, variant: usize) -> Self {
        Self {
            application,
            variant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Browsing(Selection),
    Confirmed(Selection),
    Cancelled,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::Browsing(Selection::default())
    }
}

fn wrap_prev(idx: usize, len: usize) -> usize {
    if len == 0 {
        idx
    } else {
        (idx % len + len - 1) % len
    }
}

fn wrap_next(idx: usize, len: usize) -> usize {
    if len == 0 {
        idx
    } else {
        (idx + 1) % len
    }
}

impl SelectionState {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Browsing(_))
    }

    /// `None` once the user cancelled.
    pub fn selection(&self) -> Option<Selection> {
        match *self {
            Self::Browsing(sel) | Self::Confirmed(sel) => Some(sel),
            Self::Cancelled => None,
        }
    }

    pub fn focused_application(&self) -> Option<usize> {
        self.selection().map(|sel| sel.application)
    }

    pub fn focused_variant(&self) -> Option<usize> {
        self.selection().map(|sel| sel.variant)
    }

    /// At most one of cancel, previous app, next app or confirm acts per
    /// cycle, in that order. A variant move only acts when none of those did.
    pub fn apply(self, intents: &IntentBatch, catalog: &Catalog) -> Self {
        let Self::Browsing(sel) = self else {
            return self;
        };

        if intents.cancel {
            return Self::Cancelled;
        }
        if intents.move_prev_app {
            return Self::Browsing(Selection::new(wrap_prev(sel.application, catalog.len()), 0));
        }
        if intents.move_next_app {
            return Self::Browsing(Selection::new(wrap_next(sel.application, catalog.len()), 0));
        }
        if intents.confirm {
            return Self::Confirmed(sel);
        }

        let variants = catalog.variant_count(sel.application);
        if intents.move_prev_variant {
            Self::Browsing(Selection::new(sel.application, wrap_prev(sel.variant, variants)))
        } else if intents.move_next_variant {
            Self::Browsing(Selection::new(sel.application, wrap_next(sel.variant, variants)))
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Application, Variant};

    fn catalog(variant_counts: &[usize]) -> Catalog {
        let apps = variant_counts
            .iter()
            .enumerate()
            .map(|(i, count)| Application {
                name: format!("app{i}"),
                icon_reference: format!("app{i}.png"),
                variants: (0..*count)
                    .map(|v| Variant::new(format!("v{v}"), format!("cmd{i}-{v}")))
                    .collect(),
            })
            .collect();
        Catalog::new(apps).unwrap()
    }

    fn next_app() -> IntentBatch {
        IntentBatch {
            move_next_app: true,
            ..Default::default()
        }
    }

    fn next_variant() -> IntentBatch {
        IntentBatch {
            move_next_variant: true,
            ..Default::default()
        }
    }

    #[test]
    fn starts_browsing_at_origin() {
        let state = SelectionState::default();
        assert!(!state.is_decided());
        assert_eq!(state.selection(), Some(Selection::new(0, 0)));
    }

    #[test]
    fn next_app_wraps_after_full_cycle() {
        for n in 1..=6 {
            let cat = catalog(&vec![1; n]);
            for start in 0..n {
                let mut state = SelectionState::Browsing(Selection::new(start, 0));
                for _ in 0..n {
                    state = state.apply(&next_app(), &cat);
                }
                assert_eq!(state.focused_application(), Some(start), "n={n} start={start}");
            }
        }
    }

    #[test]
    fn prev_app_wraps_to_last() {
        let cat = catalog(&[1, 1, 1]);
        let prev = IntentBatch {
            move_prev_app: true,
            ..Default::default()
        };
        let state = SelectionState::default().apply(&prev, &cat);
        assert_eq!(state.focused_application(), Some(2));
    }

    #[test]
    fn next_variant_wraps_after_full_cycle() {
        let cat = catalog(&[4]);
        for start in 0..4 {
            let mut state = SelectionState::Browsing(Selection::new(0, start));
            for _ in 0..4 {
                state = state.apply(&next_variant(), &cat);
            }
            assert_eq!(state.focused_variant(), Some(start));
        }
    }

    #[test]
    fn prev_variant_wraps_to_last() {
        let cat = catalog(&[3]);
        let prev = IntentBatch {
            move_prev_variant: true,
            ..Default::default()
        };
        let state = SelectionState::default().apply(&prev, &cat);
        assert_eq!(state.focused_variant(), Some(2));
    }

    #[test]
    fn changing_application_resets_variant() {
        let cat = catalog(&[3, 3]);
        let state = SelectionState::Browsing(Selection::new(0, 2));
        let moved = state.apply(&next_app(), &cat);
        assert_eq!(moved.selection(), Some(Selection::new(1, 0)));

        let both = IntentBatch {
            move_prev_app: true,
            move_next_variant: true,
            ..Default::default()
        };
        let moved = SelectionState::Browsing(Selection::new(1, 1)).apply(&both, &cat);
        assert_eq!(moved.selection(), Some(Selection::new(0, 0)));
    }

    #[test]
    fn cancel_wins_over_everything() {
        let cat = catalog(&[2, 2]);
        let all = IntentBatch {
            move_prev_app: true,
            move_next_app: true,
            move_prev_variant: true,
            move_next_variant: true,
            confirm: true,
            cancel: true,
        };
        for start in [Selection::new(0, 0), Selection::new(1, 1)] {
            let state = SelectionState::Browsing(start).apply(&all, &cat);
            assert_eq!(state, SelectionState::Cancelled);
            assert!(state.is_decided());
            assert_eq!(state.focused_application(), None);
        }
    }

    #[test]
    fn app_moves_take_precedence_over_confirm() {
        let cat = catalog(&[1, 1, 1]);
        let batch = IntentBatch {
            move_prev_app: true,
            move_next_app: true,
            confirm: true,
            ..Default::default()
        };
        let state = SelectionState::default().apply(&batch, &cat);
        assert_eq!(state, SelectionState::Browsing(Selection::new(2, 0)));
    }

    #[test]
    fn confirm_keeps_focus_unchanged() {
        let cat = catalog(&[1, 3]);
        let start = Selection::new(1, 2);
        let batch = IntentBatch {
            confirm: true,
            move_next_variant: true,
            ..Default::default()
        };
        let state = SelectionState::Browsing(start).apply(&batch, &cat);
        assert_eq!(state, SelectionState::Confirmed(start));
    }

    #[test]
    fn decided_states_ignore_further_intents() {
        let cat = catalog(&[2, 2]);
        let confirmed = SelectionState::Confirmed(Selection::new(1, 1));
        assert_eq!(confirmed.apply(&next_app(), &cat), confirmed);
        let cancelled = SelectionState::Cancelled;
        assert_eq!(cancelled.apply(&next_variant(), &cat), cancelled);
    }

    #[test]
    fn prev_variant_beats_next_variant() {
        let cat = catalog(&[3]);
        let both = IntentBatch {
            move_prev_variant: true,
            move_next_variant: true,
            ..Default::default()
        };
        let state = SelectionState::Browsing(Selection::new(0, 1)).apply(&both, &cat);
        assert_eq!(state.focused_variant(), Some(0));
    }

    #[test]
    fn empty_batch_is_identity() {
        let cat = catalog(&[2]);
        let state = SelectionState::Browsing(Selection::new(0, 1));
        assert_eq!(state.apply(&IntentBatch::default(), &cat), state);
    }
}
