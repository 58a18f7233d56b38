//! Key input and the normal-mode key map.
//!
//! Keys arrive already decoded; reading them from a terminal is the
//! front end's job.

use crate::mode::PaneFocus;
use crate::motion::Motion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Tab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    F1,
}

/// Normal-mode commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    ListUp,
    ListDown,
    FocusList,
    FocusNote,
    /// Cursor motion inside the note pane.
    Move(Motion),
    StartLineSelection,
    StartCharSelection,
    YankNote,
    Edit,
    Create,
    Delete,
    ToggleHidden,
    ToggleShowHidden,
    Filter,
    Grid,
    Config,
    Unlock,
    ToggleTask,
}

/// Maps a key in normal mode. `j`/`k` and the vertical arrows move the list
/// or the note cursor depending on which pane has focus.
pub fn normal_action(key: Key, focus: PaneFocus) -> Option<Action> {
    let on_note = focus == PaneFocus::Note;
    let action = match key {
        Key::Char('q') => Action::Quit,
        Key::Char('?') | Key::F1 => Action::Help,
        Key::Char('h') => Action::FocusList,
        Key::Char('l') | Key::Tab => Action::FocusNote,
        Key::Char('j') | Key::Down if on_note => Action::Move(Motion::Down),
        Key::Char('k') | Key::Up if on_note => Action::Move(Motion::Up),
        Key::Char('j') | Key::Down => Action::ListDown,
        Key::Char('k') | Key::Up => Action::ListUp,
        Key::Left => Action::Move(Motion::Left),
        Key::Right => Action::Move(Motion::Right),
        Key::Char('V') => Action::StartLineSelection,
        Key::Char('v') => Action::StartCharSelection,
        Key::Char('Y') => Action::YankNote,
        Key::Char('e') | Key::Enter => Action::Edit,
        Key::Char('n') => Action::Create,
        Key::Char('d') => Action::Delete,
        Key::Char('.') => Action::ToggleHidden,
        Key::Char('a') => Action::ToggleShowHidden,
        Key::Char('/') => Action::Filter,
        Key::Char('g') => Action::Grid,
        Key::Char('c') => Action::Config,
        Key::Char('u') => Action::Unlock,
        Key::Char('x') => Action::ToggleTask,
        key => Action::Move(motion_for(key)?),
    };
    Some(action)
}

/// Motions shared by the note pane and visual selection. In normal mode `g`
/// opens the grid first, so buffer-top is reachable only while selecting.
pub fn motion_for(key: Key) -> Option<Motion> {
    let motion = match key {
        Key::Char('h') | Key::Left => Motion::Left,
        Key::Char('l') | Key::Right => Motion::Right,
        Key::Char('k') | Key::Up => Motion::Up,
        Key::Char('j') | Key::Down => Motion::Down,
        Key::Char('w') => Motion::WordForward,
        Key::Char('b') => Motion::WordBackward,
        Key::Char('0') => Motion::LineStart,
        Key::Char('$') => Motion::LineEnd,
        Key::Char('g') => Motion::BufferTop,
        Key::Char('G') => Motion::BufferBottom,
        _ => return None,
    };
    Some(motion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_keys_follow_focus() {
        assert_eq!(
            normal_action(Key::Char('j'), PaneFocus::List),
            Some(Action::ListDown)
        );
        assert_eq!(
            normal_action(Key::Char('j'), PaneFocus::Note),
            Some(Action::Move(Motion::Down))
        );
        assert_eq!(normal_action(Key::Up, PaneFocus::List), Some(Action::ListUp));
    }

    #[test]
    fn word_motions_map_in_normal_mode() {
        assert_eq!(
            normal_action(Key::Char('w'), PaneFocus::Note),
            Some(Action::Move(Motion::WordForward))
        );
        assert_eq!(
            normal_action(Key::Char('$'), PaneFocus::List),
            Some(Action::Move(Motion::LineEnd))
        );
    }

    #[test]
    fn h_and_l_switch_panes_outside_selection() {
        assert_eq!(
            normal_action(Key::Char('h'), PaneFocus::Note),
            Some(Action::FocusList)
        );
        assert_eq!(motion_for(Key::Char('h')), Some(Motion::Left));
    }

    #[test]
    fn unknown_keys_do_nothing() {
        assert_eq!(normal_action(Key::Char('z'), PaneFocus::List), None);
        assert_eq!(normal_action(Key::Backspace, PaneFocus::List), None);
        assert_eq!(motion_for(Key::Enter), None);
    }
}
