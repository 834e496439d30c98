use console::{style, StyledObject};

use crate::view::JobState;

pub fn pending(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn done(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn dim(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn heading(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().underlined()
}

pub fn magenta_bold(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

/// Colors a counter with the color its jobs get on the web page.
pub fn state_count(state: JobState, count: usize) -> StyledObject<String> {
    let text = style(format!("{} {count}", state.label()));
    match state {
        JobState::Queued => text.blue(),
        JobState::Running | JobState::Succeeded => text.green(),
        JobState::Failed => text.red(),
    }
}
