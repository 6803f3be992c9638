//! Reducers split by concern. Each returns `true` when it consumed the
//! message.

pub mod canvas;
pub mod workflow;

use crate::debug_log;
use crate::messages::{Command, Message};
use crate::state::EditorState;

pub fn update(state: &mut EditorState, msg: Message) -> Vec<Command> {
    let mut commands = Vec::new();
    if canvas::update(state, &msg, &mut commands) {
        return commands;
    }
    if workflow::update(state, &msg, &mut commands) {
        return commands;
    }
    debug_log!("Unhandled message: {:?}", msg);
    commands
}
