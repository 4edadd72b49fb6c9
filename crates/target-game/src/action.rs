//! Typed player actions and the dispatch table that applies them.
//!
//! The page tags its controls with `data-action` values (`restart`, `undo`,
//! `skip`, `edit`, ...). Those strings are parsed once into [`ActionKind`]
//! and routed through a [`Dispatcher`] table to the matching handler.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::state::{GameError, GameState, Throw};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Arrow dragged over the board
    Aim,
    /// Arrow released
    Drop,
    Skip,
    Undo,
    Restart,
    /// Enter or leave segment edit mode
    Edit,
    ToggleSegment,
    ToggleAt,
    CloseRound,
}

impl ActionKind {
    pub const ALL: [ActionKind; 9] = [
        ActionKind::Aim,
        ActionKind::Drop,
        ActionKind::Skip,
        ActionKind::Undo,
        ActionKind::Restart,
        ActionKind::Edit,
        ActionKind::ToggleSegment,
        ActionKind::ToggleAt,
        ActionKind::CloseRound,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aim => "aim",
            Self::Drop => "drop",
            Self::Skip => "skip",
            Self::Undo => "undo",
            Self::Restart => "restart",
            Self::Edit => "edit",
            Self::ToggleSegment => "toggle-segment",
            Self::ToggleAt => "toggle-at",
            Self::CloseRound => "close-round",
        }
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ActionError::Unknown(name.to_string()))
    }
}

/// Arguments carried by an action. Which ones are required depends on the kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionArgs {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub segment: Option<String>,
    /// For `edit`: explicit mode; flips the current mode when absent
    #[serde(default)]
    pub editing: Option<bool>,
}

impl ActionArgs {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn segment(name: &str) -> Self {
        Self {
            segment: Some(name.to_string()),
            ..Self::default()
        }
    }

    fn point(&self, kind: ActionKind) -> Result<(f64, f64), ActionError> {
        let x = self.x.ok_or(ActionError::MissingArgument { action: kind, argument: "x" })?;
        let y = self.y.ok_or(ActionError::MissingArgument { action: kind, argument: "y" })?;
        Ok((x, y))
    }
}

/// What happened as a result of an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Aimed { segment: Option<String> },
    /// Arrow released off the board or over a disabled segment
    Missed,
    Scored(Throw),
    Skipped { word: Option<String> },
    Undone { word: Option<String> },
    Restarted { word: Option<String> },
    EditingChanged { editing: bool },
    SegmentToggled { segment: String, enabled: bool },
    RoundClosed { word: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    Unknown(String),
    MissingArgument { action: ActionKind, argument: &'static str },
    Unhandled(ActionKind),
    Game(GameError),
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::Unknown(name) => write!(f, "Unknown action \"{}\"", name),
            ActionError::MissingArgument { action, argument } => {
                write!(f, "Action \"{}\" requires \"{}\"", action.as_str(), argument)
            }
            ActionError::Unhandled(kind) => write!(f, "No handler for \"{}\"", kind.as_str()),
            ActionError::Game(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<GameError> for ActionError {
    fn from(e: GameError) -> Self {
        ActionError::Game(e)
    }
}

pub type Handler = fn(&mut GameState, &ActionArgs) -> Result<GameEvent, ActionError>;

/// Routing table from action kind to handler, built once per game.
pub struct Dispatcher {
    handlers: HashMap<ActionKind, Handler>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut handlers: HashMap<ActionKind, Handler> = HashMap::new();
        handlers.insert(ActionKind::Aim, aim);
        handlers.insert(ActionKind::Drop, release);
        handlers.insert(ActionKind::Skip, skip);
        handlers.insert(ActionKind::Undo, undo);
        handlers.insert(ActionKind::Restart, restart);
        handlers.insert(ActionKind::Edit, edit);
        handlers.insert(ActionKind::ToggleSegment, toggle_segment);
        handlers.insert(ActionKind::ToggleAt, toggle_at);
        handlers.insert(ActionKind::CloseRound, close_round);
        Self { handlers }
    }

    pub fn dispatch(
        &self,
        state: &mut GameState,
        kind: ActionKind,
        args: &ActionArgs,
    ) -> Result<GameEvent, ActionError> {
        let handler = self.handlers.get(&kind).ok_or(ActionError::Unhandled(kind))?;
        handler(state, args)
    }

    /// Parse `name` and dispatch it.
    pub fn dispatch_named(
        &self,
        state: &mut GameState,
        name: &str,
        args: &ActionArgs,
    ) -> Result<GameEvent, ActionError> {
        let kind: ActionKind = name.parse()?;
        self.dispatch(state, kind, args)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn owned(word: Option<&str>) -> Option<String> {
    word.map(str::to_string)
}

fn aim(state: &mut GameState, args: &ActionArgs) -> Result<GameEvent, ActionError> {
    let (x, y) = args.point(ActionKind::Aim)?;
    let segment = owned(state.aim(x, y)?);
    Ok(GameEvent::Aimed { segment })
}

fn release(state: &mut GameState, args: &ActionArgs) -> Result<GameEvent, ActionError> {
    let (x, y) = args.point(ActionKind::Drop)?;
    Ok(match state.drop_at(x, y)? {
        Some(throw) => GameEvent::Scored(throw),
        None => GameEvent::Missed,
    })
}

fn skip(state: &mut GameState, _args: &ActionArgs) -> Result<GameEvent, ActionError> {
    Ok(GameEvent::Skipped { word: owned(state.skip()) })
}

fn undo(state: &mut GameState, _args: &ActionArgs) -> Result<GameEvent, ActionError> {
    Ok(GameEvent::Undone { word: owned(state.undo()) })
}

fn restart(state: &mut GameState, _args: &ActionArgs) -> Result<GameEvent, ActionError> {
    Ok(GameEvent::Restarted { word: owned(state.restart()) })
}

fn edit(state: &mut GameState, args: &ActionArgs) -> Result<GameEvent, ActionError> {
    let editing = args.editing.unwrap_or(!state.is_editing());
    state.set_editing(editing);
    Ok(GameEvent::EditingChanged { editing })
}

fn toggle_segment(state: &mut GameState, args: &ActionArgs) -> Result<GameEvent, ActionError> {
    let segment = args.segment.clone().ok_or(ActionError::MissingArgument {
        action: ActionKind::ToggleSegment,
        argument: "segment",
    })?;
    let enabled = state.toggle_segment(&segment)?;
    Ok(GameEvent::SegmentToggled { segment, enabled })
}

fn toggle_at(state: &mut GameState, args: &ActionArgs) -> Result<GameEvent, ActionError> {
    let (x, y) = args.point(ActionKind::ToggleAt)?;
    Ok(match state.toggle_at(x, y)? {
        Some((segment, enabled)) => GameEvent::SegmentToggled { segment, enabled },
        None => GameEvent::Missed,
    })
}

fn close_round(state: &mut GameState, _args: &ActionArgs) -> Result<GameEvent, ActionError> {
    Ok(GameEvent::RoundClosed { word: owned(state.close_round()) })
}
