//! Decoded control input: addressed numeric messages and manual key/pointer events.

use crate::foundation::core::Point;
use crate::scene::router::SceneKind;

/// Address-pattern message with its numeric arguments.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlMessage {
    /// OSC-style address, e.g. `/bass_level`.
    pub address: String,
    /// Numeric payload.
    #[serde(default)]
    pub args: Vec<f32>,
}

impl ControlMessage {
    /// Build a message.
    pub fn new(address: impl Into<String>, args: Vec<f32>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// First argument, if present and finite.
    pub fn first_arg(&self) -> Option<f64> {
        self.args
            .first()
            .copied()
            .filter(|v| v.is_finite())
            .map(f64::from)
    }
}

/// Recognized control addresses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlCommand {
    /// `/kick`: onset trigger.
    Kick,
    /// `/bass_level <0..1>`.
    BassLevel(f64),
    /// `/melody_note <0..1 or MIDI>`.
    MelodyNote(f64),
    /// `/texture <0..1>`.
    Texture(f64),
    /// `/contrast <0..1>`.
    Contrast(f64),
}

impl ControlCommand {
    /// Match a message against the address table.
    ///
    /// Unknown addresses, and level messages without a finite first argument, yield `None`.
    pub fn parse(msg: &ControlMessage) -> Option<Self> {
        match msg.address.as_str() {
            "/kick" => Some(Self::Kick),
            "/bass_level" => msg.first_arg().map(Self::BassLevel),
            "/melody_note" => msg.first_arg().map(Self::MelodyNote),
            "/texture" => msg.first_arg().map(Self::Texture),
            "/contrast" => msg.first_arg().map(Self::Contrast),
            _ => None,
        }
    }

    /// Address this command was parsed from.
    pub fn address(&self) -> &'static str {
        match self {
            Self::Kick => "/kick",
            Self::BassLevel(_) => "/bass_level",
            Self::MelodyNote(_) => "/melody_note",
            Self::Texture(_) => "/texture",
            Self::Contrast(_) => "/contrast",
        }
    }
}

/// Raw manual input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Key press.
    Key(char),
    /// Pointer click at output coordinates.
    Click(Point),
}

/// Manual operation an [`InputEvent`] maps to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ManualCommand {
    /// `1` / `2`.
    SelectScene(SceneKind),
    /// `c`.
    ClearWords,
    /// Space.
    RetriggerAll,
    /// `n`.
    SpawnPair,
    /// `3` / `4` / `5`.
    SelectDualitySet(usize),
    /// Click.
    SpawnClick(Point),
}

impl InputEvent {
    /// Key binding table; unbound keys yield `None`.
    pub fn command(self) -> Option<ManualCommand> {
        match self {
            Self::Key('1') => Some(ManualCommand::SelectScene(SceneKind::Landscape)),
            Self::Key('2') => Some(ManualCommand::SelectScene(SceneKind::Dualism)),
            Self::Key('c') => Some(ManualCommand::ClearWords),
            Self::Key(' ') => Some(ManualCommand::RetriggerAll),
            Self::Key('n') => Some(ManualCommand::SpawnPair),
            Self::Key(k @ '3'..='5') => {
                Some(ManualCommand::SelectDualitySet(k as usize - '3' as usize))
            }
            Self::Key(_) => None,
            Self::Click(p) => Some(ManualCommand::SpawnClick(p)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/control/message.rs"]
mod tests;
