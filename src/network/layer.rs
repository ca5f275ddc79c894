use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::NetworkError;

/// One of the three fixed layers of a `Network`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Input,
    Hidden,
    Output,
}

impl LayerKind {
    /// Feed-forward order.
    pub const FORWARD: [LayerKind; 3] = [LayerKind::Input, LayerKind::Hidden, LayerKind::Output];
    /// Order used by the error and update passes.
    pub const BACKWARD: [LayerKind; 3] = [LayerKind::Output, LayerKind::Hidden, LayerKind::Input];

    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Input => "input",
            LayerKind::Hidden => "hidden",
            LayerKind::Output => "output",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerKind {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "input" => Ok(LayerKind::Input),
            "hidden" => Ok(LayerKind::Hidden),
            "output" => Ok(LayerKind::Output),
            _ => Err(NetworkError::UnknownLayer(s.to_string())),
        }
    }
}
