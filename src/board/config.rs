// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::material::Material;
use super::position::{Position, FEN_EMPTY};
use super::square::Orientation;

/// Animation timings in milliseconds. `in`, `out` and `move` fall back
/// to the base `duration` when unset.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Durations {
    #[serde(rename = "duration")]
    pub base: u64,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<u64>,
    #[serde(rename = "out", skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<u64>,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub slide: Option<u64>,
    pub snap: u64,
    pub snapback: u64,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            base: 300,
            fade_in: None,
            fade_out: None,
            slide: None,
            snap: 0,
            snapback: 0,
        }
    }
}

impl Durations {
    pub fn in_duration(&self) -> Duration {
        Duration::from_millis(self.fade_in.unwrap_or(self.base))
    }
    pub fn out_duration(&self) -> Duration {
        Duration::from_millis(self.fade_out.unwrap_or(self.base))
    }
    pub fn move_duration(&self) -> Duration {
        Duration::from_millis(self.slide.unwrap_or(self.base))
    }
    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap)
    }
    pub fn snapback_duration(&self) -> Duration {
        Duration::from_millis(self.snapback)
    }
}

/// Widget options. Keys follow the widget's attribute names
/// (`show-ghost`, `board-theme`, ..); every key is optional.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct BoardConfig {
    /// Initial placement. `start` and `new` stand for the start position.
    pub fen: String,
    pub orientation: Orientation,
    pub interactive: bool,
    pub show_ghost: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_theme: Option<String>,
    pub min_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f64>,
    pub animation: Durations,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            fen: FEN_EMPTY.to_string(),
            orientation: Orientation::White,
            interactive: false,
            show_ghost: false,
            board_theme: None,
            min_size: 0.0,
            max_size: None,
            animation: Durations::default(),
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parse a FEN string, accepting the `start` and `new` aliases.
pub fn parse_fen(fen: &str) -> Result<Position> {
    match fen.trim() {
        "start" | "new" => Ok(Position::start()),
        fen => Position::from_fen(fen),
    }
}

type PieceTheme = Box<dyn Fn(Material) -> String>;

/// Art references handed to the renderer as style properties.
#[derive(Default)]
pub struct Theme {
    board: Option<String>,
    pieces: Option<PieceTheme>,
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme")
            .field("board", &self.board)
            .field("pieces", &self.pieces.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Theme {
    pub fn new(board: Option<String>) -> Self {
        Self {
            board,
            pieces: None,
        }
    }

    pub fn with_pieces<F>(mut self, pieces: F) -> Self
    where
        F: Fn(Material) -> String + 'static,
    {
        self.pieces = Some(Box::new(pieces));
        self
    }

    pub fn set_pieces<F>(&mut self, pieces: F)
    where
        F: Fn(Material) -> String + 'static,
    {
        self.pieces = Some(Box::new(pieces));
    }

    pub fn set_board(&mut self, board: Option<String>) {
        self.board = board;
    }

    pub fn board(&self) -> Option<&str> {
        self.board.as_deref()
    }

    pub fn piece(&self, material: Material) -> Option<String> {
        self.pieces.as_ref().map(|f| f(material))
    }

    /// `(name, value)` pairs such as `("--wk-theme", "url('wk.svg')")`.
    pub fn properties(&self) -> Vec<(String, String)> {
        let mut props = Vec::new();
        if let Some(board) = &self.board {
            props.push(("--board-theme".to_string(), format!("url('{board}')")));
        }
        if let Some(pieces) = &self.pieces {
            for material in Material::all() {
                let name = format!(
                    "--{}{}-theme",
                    material.color().letter(),
                    material.piece().symbol()
                );
                props.push((name, format!("url('{}')", pieces(material))));
            }
        }
        props
    }
}
