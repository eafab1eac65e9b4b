//! The card catalogue.

use std::fmt;
use std::str::FromStr;

use crate::game_state::errors::ChessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    MagicStorm,
    StrategicJump,
    QuickStep,
    Teleport,
    PoisonedPiece,
    RookSweep,
    DivineIntervention,
    Arise,
    Chaos,
    UncoordinatedAttack,
}

impl CardKind {
    pub const ALL: [CardKind; 10] = [
        CardKind::MagicStorm,
        CardKind::StrategicJump,
        CardKind::QuickStep,
        CardKind::Teleport,
        CardKind::PoisonedPiece,
        CardKind::RookSweep,
        CardKind::DivineIntervention,
        CardKind::Arise,
        CardKind::Chaos,
        CardKind::UncoordinatedAttack,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            CardKind::MagicStorm => "magic-storm",
            CardKind::StrategicJump => "strategic-jump",
            CardKind::QuickStep => "quick-step",
            CardKind::Teleport => "teleport",
            CardKind::PoisonedPiece => "poisoned-piece",
            CardKind::RookSweep => "rook-sweep",
            CardKind::DivineIntervention => "divine-intervention",
            CardKind::Arise => "arise",
            CardKind::Chaos => "chaos",
            CardKind::UncoordinatedAttack => "uncoordinated-attack",
        }
    }

    /// Cards that wait for board selections before they resolve.
    pub const fn is_deferred(self) -> bool {
        matches!(
            self,
            CardKind::PoisonedPiece
                | CardKind::RookSweep
                | CardKind::DivineIntervention
                | CardKind::Arise
        )
    }

    /// Cards after which the player still makes a normal move.
    pub const fn keeps_turn(self) -> bool {
        matches!(
            self,
            CardKind::MagicStorm | CardKind::StrategicJump | CardKind::Teleport
        )
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardKind {
    type Err = ChessError;

    /// Accepts the kebab-case name, ignoring case, `_` and `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        CardKind::ALL
            .into_iter()
            .find(|card| card.name().replace('-', "") == wanted)
            .ok_or_else(|| ChessError::UnknownCard(s.to_owned()))
    }
}
