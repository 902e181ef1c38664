//! Annotation tags painted at the centre of a metadata cell.

use serde::Serialize;

use crate::types::{Collectible, Colour, Marker, MetadataCell, Reaction};

/// Special role of a cell, read from its centre colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tag {
    Breakable,
    GhostCollision,
    Collectible,
    HiddenCollectible,
    Throwable,
    ChainReaction,
    TerminalReaction,
    BreakableChainReaction,
    TerminalBreakableChainReaction,
}

impl Tag {
    /// Classify from the centre and off-centre samples.
    ///
    /// A doubled marker (same colour at both samples) selects the ghost or
    /// terminal variant. Blue, black and white centres carry no tag.
    pub fn classify(center: Colour, off_center: Colour) -> Option<Tag> {
        let marker = center.marker()?;
        let doubled = off_center.marker() == Some(marker);
        let tag = match (marker, doubled) {
            (Marker::Red, false) => Tag::Breakable,
            (Marker::Red, true) => Tag::GhostCollision,
            (Marker::Green, false) => Tag::Collectible,
            (Marker::Green, true) => Tag::HiddenCollectible,
            (Marker::Yellow, _) => Tag::Throwable,
            (Marker::Cyan, false) => Tag::ChainReaction,
            (Marker::Cyan, true) => Tag::TerminalReaction,
            (Marker::Magenta, false) => Tag::BreakableChainReaction,
            (Marker::Magenta, true) => Tag::TerminalBreakableChainReaction,
            (Marker::Blue, _) => return None,
        };
        Some(tag)
    }

    /// Add this tag's bits to a cell.
    pub fn apply(self, cell: &mut MetadataCell) {
        match self {
            Tag::Breakable => cell.breakable = true,
            Tag::GhostCollision => cell.ghost = true,
            Tag::Collectible => cell.collectible = Some(Collectible::Unresolved),
            Tag::HiddenCollectible => {
                cell.collectible = Some(Collectible::Unresolved);
                cell.reaction = Reaction::TerminalTrigger;
            }
            Tag::Throwable => {}
            Tag::ChainReaction => cell.reaction = Reaction::Trigger,
            Tag::TerminalReaction => cell.reaction = Reaction::TerminalTrigger,
            Tag::BreakableChainReaction => {
                cell.reaction = Reaction::Effect;
                cell.breakable = true;
            }
            Tag::TerminalBreakableChainReaction => {
                cell.reaction = Reaction::TerminalEffect;
                cell.breakable = true;
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tag::Breakable => "breakable",
            Tag::GhostCollision => "ghost collision",
            Tag::Collectible => "collectible",
            Tag::HiddenCollectible => "hidden collectible",
            Tag::Throwable => "throwable",
            Tag::ChainReaction => "chain reaction",
            Tag::TerminalReaction => "terminal reaction",
            Tag::BreakableChainReaction => "breakable chain reaction",
            Tag::TerminalBreakableChainReaction => "terminal breakable chain reaction",
        }
    }
}
