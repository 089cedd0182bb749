//! Pair derivation: turning a collection into two-sided cards.
//!
//! A pair is what the player has to match. Every pair has exactly two faces,
//! each either an image from the collection or a short piece of markdown.
//!
//! ## Declared pairs
//!
//! `description.json` may list pairs explicitly:
//!
//! ```json
//! "pairs": [
//!   [{"image": "whale.png"}, {"text": "Whale"}],
//!   [{"Image:": "crab.png"}],
//!   [{"markdown": "**H2O**"}, {"text": "Water"}]
//! ]
//! ```
//!
//! - Each entry holds one or two card objects. A single card is duplicated
//!   into a same-face pair.
//! - Card keys are normalized (`Image:` → `image`) and tried in the order
//!   `image`, `markdown`, `text`; the first one that resolves is used. `text`
//!   is an alias for `markdown`. Other keys are ignored.
//! - `image` must name an asset of the same collection.
//! - A card whose recognized keys all fail reports the failure of the
//!   highest-priority one.
//!
//! Any violation is a configuration error naming the 1-based pair index.
//!
//! ## Implicit pairs
//!
//! Without a `pairs` declaration every asset becomes a same-image pair, in
//! sorted filename order.

use crate::naming;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Recognized card keys in priority order.
const CARD_KEYS: &[&str] = &["image", "markdown", "text"];

#[derive(Error, Debug)]
pub enum PairError {
    #[error("Collection has no playable pairs.")]
    NoPairs,
    #[error("Invalid pairs declaration: 'pairs' must be a list")]
    NotAList,
    #[error("Invalid pair {index}: expected a list of one or two card definitions")]
    PairNotAList { index: usize },
    #[error("Invalid pair {index}: expected one or two cards, found {count}")]
    WrongCardCount { index: usize, count: usize },
    #[error("Invalid pair {index}, card {card}: expected an object")]
    CardNotAnObject { index: usize, card: usize },
    #[error("Invalid pair {index}, card {card}: expected one of 'image', 'markdown' or 'text'")]
    MissingCardKey { index: usize, card: usize },
    #[error("Invalid pair {index}: image '{filename}' not found in collection")]
    MissingImage { index: usize, filename: String },
    #[error("Invalid pair {index}, card {card}: '{key}' must be non-empty text")]
    EmptyContent {
        index: usize,
        card: usize,
        key: String,
    },
}

impl PairError {
    /// Whether this error means "nothing to play" rather than a broken declaration.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PairError::NoPairs)
    }
}

/// One face of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CardDefinition {
    Image { filename: String },
    Markdown { content: String },
}

impl CardDefinition {
    pub fn image(filename: impl Into<String>) -> Self {
        CardDefinition::Image {
            filename: filename.into(),
        }
    }

    pub fn markdown(content: impl Into<String>) -> Self {
        CardDefinition::Markdown {
            content: content.into(),
        }
    }
}

/// Two faces that match each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairDefinition {
    pub cards: [CardDefinition; 2],
}

impl PairDefinition {
    pub fn new(first: CardDefinition, second: CardDefinition) -> Self {
        Self {
            cards: [first, second],
        }
    }

    /// A pair whose two faces are the same card.
    pub fn same_face(card: CardDefinition) -> Self {
        Self::new(card.clone(), card)
    }
}

/// Derive the pairs of a collection.
///
/// `declared` is the raw `pairs` value from metadata (if any); `assets` is the
/// sorted list of asset filenames in the collection directory.
pub fn resolve_pairs(
    declared: Option<&Value>,
    assets: &[String],
) -> Result<Vec<PairDefinition>, PairError> {
    let pairs = match declared {
        Some(value) => parse_declared_pairs(value, assets)?,
        None => implicit_pairs(assets),
    };

    if pairs.is_empty() {
        return Err(PairError::NoPairs);
    }
    Ok(pairs)
}

/// One same-image pair per asset.
pub fn implicit_pairs(assets: &[String]) -> Vec<PairDefinition> {
    assets
        .iter()
        .map(|filename| PairDefinition::same_face(CardDefinition::image(filename.as_str())))
        .collect()
}

fn parse_declared_pairs(value: &Value, assets: &[String]) -> Result<Vec<PairDefinition>, PairError> {
    let entries = value.as_array().ok_or(PairError::NotAList)?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| parse_pair(i + 1, entry, assets))
        .collect()
}

fn parse_pair(index: usize, entry: &Value, assets: &[String]) -> Result<PairDefinition, PairError> {
    let cards = entry
        .as_array()
        .ok_or(PairError::PairNotAList { index })?;

    let mut resolved = cards
        .iter()
        .enumerate()
        .map(|(c, card)| parse_card(index, c + 1, card, assets))
        .collect::<Result<Vec<_>, _>>()?;

    match resolved.len() {
        1 => Ok(PairDefinition::same_face(resolved.remove(0))),
        2 => {
            let second = resolved.remove(1);
            let first = resolved.remove(0);
            Ok(PairDefinition::new(first, second))
        }
        count => Err(PairError::WrongCardCount { index, count }),
    }
}

fn parse_card(
    index: usize,
    card: usize,
    value: &Value,
    assets: &[String],
) -> Result<CardDefinition, PairError> {
    let object = value
        .as_object()
        .ok_or(PairError::CardNotAnObject { index, card })?;

    let mut attempts = recognized_keys(object)
        .into_iter()
        .map(|(key, raw)| resolve_card(index, card, key, raw, assets));

    // Highest-priority key that resolves wins; otherwise report the first failure.
    let first_error = match attempts.next() {
        None => return Err(PairError::MissingCardKey { index, card }),
        Some(Ok(resolved)) => return Ok(resolved),
        Some(Err(e)) => e,
    };
    attempts.find_map(Result::ok).ok_or(first_error)
}

fn resolve_card(
    index: usize,
    card: usize,
    key: &str,
    raw: &Value,
    assets: &[String],
) -> Result<CardDefinition, PairError> {
    let text = raw.as_str().map(str::trim).filter(|s| !s.is_empty());
    match (key, text) {
        ("image", Some(filename)) if assets.iter().any(|a| a == filename) => {
            Ok(CardDefinition::image(filename))
        }
        ("image", Some(filename)) => Err(PairError::MissingImage {
            index,
            filename: filename.to_string(),
        }),
        (_, Some(content)) => Ok(CardDefinition::markdown(content)),
        (key, None) => Err(PairError::EmptyContent {
            index,
            card,
            key: key.to_string(),
        }),
    }
}

/// Recognized keys of a card object, normalized and in priority order.
fn recognized_keys(object: &Map<String, Value>) -> Vec<(&'static str, &Value)> {
    let mut matched: Vec<(&'static str, &Value)> = object
        .iter()
        .filter_map(|(key, value)| {
            let normalized = naming::normalize_key(key);
            CARD_KEYS
                .iter()
                .find(|k| **k == normalized)
                .map(|k| (*k, value))
        })
        .collect();
    matched.sort_by_key(|(k, _)| CARD_KEYS.iter().position(|c| c == k));
    matched
}
