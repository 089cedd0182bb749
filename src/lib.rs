//! # Memory Game
//!
//! Backend for a memory-matching card game. The filesystem is the data
//! source: every directory under the collections root is a collection of
//! cards, image files become matching pairs of identical cards, and an
//! optional `description.json` can declare pairs that mix images with text.
//!
//! # Request Flow
//!
//! Nothing is cached. Every request reads the collections root again, so
//! adding a directory or editing a `description.json` shows up immediately:
//!
//! ```text
//! request → scan (directories, assets) → metadata (description.json / .md)
//!         → pairs (declared or implicit) → JSON response
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds collection directories and their image assets, resolves safe paths |
//! | [`metadata`] | Reads `description.json` / `description.md` with tolerant key spellings |
//! | [`pairs`] | Turns declared pair lists (or the asset list) into validated card pairs |
//! | [`server`] | axum router, handlers, CORS and error responses |
//! | [`types`] | JSON shapes returned by the HTTP API |
//! | [`config`] | `config.toml` loading, environment overrides, validation |
//! | [`naming`] | Display titles from directory names, key normalization |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`output`] | CLI output for the `check` command |
//!
//! # Design Decisions
//!
//! ## Misconfiguration Is a Server Error
//!
//! A collection that declares a pair referencing a missing image, or a card
//! with no recognizable content, is a mistake on the server side. Those
//! requests answer 500 with a message naming the problem, while a collection
//! or file that simply does not exist answers 404. The `check` command
//! reports every such problem at once without starting the server.
//!
//! ## Tolerant Metadata Keys
//!
//! Collections are hand-edited. `title`, `Title` and `Title:` are all read
//! as the title, in that order, so a colon left over from a plain-text draft
//! does not silently drop the field.

pub mod config;
pub mod logging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod pairs;
pub mod scan;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
