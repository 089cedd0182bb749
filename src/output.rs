//! CLI output formatting for the `check` command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each collection
//! leads with its positional index, display title and counts; the directory
//! and metadata details follow as indented context lines, then one line per
//! pair. Problems are grouped at the end so they are easy to spot.
//!
//! ```text
//! Collections
//! 001 Animals (2 pairs, 2 images)
//!     Source: animals/
//!     Furry and feathered friends.
//!     001 cat.png = cat.png
//!     002 dog.jpg = dog.jpg
//! 002 First Words (3 pairs, 0 images)
//!     Source: vocabulary/
//!     001 "Hello" = "Hola"
//!
//! Skipped
//!     empty/: no images or pairs
//!
//! Errors
//!     broken/: Invalid pair 1: image 'b.png' not found in collection
//! ```
//!
//! [`format_check_output`] is pure (returns `Vec<String>`) for testability;
//! [`print_check_output`] writes it to stdout.

use crate::pairs::{CardDefinition, PairDefinition};
use crate::scan::{Collection, Inspection};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// `001 Ocean Life (3 pairs, 3 images)`
fn collection_header(index: usize, collection: &Collection, pair_count: usize) -> String {
    format!(
        "{} {} ({}, {})",
        format_index(index),
        collection.metadata.title,
        plural(pair_count, "pair"),
        plural(collection.assets.len(), "image")
    )
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

/// Image faces show their filename, text faces their quoted first line.
fn face_label(card: &CardDefinition) -> String {
    match card {
        CardDefinition::Image { filename } => filename.clone(),
        CardDefinition::Markdown { content } => {
            let first_line = content.lines().next().unwrap_or_default();
            format!("\"{}\"", truncate(first_line, 30))
        }
    }
}

fn pair_line(index: usize, pair: &PairDefinition) -> String {
    format!(
        "{} {} = {}",
        format_index(index),
        face_label(&pair.cards[0]),
        face_label(&pair.cards[1])
    )
}

/// Format the result of inspecting the collections root.
pub fn format_check_output(inspections: &[Inspection]) -> Vec<String> {
    let mut lines = vec!["Collections".to_string()];
    let mut skipped = Vec::new();
    let mut errors = Vec::new();
    let mut position = 0;

    for inspection in inspections {
        match inspection {
            Inspection::Playable { collection, pairs } => {
                position += 1;
                lines.push(collection_header(position, collection, pairs.len()));
                lines.push(format!("{}Source: {}/", indent(1), collection.id));

                if let Some(desc) = &collection.metadata.description {
                    lines.push(format!("{}{}", indent(1), truncate(desc.trim(), 60)));
                }
                if let Some(icon) = collection.icon() {
                    lines.push(format!("{}Icon: {}", indent(1), icon));
                }
                if let Some(credit) = &collection.metadata.source {
                    lines.push(format!("{}Credit: {}", indent(1), credit));
                }
                for (i, pair) in pairs.iter().enumerate() {
                    lines.push(format!("{}{}", indent(1), pair_line(i + 1, pair)));
                }
            }
            Inspection::Skipped { id, reason } => {
                skipped.push(format!("{}{}/: {}", indent(1), id, reason));
            }
            Inspection::Broken { id, error } => {
                errors.push(format!("{}{}/: {}", indent(1), id, error));
            }
        }
    }

    if position == 0 {
        lines.push(format!("{}(none)", indent(1)));
    }
    if !skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        lines.extend(skipped);
    }
    if !errors.is_empty() {
        lines.push(String::new());
        lines.push("Errors".to_string());
        lines.extend(errors);
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(inspections: &[Inspection]) {
    for line in format_check_output(inspections) {
        println!("{}", line);
    }
}

/// Number of misconfigured collections in an inspection.
pub fn error_count(inspections: &[Inspection]) -> usize {
    inspections
        .iter()
        .filter(|i| matches!(i, Inspection::Broken { .. }))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::inspect;
    use crate::test_helpers::*;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "pair"), "1 pair");
        assert_eq!(plural(0, "image"), "0 images");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("héllo", 10), "héllo");
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn face_labels() {
        assert_eq!(face_label(&CardDefinition::image("cat.png")), "cat.png");
        assert_eq!(
            face_label(&CardDefinition::markdown("line one\nline two")),
            "\"line one\""
        );
    }

    #[test]
    fn check_output_for_fixtures() {
        let tmp = setup_fixtures();
        let lines = format_check_output(&inspect(tmp.path()).unwrap());

        assert_eq!(lines[0], "Collections");
        assert_eq!(lines[1], "001 Animals (2 pairs, 2 images)");
        assert_eq!(lines[2], "    Source: animals/");
        assert_eq!(lines[3], "    Furry and feathered friends.");
        assert_eq!(lines[4], "    Icon: cat.png");
        assert_eq!(lines[5], "    001 cat.png = cat.png");
        assert!(lines.contains(&"002 Ocean Life (3 pairs, 3 images)".to_string()));
        assert!(lines.contains(&"    Credit: Public domain illustrations".to_string()));
        assert!(lines.contains(&"003 First Words (3 pairs, 0 images)".to_string()));
        assert!(lines.contains(&"    001 \"Hello\" = \"Hola\"".to_string()));
        assert!(lines.contains(&"    003 \"Gracias\" = \"Gracias\"".to_string()));
        assert!(lines.contains(&"Skipped".to_string()));
        assert!(lines.contains(&"    empty/: no images or pairs".to_string()));
        assert!(!lines.contains(&"Errors".to_string()));
    }

    #[test]
    fn check_output_lists_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_collection(tmp.path(), "broken", &["a.png"]);
        write_description_json(tmp.path(), "broken", "{oops");

        let inspections = inspect(tmp.path()).unwrap();
        let lines = format_check_output(&inspections);

        assert_eq!(lines[1], "    (none)");
        assert_eq!(lines[3], "Errors");
        assert!(lines[4].starts_with("    broken/: Invalid JSON in description.json"));
        assert_eq!(error_count(&inspections), 1);
    }
}
