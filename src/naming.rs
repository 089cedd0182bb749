//! Centralized name handling for collections and metadata keys.
//!
//! Collection directories are named for the filesystem (`ocean_life`,
//! `3d_shapes`) while the game shows a human title ("Ocean Life", "3D Shapes").
//! Metadata files are hand-written, so keys are matched leniently: `Title`,
//! `title` and `Title:` all mean the same field.
//!
//! ## Display Titles
//!
//! Underscores become spaces, then every word is capitalized:
//! - `ocean_life/` → "Ocean Life"
//! - `BIRDS/` → "Birds"
//! - `3d_shapes/` → "3D Shapes" (a letter after a digit starts a new word)

/// Derive the display title for a collection directory name.
///
/// Underscores are replaced with spaces and the result is title-cased:
/// an alphabetic character that follows a non-alphabetic one (or opens the
/// string) is upper-cased, every other alphabetic character is lower-cased.
pub fn default_title(dir_name: &str) -> String {
    title_case(&dir_name.replace('_', " "))
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Normalize a card-definition key: trimmed, lower-cased, trailing colons removed.
///
/// - `"Image:"` → `"image"`
/// - `"MARKDOWN"` → `"markdown"`
/// - `" text: "` → `"text"`
pub fn normalize_key(key: &str) -> String {
    key.trim().trim_end_matches(':').trim_end().to_lowercase()
}

/// The key spellings accepted for a metadata field, in lookup order.
///
/// `field_keys("title")` → `["title", "Title", "Title:"]`
pub fn field_keys(field: &str) -> [String; 3] {
    let mut chars = field.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    let with_colon = format!("{capitalized}:");
    [field.to_string(), capitalized, with_colon]
}
