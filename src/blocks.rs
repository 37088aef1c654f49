//! Rich-content block tree flattening and rendering.
//!
//! Exported messages carry formatted text as a nested tree: a root block
//! holds section-like child blocks (plain sections, preformatted runs,
//! quotes, lists), and each of those holds ordered leaf elements (text
//! spans, links, emoji, mentions). This module flattens that tree into a
//! linear leaf sequence and renders each leaf to a normalized text fragment.
//!
//! The input shape is loose JSON, so parsing is best-effort: unknown block
//! kinds are skipped with a diagnostic, unknown leaf kinds render to an empty
//! fragment with a diagnostic. Neither is fatal.

use serde_json::Value;
use tracing::warn;

use crate::text::Normalizer;

/// An atomic content unit within the block tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    /// Plain text span.
    Text {
        /// The span's raw text.
        text: String,
    },
    /// Hyperlink, optionally with display text.
    Link {
        /// Display text; absent when the export carries only the URL.
        text: Option<String>,
    },
    /// Named emoji reference.
    Emoji {
        /// Emoji short-name, e.g. `thumbsup`.
        name: String,
    },
    /// Mention of a single user.
    UserMention {
        /// Workspace-assigned user identifier.
        user_id: String,
    },
    /// Broadcast mention (`@here`, `@channel`, ...).
    Broadcast {
        /// Broadcast range name.
        range: String,
    },
    /// A leaf kind this version does not know.
    Unknown {
        /// The unrecognized `type` tag.
        kind: String,
    },
}

/// One level of block-type dispatch above the leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `rich_text_section`: leaves contributed directly, in order.
    Section(Vec<Leaf>),
    /// `rich_text_preformatted`: treated like a section.
    Preformatted(Vec<Leaf>),
    /// `rich_text_quote`: treated like a section.
    Quote(Vec<Leaf>),
    /// `rich_text`: a nested root, treated like a section.
    Root(Vec<Leaf>),
    /// `rich_text_list`: groups of leaves, concatenated group by group.
    List(Vec<Vec<Leaf>>),
    /// A block kind this version does not know; contributes nothing.
    Unrecognized {
        /// The unrecognized `type` tag.
        kind: String,
    },
}

impl Leaf {
    /// Best-effort parse of one leaf element from loose JSON.
    ///
    /// Missing sub-fields degrade to empty strings rather than failing; a
    /// missing or non-string `type` yields [`Leaf::Unknown`].
    pub fn from_value(value: &Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or("");
        match kind {
            "text" => Leaf::Text {
                text: str_field(value, "text"),
            },
            "link" => Leaf::Link {
                text: value
                    .get("text")
                    .and_then(Value::as_str)
                    .map(ToString::to_string),
            },
            "emoji" => Leaf::Emoji {
                name: str_field(value, "name"),
            },
            "user" => Leaf::UserMention {
                user_id: str_field(value, "user_id"),
            },
            "broadcast" => Leaf::Broadcast {
                range: str_field(value, "range"),
            },
            other => Leaf::Unknown {
                kind: other.to_string(),
            },
        }
    }

    /// Renders this leaf to a normalized text fragment.
    ///
    /// Sentinel scaffolding (`LINK`, `EMOJI`, `USERID`) is attached here so
    /// the pseudonymizer can recognize non-linguistic tokens later.
    pub fn render(&self, normalizer: &Normalizer) -> String {
        match self {
            Leaf::Text { text } => normalizer.normalize(text),
            Leaf::Link { text } => match text {
                // Display text is sometimes the URL itself; only keep it when
                // it does not look like a bare address.
                Some(t) if !t.contains("www") && !t.contains(".com") => {
                    format!("{} (LINK)", normalizer.normalize(t))
                }
                _ => "LINK".to_string(),
            },
            Leaf::Emoji { name } => format!("{name}EMOJI"),
            Leaf::UserMention { user_id } => format!("@{user_id}USERID"),
            Leaf::Broadcast { range } => format!("@{range}USERID"),
            Leaf::Unknown { kind } => {
                warn!(%kind, "unknown leaf element kind renders to nothing");
                String::new()
            }
        }
    }
}

impl Block {
    /// Best-effort parse of one block from loose JSON.
    pub fn from_value(value: &Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or("");
        match kind {
            "rich_text_section" => Block::Section(child_leaves(value)),
            "rich_text_preformatted" => Block::Preformatted(child_leaves(value)),
            "rich_text_quote" => Block::Quote(child_leaves(value)),
            "rich_text" => Block::Root(child_leaves(value)),
            "rich_text_list" => {
                let groups = value
                    .get("elements")
                    .and_then(Value::as_array)
                    .map(|groups| groups.iter().map(child_leaves).collect())
                    .unwrap_or_default();
                Block::List(groups)
            }
            other => Block::Unrecognized {
                kind: other.to_string(),
            },
        }
    }

    /// This block's leaves in left-to-right order; empty for unrecognized
    /// kinds.
    pub fn into_leaves(self) -> Vec<Leaf> {
        match self {
            Block::Section(leaves)
            | Block::Preformatted(leaves)
            | Block::Quote(leaves)
            | Block::Root(leaves) => leaves,
            Block::List(groups) => groups.into_iter().flatten().collect(),
            Block::Unrecognized { .. } => Vec::new(),
        }
    }
}

/// Flattens a sequence of raw block values into a linear leaf sequence.
///
/// Left-to-right order of leaves is preserved across all nesting levels.
/// Unrecognized block kinds are skipped with a diagnostic.
pub fn flatten(elements: &[Value]) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    for value in elements {
        let block = Block::from_value(value);
        if let Block::Unrecognized { ref kind } = block {
            warn!(%kind, "block kind is not recognized, elements not extracted");
            continue;
        }
        leaves.extend(block.into_leaves());
    }
    leaves
}

/// Renders and concatenates a leaf sequence into the message's full content.
///
/// The repeat collapser runs after every appended fragment, not only at the
/// end, so intermediate sentinel runs never grow unbounded across leaves.
pub fn combine(leaves: &[Leaf], normalizer: &Normalizer) -> String {
    let mut content = String::new();
    for leaf in leaves {
        content.push(' ');
        content.push_str(&leaf.render(normalizer));
        content = normalizer.collapse_repeats(&content);
    }
    content
}

/// Parses the `elements` array of a section-like block into leaves.
fn child_leaves(value: &Value) -> Vec<Leaf> {
    value
        .get("elements")
        .and_then(Value::as_array)
        .map(|elements| elements.iter().map(Leaf::from_value).collect())
        .unwrap_or_default()
}

/// Extracts a string sub-field, degrading to empty on absence.
fn str_field(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
