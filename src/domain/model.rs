// src/domain/model.rs
use crate::constants::{FORWARD_MODEL_ID, REVERSE_MODEL_ID};
use crate::domain::NoteContent;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Field names shared by both layouts, in storage order.
pub const FIELD_NAMES: [&str; 2] = ["Front", "Back"];

lazy_static! {
    static ref FIELD_REF: Regex =
        Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("Failed to compile field reference regex");
}

/// Question/answer pair of a single card template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardTemplate {
    pub name: &'static str,
    pub qfmt: &'static str,
    pub afmt: &'static str,
}

/// A fixed card layout: two fields and one template.
#[derive(Debug, PartialEq, Eq)]
pub struct CardModel {
    pub id: i64,
    pub name: &'static str,
    pub template: CardTemplate,
}

/// Front asked, back answered.
pub static FORWARD_MODEL: CardModel = CardModel {
    id: FORWARD_MODEL_ID,
    name: "Default Layout",
    template: CardTemplate {
        name: "Default",
        qfmt: "{{Front}}",
        afmt: "{{Back}}",
    },
};

/// Back asked, front answered.
pub static REVERSE_MODEL: CardModel = CardModel {
    id: REVERSE_MODEL_ID,
    name: "Reverse Layout",
    template: CardTemplate {
        name: "Default",
        qfmt: "{{Back}}",
        afmt: "{{Front}}",
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub question: String,
    pub answer: String,
}

impl CardModel {
    pub fn field_names(&self) -> &'static [&'static str] {
        &FIELD_NAMES
    }

    /// Render question and answer by substituting `{{Field}}` references.
    ///
    /// Unknown fields render as empty text.
    pub fn render(&self, content: &NoteContent) -> RenderedCard {
        RenderedCard {
            question: substitute(self.template.qfmt, content),
            answer: substitute(self.template.afmt, content),
        }
    }

    /// Ordinals of the fields the question format refers to.
    ///
    /// A card is generated only if one of them is non-empty.
    pub fn question_fields(&self) -> Vec<usize> {
        let mut ords: Vec<usize> = FIELD_REF
            .captures_iter(self.template.qfmt)
            .filter_map(|caps| field_ordinal(&caps[1]))
            .collect();
        ords.sort_unstable();
        ords.dedup();
        ords
    }
}

fn field_ordinal(name: &str) -> Option<usize> {
    FIELD_NAMES.iter().position(|field| *field == name)
}

fn substitute(format: &str, content: &NoteContent) -> String {
    let fields = content.fields();
    FIELD_REF
        .replace_all(format, |caps: &Captures| {
            field_ordinal(&caps[1])
                .map(|ord| fields[ord].to_string())
                .unwrap_or_default()
        })
        .into_owned()
}
