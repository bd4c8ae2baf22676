// src/constants.rs
//
// Application-wide constants: naming conventions of the input tree, fixed
// identifiers of the generated package and the default locations.

/// File name suffix marking the question side of a note.
///
/// Used in: `domain/note.rs`
pub const FRONT_SUFFIX: &str = ".front.html";

/// File name suffix marking the answer side of a note.
///
/// Used in: `domain/note.rs`
pub const BACK_SUFFIX: &str = ".back.html";

/// Note prefix ending that asks for an additional reverse card.
///
/// `vocab.reversible.front.html` + `vocab.reversible.back.html` produce a
/// forward and a reverse card.
///
/// Used in: `domain/note.rs`
pub const REVERSIBLE_MARKER: &str = ".reversible";

/// Extension of the written deck packages.
///
/// Used in: `application/writer.rs`
pub const PACKAGE_EXTENSION: &str = "apkg";

/// Deck id shared by every generated deck unless per-name ids are requested.
///
/// Used in: `domain/deck.rs`, `infrastructure/config.rs`
pub const DEFAULT_DECK_ID: i64 = 356246245;

/// Id of the built-in `Default` deck present in every Anki collection.
///
/// Used in: `infrastructure/apkg.rs`, `infrastructure/config.rs`
pub const ANKI_DEFAULT_DECK_ID: i64 = 1;

/// Model id of the forward layout (front asked, back answered).
pub const FORWARD_MODEL_ID: i64 = 13524624;

/// Model id of the reverse layout (back asked, front answered).
pub const REVERSE_MODEL_ID: i64 = 13524625;

/// Seconds since the epoch stamped into every row of a package.
///
/// A fixed value keeps repeated builds byte-identical. 2020-01-01T00:00:00Z.
///
/// Used in: `infrastructure/apkg.rs`, `infrastructure/config.rs`
pub const DEFAULT_PACKAGE_TIMESTAMP: i64 = 1_577_836_800;

/// Directory scanned for deck folders when nothing else is configured.
pub const DEFAULT_DECKS_DIR: &str = "decks";

/// Directory receiving the packages when nothing else is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Config file picked up from the working directory if present.
///
/// Used in: `lib.rs`
pub const DEFAULT_CONFIG_FILE: &str = "ankipack.toml";
