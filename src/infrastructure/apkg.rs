// src/infrastructure/apkg.rs
//
// Writes Anki 2.1 legacy packages: a ZIP holding a schema 11 `collection.anki2`
// SQLite database and an empty `media` manifest.
use crate::application::DeckPackager;
use crate::constants::ANKI_DEFAULT_DECK_ID;
use crate::domain::{CardModel, Deck, DeckNote, DomainError, FIELD_NAMES};
use crate::util::text::{field_checksum, strip_html};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;
use tracing::{debug, instrument, trace};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub const COLLECTION_ENTRY: &str = "collection.anki2";
pub const MEDIA_ENTRY: &str = "media";

const SCHEMA_VERSION: i64 = 11;
const DEFAULT_DECK_CONF_ID: i64 = 1;
const FIELD_SEPARATOR: &str = "\x1f";

const BASE91_TABLE: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

const CARD_CSS: &str = ".card {\n font-family: arial;\n font-size: 20px;\n text-align: center;\n color: black;\n background-color: white;\n}\n";
const LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n";
const LATEX_POST: &str = "\\end{document}";

const SCHEMA: &str = r#"
CREATE TABLE col (
    id              integer primary key,
    crt             integer not null,
    mod             integer not null,
    scm             integer not null,
    ver             integer not null,
    dty             integer not null,
    usn             integer not null,
    ls              integer not null,
    conf            text not null,
    models          text not null,
    decks           text not null,
    dconf           text not null,
    tags            text not null
);
CREATE TABLE notes (
    id              integer primary key,
    guid            text not null,
    mid             integer not null,
    mod             integer not null,
    usn             integer not null,
    tags            text not null,
    flds            text not null,
    sfld            integer not null,
    csum            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE cards (
    id              integer primary key,
    nid             integer not null,
    did             integer not null,
    ord             integer not null,
    mod             integer not null,
    usn             integer not null,
    type            integer not null,
    queue           integer not null,
    due             integer not null,
    ivl             integer not null,
    factor          integer not null,
    reps            integer not null,
    lapses          integer not null,
    left            integer not null,
    odue            integer not null,
    odid            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE revlog (
    id              integer primary key,
    cid             integer not null,
    usn             integer not null,
    ease            integer not null,
    ivl             integer not null,
    lastIvl         integer not null,
    factor          integer not null,
    time            integer not null,
    type            integer not null
);
CREATE TABLE graves (
    usn             integer not null,
    oid             integer not null,
    type            integer not null
);
CREATE INDEX ix_notes_usn on notes (usn);
CREATE INDEX ix_cards_usn on cards (usn);
CREATE INDEX ix_revlog_usn on revlog (usn);
CREATE INDEX ix_cards_nid on cards (nid);
CREATE INDEX ix_cards_sched on cards (did, queue, due);
CREATE INDEX ix_revlog_cid on revlog (cid);
CREATE INDEX ix_notes_csum on notes (csum);
"#;

/// Packaging collaborator producing `.apkg` files.
///
/// Every timestamp and id in the package is derived from `timestamp`, so the
/// same deck always produces the same bytes.
#[derive(Debug, Clone)]
pub struct ApkgPackager {
    timestamp: i64,
}

impl ApkgPackager {
    pub fn new(timestamp: i64) -> Self {
        Self { timestamp }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn timestamp_ms(&self) -> Result<i64> {
        self.timestamp
            .checked_mul(1000)
            .with_context(|| format!("Package timestamp {} out of range", self.timestamp))
    }

    /// Note and card id of the note at `position`
    fn row_id(&self, position: usize) -> Result<i64> {
        i64::try_from(position)
            .ok()
            .and_then(|position| self.timestamp_ms().ok()?.checked_add(position))
            .with_context(|| format!("Package timestamp {} out of range", self.timestamp))
    }

    #[instrument(level = "debug", skip(self, deck), fields(deck = deck.name()))]
    pub fn write_apkg(&self, deck: &Deck, path: &Path) -> Result<()> {
        let temp_dir = Builder::new()
            .prefix("ankipack-")
            .rand_bytes(5)
            .tempdir()
            .context("Failed to create temporary directory")?;
        let db_path = temp_dir.path().join(COLLECTION_ENTRY);

        self.write_collection(deck, &db_path)?;
        let collection = std::fs::read(&db_path)
            .with_context(|| format!("Failed to read back {}", db_path.display()))?;

        let file = File::create(path)
            .with_context(|| format!("Failed to create package file {}", path.display()))?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        zip.start_file(COLLECTION_ENTRY, options)?;
        zip.write_all(&collection)?;
        zip.start_file(MEDIA_ENTRY, options)?;
        zip.write_all(b"{}")?;
        zip.finish().context("Failed to finish package archive")?;

        debug!(path = %path.display(), bytes = collection.len(), "Wrote package");
        Ok(())
    }

    fn write_collection(&self, deck: &Deck, db_path: &Path) -> Result<()> {
        let mut conn = Connection::open(db_path).context("Failed to create package database")?;
        conn.execute_batch(SCHEMA)
            .context("Failed to create package schema")?;

        let timestamp_ms = self.timestamp_ms()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO col VALUES (1, ?1, ?2, ?3, ?4, 0, 0, 0, ?5, ?6, ?7, ?8, '{}')",
            params![
                self.timestamp,
                timestamp_ms,
                timestamp_ms,
                SCHEMA_VERSION,
                serde_json::to_string(&self.conf_json(deck))?,
                serde_json::to_string(&self.models_json(deck))?,
                serde_json::to_string(&self.decks_json(deck))?,
                serde_json::to_string(&dconf_json())?,
            ],
        )
        .context("Failed to write collection row")?;

        for (position, note) in deck.notes().iter().enumerate() {
            let id = self.row_id(position)?;
            let fields = note.content.fields();
            trace!(id, model = note.model.name, "Adding note");

            tx.execute(
                "INSERT INTO notes VALUES (?1, ?2, ?3, ?4, -1, '', ?5, ?6, ?7, 0, '')",
                params![
                    id,
                    note_guid(note),
                    note.model.id,
                    self.timestamp,
                    fields.join(FIELD_SEPARATOR),
                    strip_html(fields[0]),
                    field_checksum(fields[0]),
                ],
            )
            .context("Failed to write note row")?;

            // One template per model, so one card per note sharing its id.
            tx.execute(
                "INSERT INTO cards VALUES (?1, ?2, ?3, 0, ?4, -1, 0, 0, ?5, 0, 0, 0, 0, 0, 0, 0, 0, '')",
                params![id, id, deck.id(), self.timestamp, position as i64 + 1],
            )
            .context("Failed to write card row")?;
        }

        tx.commit().context("Failed to commit package database")?;
        conn.close()
            .map_err(|(_, e)| e)
            .context("Failed to close package database")?;
        Ok(())
    }

    fn conf_json(&self, deck: &Deck) -> Value {
        let cur_model = deck.models().first().map(|m| m.id);
        json!({
            "activeDecks": [ANKI_DEFAULT_DECK_ID],
            "addToCur": true,
            "collapseTime": 1200,
            "curDeck": ANKI_DEFAULT_DECK_ID,
            "curModel": cur_model,
            "dueCounts": true,
            "estTimes": true,
            "newBury": true,
            "newSpread": 0,
            "nextPos": deck.notes().len() + 1,
            "sortBackwards": false,
            "sortType": "noteFld",
            "timeLim": 0,
        })
    }

    fn models_json(&self, deck: &Deck) -> Value {
        let mut models = Map::new();
        for model in deck.models() {
            models.insert(model.id.to_string(), self.model_json(model, deck.id()));
        }
        Value::Object(models)
    }

    fn model_json(&self, model: &CardModel, deck_id: i64) -> Value {
        let fields: Vec<Value> = FIELD_NAMES
            .iter()
            .enumerate()
            .map(|(ord, name)| {
                json!({
                    "name": name,
                    "ord": ord,
                    "font": "Arial",
                    "size": 20,
                    "media": [],
                    "rtl": false,
                    "sticky": false,
                })
            })
            .collect();

        json!({
            "id": model.id,
            "name": model.name,
            "type": 0,
            "mod": self.timestamp,
            "usn": -1,
            "sortf": 0,
            "did": deck_id,
            "tmpls": [{
                "name": model.template.name,
                "ord": 0,
                "qfmt": model.template.qfmt,
                "afmt": model.template.afmt,
                "bqfmt": "",
                "bafmt": "",
                "did": null,
                "bfont": "",
                "bsize": 0,
            }],
            "flds": fields,
            "css": CARD_CSS,
            "latexPre": LATEX_PRE,
            "latexPost": LATEX_POST,
            "latexsvg": false,
            "req": [[0, "any", model.question_fields()]],
            "tags": [],
            "vers": [],
        })
    }

    fn decks_json(&self, deck: &Deck) -> Value {
        let mut decks = Map::new();
        decks.insert(
            ANKI_DEFAULT_DECK_ID.to_string(),
            self.deck_json(ANKI_DEFAULT_DECK_ID, "Default"),
        );
        decks.insert(deck.id().to_string(), self.deck_json(deck.id(), deck.name()));
        Value::Object(decks)
    }

    fn deck_json(&self, id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "desc": "",
            "conf": DEFAULT_DECK_CONF_ID,
            "dyn": 0,
            "collapsed": false,
            "browserCollapsed": false,
            "extendNew": 10,
            "extendRev": 50,
            "mod": self.timestamp,
            "usn": -1,
            "newToday": [0, 0],
            "revToday": [0, 0],
            "lrnToday": [0, 0],
            "timeToday": [0, 0],
        })
    }
}

impl DeckPackager for ApkgPackager {
    fn write_package(&mut self, deck: &Deck, path: &Path) -> Result<(), DomainError> {
        self.write_apkg(deck, path)
            .map_err(|e| DomainError::PackageError(format!("{}: {:#}", path.display(), e)))
    }
}

fn dconf_json() -> Value {
    json!({
        DEFAULT_DECK_CONF_ID.to_string(): {
            "id": DEFAULT_DECK_CONF_ID,
            "name": "Default",
            "autoplay": true,
            "dyn": false,
            "maxTaken": 60,
            "mod": 0,
            "usn": 0,
            "replayq": true,
            "timer": 0,
            "new": {
                "bury": true,
                "delays": [1.0, 10.0],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true,
            },
            "lapse": {
                "delays": [10.0],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0.0,
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1.0,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100,
            },
        }
    })
}

/// Stable note guid from model and field contents.
///
/// The model id takes part so the forward and reverse note of a reversible
/// pair stay distinct on import.
fn note_guid(note: &DeckNote) -> String {
    let mut hasher = Sha256::new();
    hasher.update(note.model.id.to_le_bytes());
    for field in note.content.fields() {
        hasher.update(field.as_bytes());
        hasher.update(FIELD_SEPARATOR.as_bytes());
    }
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    base91(u64::from_le_bytes(head))
}

fn base91(mut value: u64) -> String {
    let mut chars = Vec::new();
    loop {
        chars.push(BASE91_TABLE[(value % 91) as usize] as char);
        value /= 91;
        if value == 0 {
            break;
        }
    }
    chars.iter().rev().collect()
}
