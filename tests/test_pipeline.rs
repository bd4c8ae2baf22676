mod helpers;

use ankipack::application::{build, collect_decks, BuildSettings, DeckWriter};
use ankipack::domain::{Deck, DeckIdPolicy, NoteContent, FORWARD_MODEL, REVERSE_MODEL};
use ankipack::infrastructure::ApkgPackager;
use ankipack::util::testing::MockPackager;
use anyhow::Result;
use helpers::{packaged_deck_names, packaged_notes, DeckTree, PackagedNote};
use std::fs;

const TIMESTAMP: i64 = 1_600_000_000;

fn settings(tree: &DeckTree) -> BuildSettings {
    BuildSettings {
        decks_dir: tree.decks_dir.clone(),
        output_dir: tree.output_dir.clone(),
        deck_ids: DeckIdPolicy::default(),
    }
}

#[test]
fn given_paired_note_when_building_then_package_holds_forward_card() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;
    tree.note("D", "P", "A", "B")?;

    // Act
    let report = build(&settings(&tree), ApkgPackager::new(TIMESTAMP))?;

    // Assert
    assert_eq!(report.packages, vec![tree.package("D")]);
    let notes = packaged_notes(&tree.package("D"), tree.root())?;
    assert_eq!(
        notes,
        vec![PackagedNote {
            model_id: FORWARD_MODEL.id,
            fields: vec!["A".to_string(), "B".to_string()],
        }]
    );
    assert_eq!(packaged_deck_names(&tree.package("D"), tree.root())?, vec!["D"]);

    Ok(())
}

#[test]
fn given_reversible_note_when_building_then_package_holds_two_cards() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;
    tree.note("German", "hund.reversible", "der Hund", "the dog")?;
    tree.note("German", "katze", "die Katze", "the cat")?;

    // Act
    let report = build(&settings(&tree), ApkgPackager::new(TIMESTAMP))?;

    // Assert
    assert_eq!(report.notes, 2);
    assert_eq!(report.cards, 3);
    let notes = packaged_notes(&tree.package("German"), tree.root())?;
    let models: Vec<i64> = notes.iter().map(|n| n.model_id).collect();
    assert_eq!(models, vec![FORWARD_MODEL.id, REVERSE_MODEL.id, FORWARD_MODEL.id]);
    assert_eq!(notes[0].fields, notes[1].fields);
    assert_eq!(notes[2].fields, vec!["die Katze", "the cat"]);

    Ok(())
}

#[test]
fn given_half_note_when_building_then_skips_it_and_keeps_going() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;
    tree.note("Geo", "france", "France", "Paris")?;
    tree.file("Geo", "spain.front.html", "Spain")?;
    tree.file("Geo", "italy.back.html", "Rome")?;

    // Act
    let report = build(&settings(&tree), ApkgPackager::new(TIMESTAMP))?;

    // Assert
    let skipped: Vec<&str> = report.skipped.iter().map(|n| n.prefix.as_str()).collect();
    assert_eq!(skipped, vec!["italy", "spain"]);
    assert_eq!(packaged_notes(&tree.package("Geo"), tree.root())?.len(), 1);

    Ok(())
}

#[test]
fn given_empty_decks_root_when_building_then_writes_no_packages() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;

    // Act
    let report = build(&settings(&tree), ApkgPackager::new(TIMESTAMP))?;

    // Assert
    assert!(report.packages.is_empty());
    assert!(report.skipped.is_empty());
    assert_eq!(fs::read_dir(&tree.output_dir)?.count(), 0);

    Ok(())
}

#[test]
fn given_empty_deck_folder_when_building_then_writes_empty_package() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;
    tree.deck("Nothing")?;

    // Act
    build(&settings(&tree), ApkgPackager::new(TIMESTAMP))?;

    // Assert
    assert!(packaged_notes(&tree.package("Nothing"), tree.root())?.is_empty());

    Ok(())
}

#[test]
fn given_unchanged_input_when_building_twice_then_output_is_byte_identical() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;
    tree.note("Geo", "france", "<p>France</p>", "<p>Paris</p>")?;
    tree.note("Geo", "capital.reversible", "Spain", "Madrid")?;
    tree.note("Math", "pi", "π", "3.14159")?;

    // Act
    build(&settings(&tree), ApkgPackager::new(TIMESTAMP))?;
    let first_geo = fs::read(tree.package("Geo"))?;
    let first_math = fs::read(tree.package("Math"))?;
    build(&settings(&tree), ApkgPackager::new(TIMESTAMP))?;

    // Assert
    assert_eq!(fs::read(tree.package("Geo"))?, first_geo);
    assert_eq!(fs::read(tree.package("Math"))?, first_math);
    assert_eq!(fs::read_dir(&tree.output_dir)?.count(), 2);

    Ok(())
}

#[test]
fn given_stale_package_when_building_then_overwrites_it() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;
    tree.note("Geo", "france", "France", "Paris")?;
    fs::create_dir_all(&tree.output_dir)?;
    fs::write(tree.package("Geo"), "stale bytes that are not a zip")?;

    // Act
    build(&settings(&tree), ApkgPackager::new(TIMESTAMP))?;

    // Assert
    assert_eq!(packaged_notes(&tree.package("Geo"), tree.root())?.len(), 1);

    Ok(())
}

#[test]
fn given_colliding_deck_names_when_writing_then_last_deck_wins() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;
    let mut first = Deck::new(1, "Same");
    first.add_note(&FORWARD_MODEL, NoteContent::new("first", "1"));
    let mut second = Deck::new(1, "Same");
    second.add_note(&FORWARD_MODEL, NoteContent::new("second", "2"));
    let mut writer = DeckWriter::new(ApkgPackager::new(TIMESTAMP), &tree.output_dir);

    // Act
    writer.write_all(&[first, second])?;

    // Assert
    let notes = packaged_notes(&tree.package("Same"), tree.root())?;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].fields, vec!["second", "2"]);

    Ok(())
}

#[test]
fn given_name_policy_when_building_then_decks_get_distinct_ids() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;
    tree.note("A", "x", "1", "2")?;
    tree.note("B", "y", "3", "4")?;
    let settings = BuildSettings {
        deck_ids: DeckIdPolicy::FromName { seed: 99 },
        ..settings(&tree)
    };
    let mut packager = MockPackager::builder().without_files().build();

    // Act
    build(&settings, &mut packager)?;

    // Assert
    let packaged = packager.packaged();
    assert_eq!(packaged.len(), 2);
    assert_ne!(packaged[0].id, packaged[1].id);

    Ok(())
}

#[test]
fn given_collected_decks_when_inspecting_then_front_and_back_match_files() -> Result<()> {
    // Arrange
    let tree = DeckTree::new()?;
    tree.note("Geo", "france", "France?", "Paris!")?;
    tree.file("Geo", "notes.txt", "not a note")?;
    fs::write(tree.decks_dir.join("stray.front.html"), "outside any deck")?;

    // Act
    let collected = collect_decks(&tree.decks_dir)?;

    // Assert
    assert_eq!(collected.decks.len(), 1);
    assert_eq!(
        collected.decks["Geo"]["france"],
        NoteContent::new("France?", "Paris!")
    );

    Ok(())
}
