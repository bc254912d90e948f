use super::*;
use crate::services::catalog::SeriesCatalog;
use crate::types::models::{BookCategory, SeriesEntity};

fn series(name: &str) -> SeriesEntity {
    SeriesEntity {
        name: name.to_string(),
        authors: vec![],
        category: BookCategory::Novel,
        canonical_volumes: None,
        keywords: vec![],
        variations: vec![],
        status: Default::default(),
        first_published: None,
        languages: vec![],
        translations: Default::default(),
        source: Default::default(),
    }
}

fn fixture_catalog() -> SeriesCatalog {
    let mut harry = series("Harry Potter");
    harry.canonical_volumes = Some(7);
    harry.keywords = vec![
        "hogwarts".to_string(),
        "wizard".to_string(),
        "potter".to_string(),
    ];

    let mut asterix = series("Astérix");
    asterix.category = BookCategory::Comic;
    asterix.variations = vec!["Asterix le Gaulois".to_string()];

    let mut lotr = series("The Lord of the Rings");
    lotr.keywords = vec![
        "ring".to_string(),
        "hobbit".to_string(),
        "mordor".to_string(),
    ];

    let mut malaussene = series("Malaussène");
    malaussene.canonical_volumes = Some(7);

    SeriesCatalog::new(vec![harry, asterix, lotr, malaussene]).unwrap()
}

fn book(title: &str) -> crate::types::models::BookRecord {
    crate::types::models::BookRecord::new(title, "Author", BookCategory::Novel)
}

// ─── ExplicitFieldStrategy ────────────────────────────────────────

#[test]
fn test_explicit_field_fires_with_full_confidence() {
    let catalog = fixture_catalog();
    let mut b = book("Some random title");
    b.explicit_series = Some("  Harry Potter  ".to_string());

    let candidate = ExplicitFieldStrategy.evaluate(&b, &catalog).unwrap();
    assert_eq!(candidate.confidence, 100);
    assert_eq!(candidate.method, DetectionMethod::ExplicitField);
    assert_eq!(candidate.series_name, "Harry Potter");
}

#[test]
fn test_explicit_field_ignores_blank_value() {
    let catalog = fixture_catalog();
    let mut b = book("Some random title");
    b.explicit_series = Some("   ".to_string());

    assert!(ExplicitFieldStrategy.evaluate(&b, &catalog).is_none());
    b.explicit_series = None;
    assert!(ExplicitFieldStrategy.evaluate(&b, &catalog).is_none());
}

// ─── VariationMatchStrategy ───────────────────────────────────────

#[test]
fn test_variation_match_partial_title_coverage() {
    let catalog = fixture_catalog();
    let b = book("Harry Potter à l'école des sorciers");

    let candidate = VariationMatchStrategy.evaluate(&b, &catalog).unwrap();
    assert_eq!(candidate.series_name, "Harry Potter");
    // "harry potter" covers 12 of 35 normalized chars: 80 + round(15 * 12/35).
    assert_eq!(candidate.confidence, 85);
    assert!(candidate.reasons[0].contains("harry potter"));
}

#[test]
fn test_variation_match_full_coverage_caps_at_95() {
    let catalog = fixture_catalog();
    let b = book("Astérix le Gaulois");

    let candidate = VariationMatchStrategy.evaluate(&b, &catalog).unwrap();
    assert_eq!(candidate.series_name, "Astérix");
    assert_eq!(candidate.confidence, 95);
}

#[test]
fn test_variation_match_unknown_title() {
    let catalog = fixture_catalog();
    assert!(VariationMatchStrategy
        .evaluate(&book("Cooking for Beginners"), &catalog)
        .is_none());
}

// ─── KeywordMatchStrategy ─────────────────────────────────────────

#[test]
fn test_keyword_match_requires_two_keywords() {
    let catalog = fixture_catalog();
    // Only "wizard" matches.
    assert!(KeywordMatchStrategy
        .evaluate(&book("A wizard's cookbook"), &catalog)
        .is_none());
}

#[test]
fn test_keyword_match_scales_with_proportion() {
    let catalog = fixture_catalog();

    // 2 of 3: 60 + round(15 * 2/3) = 70.
    let two = KeywordMatchStrategy
        .evaluate(&book("The wizard of hogwarts"), &catalog)
        .unwrap();
    assert_eq!(two.confidence, 70);
    assert_eq!(two.series_name, "Harry Potter");
    assert!(two.reasons[0].contains("hogwarts"));
    assert!(two.reasons[0].contains("wizard"));

    // 3 of 3: 60 + 15 = 75.
    let three = KeywordMatchStrategy
        .evaluate(&book("Potter the wizard of hogwarts"), &catalog)
        .unwrap();
    assert_eq!(three.confidence, 75);
}

#[test]
fn test_keyword_match_picks_best_overlap() {
    let catalog = fixture_catalog();
    // ring + hobbit (LOTR) beats wizard alone (Harry Potter).
    let candidate = KeywordMatchStrategy
        .evaluate(&book("The wizard, the hobbit and the ring"), &catalog)
        .unwrap();
    assert_eq!(candidate.series_name, "The Lord of the Rings");
}

// ─── NumberingPatternStrategy ─────────────────────────────────────

#[test]
fn test_numbering_known_prefix_with_admitted_volume() {
    let catalog = fixture_catalog();
    let candidate = NumberingPatternStrategy
        .evaluate(&book("Malaussène Tome 3"), &catalog)
        .unwrap();

    assert_eq!(candidate.series_name, "Malaussène");
    assert_eq!(candidate.confidence, 85);
    assert!(candidate.reasons.iter().any(|r| r.contains("canonical count")));
}

#[test]
fn test_numbering_known_prefix_with_volume_out_of_range() {
    let catalog = fixture_catalog();
    let candidate = NumberingPatternStrategy
        .evaluate(&book("Malaussène Tome 9"), &catalog)
        .unwrap();

    // Known prefix, but volume 9 exceeds the canonical count of 7.
    assert_eq!(candidate.confidence, 80);
}

#[test]
fn test_numbering_unknown_prefix_reduced() {
    let catalog = fixture_catalog();
    let candidate = NumberingPatternStrategy
        .evaluate(&book("Zorglub Saga Tome 2"), &catalog)
        .unwrap();

    assert_eq!(candidate.series_name, "Zorglub Saga");
    assert_eq!(candidate.confidence, 70);
    assert!(candidate
        .reasons
        .iter()
        .any(|r| r.contains("not present in catalog")));
}

#[test]
fn test_numbering_hash_marker() {
    let catalog = fixture_catalog();
    let candidate = NumberingPatternStrategy
        .evaluate(&book("Saga of the Swamp Thing #21"), &catalog)
        .unwrap();

    assert_eq!(candidate.series_name, "Saga of the Swamp Thing");
    assert_eq!(candidate.confidence, 70);
}

#[test]
fn test_numbering_separator_trimmed_from_prefix() {
    let catalog = fixture_catalog();
    let candidate = NumberingPatternStrategy
        .evaluate(&book("Malaussène - Tome 3"), &catalog)
        .unwrap();
    assert_eq!(candidate.series_name, "Malaussène");
}

#[test]
fn test_numbering_empty_prefix_does_not_fire() {
    let catalog = fixture_catalog();
    // The marker opens the title, so there is no prefix to name a series.
    assert!(NumberingPatternStrategy
        .evaluate(&book("Tome 3: The Return"), &catalog)
        .is_none());
}

#[test]
fn test_numbering_short_prefix_does_not_fire() {
    let catalog = fixture_catalog();
    assert!(NumberingPatternStrategy
        .evaluate(&book("Ys - Tome 1"), &catalog)
        .is_none());
}

#[test]
fn test_numbering_volume_corroborated_by_record() {
    let catalog = fixture_catalog();
    let mut b = book("Malaussène Tome 3");
    b.explicit_volume_number = Some(3);

    let candidate = NumberingPatternStrategy.evaluate(&b, &catalog).unwrap();
    assert!(candidate.reasons.iter().any(|r| r.contains("corroborated")));
}

#[test]
fn test_numbering_no_marker() {
    let catalog = fixture_catalog();
    assert!(NumberingPatternStrategy
        .evaluate(&book("Malaussène au théâtre"), &catalog)
        .is_none());
}
