mod common;

use image_compare_forensics::{
    ComparisonConfig, ForensicsComparator, ImageInput, MetadataRecord,
    analysis::HashOutcome,
    assemble_report, classify, compare_ela, compare_hash, extract_metadata, generate_ela,
    metadata::TagMap,
};

use common::*;

#[test]
fn hash_of_image_against_itself_is_zero() {
    let bytes = jpeg_bytes(&textured(80, 60), 85);
    let input = ImageInput::new(&bytes);

    let outcome = compare_hash(&input, &input);
    assert_eq!(outcome.distance(), Some(0));

    let HashOutcome::Compared { hash_a, hash_b, .. } = outcome else {
        panic!("expected a comparison");
    };
    assert_eq!(hash_a, hash_b);
    assert_eq!(hash_a.len(), 16);
}

#[test]
fn hash_distance_is_symmetric() {
    let a = jpeg_bytes(&textured(80, 60), 85);
    let b = png_bytes(&inverted(&textured(80, 60)));

    let ab = compare_hash(&ImageInput::new(&a), &ImageInput::new(&b));
    let ba = compare_hash(&ImageInput::new(&b), &ImageInput::new(&a));

    assert!(ab.distance().is_some());
    assert_eq!(ab.distance(), ba.distance());
}

#[test]
fn ela_generation_is_deterministic() {
    let bytes = jpeg_bytes(&textured(50, 40), 75);
    let input = ImageInput::new(&bytes);

    let first = generate_ela(&input).unwrap();
    let second = generate_ela(&input).unwrap();

    assert_eq!(first.dimensions(), (50, 40));
    assert_eq!(first, second);
    assert_eq!(compare_ela(&first, &second), Some(0.0));
}

#[test]
fn ela_map_can_be_saved_and_reloaded() {
    let bytes = png_bytes(&textured(30, 20));
    let ela = generate_ela(&ImageInput::new(&bytes)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ela.png");
    ela.save(&path).unwrap();

    let reloaded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(&reloaded, ela.image());

    let png = ela.to_png().unwrap();
    assert_eq!(image::load_from_memory(&png).unwrap().to_rgb8(), reloaded);
}

#[test]
fn identical_jpegs_are_not_flagged() {
    let bytes = camera_jpeg();
    let original = ImageInput::new(&bytes);
    let suspect = ImageInput::new(&bytes);

    let result = ForensicsComparator::new().compare(&original, &suspect);

    assert_eq!(result.hash.distance(), Some(0));
    assert_eq!(result.ela_diff_percent, Some(0.0));
    assert!(!result.is_manipulated());
    assert!(result.verdict.evidence.is_empty());
    assert_eq!(result.metadata_a.camera_model, "PowerShot G7 X");

    let report = result.report("original.jpg", "copy.jpg");
    assert!(report.contains("no indication of editing"));
    assert!(report.contains("Case 1: Original image 'original.jpg'"));
    assert!(report.contains("  - Camera model: PowerShot G7 X"));
    assert!(report.contains("  - ELA comparison: 0.00% differing pixels"));
}

#[test]
fn different_content_is_flagged() {
    let original = jpeg_bytes(&textured(96, 64), 90);
    let suspect = jpeg_bytes(&inverted(&textured(96, 64)), 90);

    let result = ForensicsComparator::new()
        .compare(&ImageInput::new(&original), &ImageInput::new(&suspect));

    assert!(result.is_manipulated());
    assert!(!result.verdict.evidence.is_empty());
    assert!(result.report("a.jpg", "b.jpg").contains("possible manipulation"));
}

#[test]
fn corrupted_input_degrades_gracefully() {
    let good = jpeg_bytes(&textured(40, 40), 90);
    let bad = b"this is not an image at all".to_vec();

    let bad_input = ImageInput::new(&bad);
    assert!(extract_metadata(&bad_input).all_metadata.is_empty());
    assert!(generate_ela(&bad_input).is_none());

    let outcome = compare_hash(&ImageInput::new(&good), &bad_input);
    assert!(matches!(outcome, HashOutcome::Failed { .. }));
    assert!(outcome.to_string().starts_with("Error: "));

    let result = ForensicsComparator::new().compare(&ImageInput::new(&good), &bad_input);
    assert!(result.ela_a.is_some());
    assert!(result.ela_b.is_none());
    assert!(result.ela_diff_percent.is_none());
    assert!(result.hash.distance().is_none());
    assert!(!result.is_manipulated());

    let report = result.report("good.jpg", "bad.jpg");
    assert!(report.contains("difference = Error: "));
    assert!(!report.contains("ELA comparison"));
    assert!(report.contains("No software detected"));
}

#[test]
fn classifier_boundaries() {
    assert!(classify(Some(11), None));
    assert!(!classify(Some(10), None));
    assert!(classify(None, Some(2.01)));
    assert!(!classify(None, Some(2.0)));
    assert!(!classify(None, None));
}

#[test]
fn report_phrases_follow_verdict() {
    let meta = MetadataRecord::from_tags(TagMap::new(), None);
    let hash = |distance| HashOutcome::Compared {
        hash_a: "a".repeat(16),
        hash_b: "b".repeat(16),
        distance,
    };

    let edited = assemble_report("a", "b", &meta, &meta, &hash(15), None, classify(Some(15), None));
    assert!(edited.contains("possible manipulation"));
    assert!(!edited.contains("no indication of editing"));

    let clean = assemble_report("a", "b", &meta, &meta, &hash(0), Some(0.0), classify(Some(0), Some(0.0)));
    assert!(clean.contains("no indication of editing"));
}

#[test]
fn lenient_config_suppresses_verdict() {
    let original = jpeg_bytes(&textured(64, 64), 95);
    let suspect = jpeg_bytes(&textured(64, 64), 40);

    let config = ComparisonConfig::default()
        .with_hash_distance_threshold(64)
        .with_ela_diff_threshold(100.0);
    let result = ForensicsComparator::new()
        .with_config(config)
        .unwrap()
        .compare(&ImageInput::new(&original), &ImageInput::new(&suspect));

    assert!(!result.is_manipulated());
    assert!(result.hash.distance().is_some());
    assert!(result.ela_diff_percent.is_some());
}

#[test]
fn json_report_carries_all_sections() {
    let bytes = camera_jpeg();
    let input = ImageInput::new(&bytes);
    let result = ForensicsComparator::new().compare(&input, &input);

    let json = result.json_report("a.jpg", "b.jpg").to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["original"]["filename"], "a.jpg");
    assert_eq!(value["original"]["metadata"]["cameraModel"], "PowerShot G7 X");
    assert_eq!(value["perceptual_hash"]["status"], "compared");
    assert_eq!(value["perceptual_hash"]["distance"], 0);
    assert_eq!(value["ela_difference_percent"], 0.0);
    assert_eq!(value["verdict"]["manipulated"], false);
    assert_eq!(value["suspect"]["ela"]["width"], 64);
}

#[test]
fn comparisons_run_concurrently() {
    let a = jpeg_bytes(&textured(48, 48), 90);
    let b = png_bytes(&textured(48, 48));
    let comparator = ForensicsComparator::new();

    let expected = comparator
        .compare(&ImageInput::new(&a), &ImageInput::new(&b))
        .hash
        .distance();

    std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    comparator
                        .compare(&ImageInput::new(&a), &ImageInput::new(&b))
                        .hash
                        .distance()
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
