//! Integration tests for PDF normalize library

use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use pdf_normalize::pdf::{read_page_sizes, NormalizeOptions, PageSizeNormalizer};
use pdf_normalize::{Error, PageSize, PageStatus, ReportEntry, ScaleMode};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a PDF with one page per `(width, height)`, each showing a line of text
fn write_fixture(path: &Path, sizes: &[(f64, f64)]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for (i, &(width, height)) in sizes.iter().enumerate() {
        let text = format!("BT /F1 12 Tf 10 10 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), text.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(pages_id, Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
    }));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.compress();
    doc.save(path).expect("Failed to write fixture PDF");
}

/// Options writing everything into `dir`
fn options_in(dir: &TempDir, input: &str, output: &str) -> NormalizeOptions {
    NormalizeOptions {
        input_path: dir.path().join(input),
        output_path: dir.path().join(output),
        report_txt: dir.path().join(format!("{}.txt", output)),
        report_json: dir.path().join(format!("{}.json", output)),
        ..Default::default()
    }
}

fn read_json_report(path: &Path) -> Vec<ReportEntry> {
    let json = fs::read_to_string(path).expect("Failed to read JSON report");
    serde_json::from_str(&json).expect("JSON report should parse")
}

fn assert_all_pages_sized(path: &Path, target: PageSize) {
    for size in read_page_sizes(path).expect("Failed to read output PDF") {
        assert_eq!(size, target);
    }
}

#[test]
fn test_uniform_document_unchanged() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("in.pdf"), &[(595.28, 841.89); 4]);

    let summary = PageSizeNormalizer::new(options_in(&dir, "in.pdf", "out.pdf"))
        .normalize()
        .expect("Failed to normalize");

    assert_eq!(summary.target, PageSize::new(595.28, 841.89));
    assert_eq!(summary.output_page_count(), 4);
    assert!(summary.entries.iter().all(|e| e.status == PageStatus::Unchanged));
    // Fractional sizes are stored as PDF reals, which have single precision
    for size in read_page_sizes(&summary.output_path).expect("Failed to read output PDF") {
        assert_eq!(size.rounded(2), summary.target);
    }
}

#[test]
fn test_outlier_resized_to_dominant_size() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(
        &dir.path().join("in.pdf"),
        &[(100.0, 100.0), (100.0, 100.0), (100.0, 50.0), (100.0, 100.0), (100.0, 100.0)],
    );

    let summary = PageSizeNormalizer::new(options_in(&dir, "in.pdf", "out.pdf"))
        .normalize()
        .expect("Failed to normalize");

    assert_eq!(summary.target, PageSize::new(100.0, 100.0));
    let statuses: Vec<PageStatus> = summary.entries.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![
            PageStatus::Unchanged,
            PageStatus::Unchanged,
            PageStatus::Resized,
            PageStatus::Unchanged,
            PageStatus::Unchanged,
        ]
    );
    assert_eq!(summary.entries[2].original_height, 50.0);
    assert_all_pages_sized(&summary.output_path, summary.target);
}

#[test]
fn test_insert_blank_page() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("in.pdf"), &[(612.0, 792.0); 3]);

    let options = NormalizeOptions {
        insert_blank_at: Some(2),
        ..options_in(&dir, "in.pdf", "out.pdf")
    };
    let summary = PageSizeNormalizer::new(options).normalize().expect("Failed to normalize");

    let pages = read_page_sizes(&summary.output_path).expect("Failed to read output");
    assert_eq!(pages.len(), 4);

    let report = read_json_report(&summary.report_json);
    let listed: Vec<(usize, PageStatus)> = report.iter().map(|e| (e.page, e.status)).collect();
    assert_eq!(
        listed,
        vec![
            (1, PageStatus::Unchanged),
            (2, PageStatus::Unchanged),
            (3, PageStatus::BlankInserted),
            (4, PageStatus::Unchanged),
        ]
    );
}

#[test]
fn test_report_ordinals_contiguous() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(
        &dir.path().join("in.pdf"),
        &[(612.0, 792.0), (612.0, 792.0), (595.0, 842.0), (612.0, 792.0), (612.0, 792.0)],
    );

    let options = NormalizeOptions {
        insert_blank_at: Some(1),
        ..options_in(&dir, "in.pdf", "out.pdf")
    };
    let summary = PageSizeNormalizer::new(options).normalize().expect("Failed to normalize");

    let ordinals: Vec<usize> = read_json_report(&summary.report_json).iter().map(|e| e.page).collect();
    assert_eq!(ordinals, (1..=6).collect::<Vec<_>>());
    assert_eq!(read_page_sizes(&summary.output_path).unwrap().len(), 6);
}

#[test]
fn test_text_report_contents() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("in.pdf"), &[(100.0, 100.0), (100.0, 100.0), (100.0, 50.0)]);

    let summary = PageSizeNormalizer::new(options_in(&dir, "in.pdf", "out.pdf"))
        .normalize()
        .expect("Failed to normalize");

    let text = fs::read_to_string(&summary.report_txt).expect("Failed to read text report");
    assert_eq!(
        text,
        "Report of changes:\n\n\
         Page   1: 100.0 x 100.0 → unchanged\n\
         Page   2: 100.0 x 100.0 → unchanged\n\
         Page   3: 100.0 x 50.0 → resized\n"
    );
}

#[test]
fn test_normalizing_output_again_is_stable() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(
        &dir.path().join("in.pdf"),
        &[(612.0, 792.0), (612.1, 792.1), (300.0, 400.0), (612.0, 792.0)],
    );

    let first = PageSizeNormalizer::new(options_in(&dir, "in.pdf", "once.pdf"))
        .normalize()
        .expect("First run failed");
    let second = PageSizeNormalizer::new(options_in(&dir, "once.pdf", "twice.pdf"))
        .normalize()
        .expect("Second run failed");

    assert_eq!(second.target, first.target);
    assert!(second.entries.iter().all(|e| e.status == PageStatus::Unchanged));
}

#[test]
fn test_keep_proportion_still_uses_target_canvas() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("in.pdf"), &[(200.0, 200.0), (200.0, 200.0), (100.0, 300.0)]);

    let options = NormalizeOptions {
        scale_mode: ScaleMode::Fit,
        ..options_in(&dir, "in.pdf", "out.pdf")
    };
    let summary = PageSizeNormalizer::new(options).normalize().expect("Failed to normalize");

    assert_eq!(summary.entries[2].status, PageStatus::Resized);
    assert_all_pages_sized(&summary.output_path, PageSize::new(200.0, 200.0));
}

#[test]
fn test_analyze_writes_nothing() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("in.pdf"), &[(612.0, 792.0); 2]);

    let options = options_in(&dir, "in.pdf", "out.pdf");
    let plan = PageSizeNormalizer::new(options.clone()).analyze().expect("Failed to analyze");

    assert_eq!(plan.target, PageSize::new(612.0, 792.0));
    assert_eq!(plan.page_count(), 2);
    assert!(!options.output_path.exists());
    assert!(!options.report_txt.exists());
    assert!(!options.report_json.exists());
}

#[test]
fn test_empty_document() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("empty.pdf"), &[]);

    let result = PageSizeNormalizer::new(options_in(&dir, "empty.pdf", "out.pdf")).normalize();
    assert!(matches!(result, Err(Error::EmptyDocument(_))), "got {:?}", result);
}

#[test]
fn test_insert_position_past_end_is_ignored() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("in.pdf"), &[(612.0, 792.0); 2]);

    let options = NormalizeOptions {
        insert_blank_at: Some(9),
        ..options_in(&dir, "in.pdf", "out.pdf")
    };
    let summary = PageSizeNormalizer::new(options).normalize().expect("Failed to normalize");

    assert_eq!(summary.output_page_count(), 2);
    assert!(summary.entries.iter().all(|e| e.status == PageStatus::Unchanged));
    assert_eq!(read_page_sizes(&summary.output_path).unwrap().len(), 2);
}

#[test]
fn test_insert_blank_after_last_page() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("in.pdf"), &[(612.0, 792.0); 2]);

    let options = NormalizeOptions {
        insert_blank_at: Some(2),
        ..options_in(&dir, "in.pdf", "out.pdf")
    };
    let summary = PageSizeNormalizer::new(options).normalize().expect("Failed to normalize");

    assert_eq!(summary.output_page_count(), 3);
    assert_eq!(summary.entries[2].status, PageStatus::BlankInserted);
    assert_all_pages_sized(&summary.output_path, PageSize::letter());
}

#[test]
fn test_nonexistent_input() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let result = PageSizeNormalizer::new(options_in(&dir, "missing.pdf", "out.pdf")).normalize();

    if let Err(e) = result {
        assert!(
            e.to_string().contains("not found"),
            "Error should mention file not found: {}",
            e
        );
    } else {
        panic!("Should fail with nonexistent file");
    }
}

#[test]
fn test_unwritable_output() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("in.pdf"), &[(612.0, 792.0)]);

    let options = NormalizeOptions {
        output_path: dir.path().join("no-such-dir").join("out.pdf"),
        ..options_in(&dir, "in.pdf", "out.pdf")
    };
    let result = PageSizeNormalizer::new(options).normalize();
    assert!(matches!(result, Err(Error::Write { .. })), "got {:?}", result);
}

#[test]
fn test_unwritable_report_is_partial_output() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(&dir.path().join("in.pdf"), &[(612.0, 792.0)]);

    let options = NormalizeOptions {
        report_json: dir.path().join("no-such-dir").join("report.json"),
        ..options_in(&dir, "in.pdf", "out.pdf")
    };
    let output_path: PathBuf = options.output_path.clone();
    let result = PageSizeNormalizer::new(options).normalize();

    assert!(matches!(result, Err(Error::PartialOutput { .. })), "got {:?}", result);
    assert!(output_path.exists(), "PDF is saved before the reports");
}
