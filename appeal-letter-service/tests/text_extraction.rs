mod common;

use appeal_letter_service::PatientInfo;
use appeal_letter_service::extraction::{extract_pages, extract_text};
use common::make_test_pdf;

#[test]
fn extracts_text_from_a_single_page() {
    let pdf = make_test_pdf(&["Patient Name: Jane Doe"]);
    let text = extract_text(&pdf).unwrap();
    assert!(text.contains("Patient Name: Jane Doe"), "got: {text:?}");
}

#[test]
fn pages_are_concatenated_in_order() {
    let pdf = make_test_pdf(&["first page", "", "second page", ""]);

    let pages = extract_pages(&pdf).unwrap();
    assert_eq!(pages.len(), 4);

    let text = extract_text(&pdf).unwrap();
    assert_eq!(text, pages.concat());

    let first = text.find("first page").unwrap();
    let second = text.find("second page").unwrap();
    assert!(first < second);
}

#[test]
fn lines_on_one_page_stay_separate() {
    let pdf = make_test_pdf(&["Patient Name: Jane Doe\nAddress: 1 Main"]);
    let text = extract_text(&pdf).unwrap();

    let info = PatientInfo::from_medical_text(&text);
    assert_eq!(info.name.trim(), "Jane Doe", "got: {text:?}");
    assert_eq!(info.address.trim(), "1 Main");
    assert_eq!(info.phone, "[Patient Phone]");
}

#[test]
fn parentheses_survive_extraction() {
    let pdf = make_test_pdf(&["Denied (code CO-50) per plan \\ policy"]);
    let text = extract_text(&pdf).unwrap();
    assert!(text.contains("(code CO-50)"), "got: {text:?}");
}
