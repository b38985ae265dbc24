#![allow(dead_code)]

use appeal_letter_service::{
    AgentProvider, AppealError, AppealPipeline, ChatModel, DocumentKind, DocumentSet,
    GenerationVariant, UploadedDocument,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use graph_flow::Context;
use lopdf::{Document, Object, Stream, dictionary};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn letter_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// A PDF with one page per entry; `\n` inside an entry starts a new line on
/// that page and empty entries give blank pages
pub fn make_test_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = if text.is_empty() {
            String::new()
        } else {
            let lines: Vec<String> = text
                .lines()
                .map(|line| {
                    let escaped = line
                        .replace('\\', "\\\\")
                        .replace('(', "\\(")
                        .replace(')', "\\)");
                    format!("({escaped}) Tj")
                })
                .collect();
            format!("BT /F1 12 Tf 72 720 Td {} ET", lines.join(" 0 -14 Td "))
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub fn eob_pdf() -> Vec<u8> {
    make_test_pdf(&["Claim 88213 for lumbar MRI", "Amount denied: 1450.00"])
}

pub fn medical_pdf() -> Vec<u8> {
    make_test_pdf(&[
        "Patient Name: John Smith\nAddress: 12 Elm Street, Springfield\nEmail: john.smith@example.com",
        "Assessment: L4-L5 disc herniation with radiculopathy",
    ])
}

pub fn denial_pdf() -> Vec<u8> {
    make_test_pdf(&["Denied: imaging not medically necessary"])
}

pub fn upload(kind: DocumentKind, bytes: Vec<u8>) -> UploadedDocument {
    UploadedDocument::new(kind, format!("{}.pdf", kind.field_name()), bytes)
}

pub fn full_document_set() -> DocumentSet {
    let mut set = DocumentSet::default();
    set.insert(upload(DocumentKind::Eob, eob_pdf()));
    set.insert(upload(DocumentKind::MedicalRecords, medical_pdf()));
    set.insert(upload(DocumentKind::DenialLetter, denial_pdf()));
    set
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub history_len: usize,
}

/// Answers "response #N" to the Nth call, optionally failing one of them
pub struct ScriptedModel {
    calls: Mutex<Vec<RecordedCall>>,
    fail_on_call: Option<usize>,
}

impl ScriptedModel {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, prompt: &str, context: &Context) -> anyhow::Result<String> {
        let history_len = context.chat_history_len().await;
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                history_len,
            });
            calls.len()
        };

        if self.fail_on_call == Some(call_number) {
            anyhow::bail!("upstream returned 429 Too Many Requests");
        }
        Ok(format!("response #{call_number}"))
    }
}

pub struct ScriptedProvider {
    pub model: Arc<ScriptedModel>,
    connects: AtomicUsize,
    reject_credentials: bool,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Self::build(None, false)
    }

    pub fn failing_on_call(call: usize) -> Arc<Self> {
        Self::build(Some(call), false)
    }

    pub fn rejecting() -> Arc<Self> {
        Self::build(None, true)
    }

    fn build(fail_on_call: Option<usize>, reject_credentials: bool) -> Arc<Self> {
        Arc::new(Self {
            model: Arc::new(ScriptedModel {
                calls: Mutex::new(Vec::new()),
                fail_on_call,
            }),
            connects: AtomicUsize::new(0),
            reject_credentials,
        })
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.model.calls()
    }
}

impl AgentProvider for ScriptedProvider {
    fn connect(&self, _credential: &str) -> Result<Arc<dyn ChatModel>, AppealError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.reject_credentials {
            return Err(AppealError::AgentInit("invalid API key".to_string()));
        }
        Ok(self.model.clone())
    }
}

pub fn pipeline(provider: Arc<ScriptedProvider>, variant: GenerationVariant) -> AppealPipeline {
    AppealPipeline::new(provider, variant).with_today(letter_date())
}
