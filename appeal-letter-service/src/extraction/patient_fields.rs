use regex::Regex;
use std::sync::LazyLock;

use crate::models::PatientInfo;

pub const NAME_LABEL: &str = "Patient Name";
pub const ADDRESS_LABEL: &str = "Address";
pub const PHONE_LABEL: &str = "Phone";
pub const EMAIL_LABEL: &str = "Email";

pub const NAME_PLACEHOLDER: &str = "[Patient Name]";
pub const ADDRESS_PLACEHOLDER: &str = "[Patient Address]";
pub const PHONE_PLACEHOLDER: &str = "[Patient Phone]";
pub const EMAIL_PLACEHOLDER: &str = "[Patient Email]";

fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"{}:\s*(.*)", regex::escape(label))).expect("Invalid regex")
}

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| label_pattern(NAME_LABEL));
static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| label_pattern(ADDRESS_LABEL));
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| label_pattern(PHONE_LABEL));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| label_pattern(EMAIL_LABEL));

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First `<label>: value` in `text`. The label is matched literally and is
/// case sensitive; the value runs to the end of its line.
pub fn match_field(text: &str, label: &str) -> Option<String> {
    first_capture(&label_pattern(label), text)
}

/// Raw matches before any placeholder is applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl PatientFields {
    pub fn scan(medical_text: &str) -> Self {
        Self {
            name: first_capture(&NAME_RE, medical_text),
            address: first_capture(&ADDRESS_RE, medical_text),
            phone: first_capture(&PHONE_RE, medical_text),
            email: first_capture(&EMAIL_RE, medical_text),
        }
    }

    /// Fill every missing field with its placeholder
    pub fn or_placeholders(self) -> PatientInfo {
        PatientInfo {
            name: self.name.unwrap_or_else(|| NAME_PLACEHOLDER.to_string()),
            address: self.address.unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_string()),
            phone: self.phone.unwrap_or_else(|| PHONE_PLACEHOLDER.to_string()),
            email: self.email.unwrap_or_else(|| EMAIL_PLACEHOLDER.to_string()),
        }
    }
}

impl PatientInfo {
    pub fn from_medical_text(medical_text: &str) -> Self {
        PatientFields::scan(medical_text).or_placeholders()
    }
}
