use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use serde::Serialize;

use crate::domains::configuration::FieldRequirements;
use crate::domains::inputs::{CheckInputs, InputField};

static PORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,5}$").unwrap());
static PUBLIC_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0x)?[0-9a-fA-F]{64}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Url,
    Port { required: bool },
    PublicKey { required: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidation {
    pub normalized: String,
    pub is_valid: bool,
}

/// Validity is judged on `raw` itself, so surrounding whitespace makes a field invalid;
/// `normalized` is only the trimmed text the presentation layer may offer back.
pub fn validate(kind: FieldKind, raw: &str) -> FieldValidation {
    let normalized = raw.trim().to_string();
    let is_valid = match kind {
        FieldKind::Url => normalized == raw && is_valid_url(raw),
        FieldKind::Port { required } => {
            (raw.is_empty() && !required) || parse_port(raw).is_some()
        }
        FieldKind::PublicKey { required } => {
            (raw.is_empty() && !required) || PUBLIC_KEY_RE.is_match(raw)
        }
    };
    FieldValidation {
        normalized,
        is_valid,
    }
}

fn is_valid_url(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Parses a port string of bare digits; `None` for anything else or outside `0..=65535`.
pub fn parse_port(value: &str) -> Option<u16> {
    if !PORT_RE.is_match(value) {
        return None;
    }
    value.parse::<u16>().ok()
}

pub fn field_kind(field: InputField, requirements: FieldRequirements) -> FieldKind {
    match field {
        InputField::Url => FieldKind::Url,
        InputField::ApiPort | InputField::NoisePort => FieldKind::Port { required: false },
        InputField::MetricsPort => FieldKind::Port {
            required: requirements.metrics_port,
        },
        InputField::PublicKey => FieldKind::PublicKey {
            required: requirements.public_key,
        },
    }
}

/// Per-field validity of a full set of inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputValidation {
    pub url: FieldValidation,
    pub api_port: FieldValidation,
    pub noise_port: FieldValidation,
    pub metrics_port: FieldValidation,
    pub public_key: FieldValidation,
}

impl InputValidation {
    pub fn all_valid(&self) -> bool {
        self.fields().iter().all(|(_, result)| result.is_valid)
    }

    pub fn fields(&self) -> [(InputField, &FieldValidation); 5] {
        [
            (InputField::Url, &self.url),
            (InputField::ApiPort, &self.api_port),
            (InputField::NoisePort, &self.noise_port),
            (InputField::MetricsPort, &self.metrics_port),
            (InputField::PublicKey, &self.public_key),
        ]
    }

    pub fn invalid_fields(&self) -> Vec<InputField> {
        self.fields()
            .into_iter()
            .filter(|(_, result)| !result.is_valid)
            .map(|(field, _)| field)
            .collect()
    }
}

pub fn validate_inputs(inputs: &CheckInputs, requirements: FieldRequirements) -> InputValidation {
    let check = |field: InputField| validate(field_kind(field, requirements), inputs.get(field));
    InputValidation {
        url: check(InputField::Url),
        api_port: check(InputField::ApiPort),
        noise_port: check(InputField::NoisePort),
        metrics_port: check(InputField::MetricsPort),
        public_key: check(InputField::PublicKey),
    }
}
