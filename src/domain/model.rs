use crate::utils::error::{CepError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CEP_DIGITS: usize = 8;
pub const CEP_PREFIX_DIGITS: usize = 5;

/// A complete Brazilian postal code, stored as its 8-digit run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Accepts exactly 8 ASCII digits and nothing else.
    pub fn new(digits: &str) -> Option<Self> {
        if digits.len() == CEP_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(digits.to_string()))
        } else {
            None
        }
    }

    /// 解析使用者輸入：忽略分隔符號，但數字必須剛好 8 位 (不截斷)
    pub fn parse(raw: &str) -> Result<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        Self::new(&digits).ok_or_else(|| CepError::InvalidPostalCode {
            value: raw.to_string(),
        })
    }

    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, suffix) = self.0.split_at(CEP_PREFIX_DIGITS);
        write!(f, "{}-{}", prefix, suffix)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Address record returned by the lookup service. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "logradouro", default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(rename = "bairro", default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(rename = "localidade", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "uf", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "complemento", default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
}

impl Address {
    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        match kind {
            FieldKind::Cep => None,
            FieldKind::Street => self.street.as_deref(),
            FieldKind::Neighborhood => self.neighborhood.as_deref(),
            FieldKind::City => self.city.as_deref(),
            FieldKind::State => self.state.as_deref(),
            FieldKind::Complement => self.complement.as_deref(),
        }
    }
}

/// Raw ViaCEP body: the address plus the `erro` not-found marker.
#[derive(Debug, Clone, Deserialize)]
pub struct ViaCepPayload {
    #[serde(default)]
    pub erro: Option<serde_json::Value>,
    #[serde(flatten)]
    pub address: Address,
}

impl ViaCepPayload {
    /// 服務曾以 `true` 與 `"true"` 兩種形式回傳 erro
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(s)) => !s.is_empty() && s != "false",
            Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(_) => true,
        }
    }

    pub fn into_address(self, cep: &PostalCode) -> Result<Address> {
        if self.is_not_found() {
            return Err(CepError::AddressNotFound {
                cep: cep.to_string(),
            });
        }
        Ok(self.address)
    }
}

/// How overlapping lookups from repeated blur events are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Only the most recently issued lookup may write the form.
    #[default]
    LastRequestWins,
    /// Every response writes the form when it resolves.
    LastResponseWins,
}

/// The form controls the binder knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Cep,
    Street,
    Neighborhood,
    City,
    State,
    Complement,
}

impl FieldKind {
    pub const ADDRESS_FIELDS: [FieldKind; 5] = [
        FieldKind::Street,
        FieldKind::Neighborhood,
        FieldKind::City,
        FieldKind::State,
        FieldKind::Complement,
    ];

    /// Element id used by the registration form markup.
    pub fn element_id(&self) -> &'static str {
        match self {
            FieldKind::Cep => "cep",
            FieldKind::Street => "logradouro",
            FieldKind::Neighborhood => "bairro",
            FieldKind::City => "cidade",
            FieldKind::State => "estado",
            FieldKind::Complement => "complemento",
        }
    }
}
