//! Core feedback types for gakfeedback.
//!
//! This module defines the feedback record, the closed code sets for its
//! choice fields, the raw submission form and its validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field whose value is drawn from a fixed set of codes.
///
/// The code is the lowercase wire value stored in the JSON array.
pub trait Choice: Sized + Copy + 'static {
    /// Field name used in error messages.
    const FIELD: &'static str;

    /// Every accepted value, in presentation order.
    const ALL: &'static [Self];

    /// The wire code for this value.
    fn code(self) -> &'static str;

    /// Look up a value by its wire code.
    #[must_use]
    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

/// Kind of feedback being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tipo {
    /// A process improvement suggestion.
    Melhoria,
    /// A recurring problem report.
    Problema,
}

impl Choice for Tipo {
    const FIELD: &'static str = "tipo";
    const ALL: &'static [Self] = &[Self::Melhoria, Self::Problema];

    fn code(self) -> &'static str {
        match self {
            Self::Melhoria => "melhoria",
            Self::Problema => "problema",
        }
    }
}

/// Work process the feedback refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Processo {
    /// 0. Budgeting.
    Orcamentacao,
    /// 1. Site start.
    Inicio,
    /// 2. Project review.
    Revisao,
    /// 3. Demolition and civil works.
    Demolicao,
    /// 4. Plumbing.
    Hidraulica,
    /// 5. Site completion.
    Finalizacao,
    /// 6. Change management.
    Mudancas,
    /// Not tied to a specific process.
    Geral,
}

impl Choice for Processo {
    const FIELD: &'static str = "processo";
    const ALL: &'static [Self] = &[
        Self::Orcamentacao,
        Self::Inicio,
        Self::Revisao,
        Self::Demolicao,
        Self::Hidraulica,
        Self::Finalizacao,
        Self::Mudancas,
        Self::Geral,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::Orcamentacao => "orcamentacao",
            Self::Inicio => "inicio",
            Self::Revisao => "revisao",
            Self::Demolicao => "demolicao",
            Self::Hidraulica => "hidraulica",
            Self::Finalizacao => "finalizacao",
            Self::Mudancas => "mudancas",
            Self::Geral => "geral",
        }
    }
}

/// How often the reported situation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequencia {
    /// Once or twice.
    Raramente,
    /// Monthly.
    Ocasionalmente,
    /// Weekly.
    Frequentemente,
    /// On every site.
    Sempre,
}

impl Choice for Frequencia {
    const FIELD: &'static str = "frequencia";
    const ALL: &'static [Self] = &[
        Self::Raramente,
        Self::Ocasionalmente,
        Self::Frequentemente,
        Self::Sempre,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::Raramente => "raramente",
            Self::Ocasionalmente => "ocasionalmente",
            Self::Frequentemente => "frequentemente",
            Self::Sempre => "sempre",
        }
    }
}

/// Priority assigned by the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prioridade {
    /// Low.
    Baixa,
    /// Medium.
    Media,
    /// High.
    Alta,
}

impl Choice for Prioridade {
    const FIELD: &'static str = "prioridade";
    const ALL: &'static [Self] = &[Self::Baixa, Self::Media, Self::Alta];

    fn code(self) -> &'static str {
        match self {
            Self::Baixa => "baixa",
            Self::Media => "media",
            Self::Alta => "alta",
        }
    }
}

/// Whether the situation has a financial impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactoFinanceiro {
    /// Yes.
    Sim,
    /// No.
    Nao,
}

impl Choice for ImpactoFinanceiro {
    const FIELD: &'static str = "impactoFinanceiro";
    const ALL: &'static [Self] = &[Self::Sim, Self::Nao];

    fn code(self) -> &'static str {
        match self {
            Self::Sim => "sim",
            Self::Nao => "nao",
        }
    }
}

macro_rules! display_as_code {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        })+
    };
}

display_as_code!(Tipo, Processo, Frequencia, Prioridade, ImpactoFinanceiro);

/// A stored feedback submission.
///
/// Field names on the wire match the layout the intranet form has always
/// written, so exported files stay interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Opaque unique identifier.
    pub id: String,

    /// When the feedback was submitted.
    #[serde(with = "timestamp_millis")]
    pub timestamp: DateTime<Utc>,

    /// Improvement or problem.
    pub tipo: Tipo,

    /// Submitter name.
    pub nome: String,

    /// Process the feedback refers to.
    #[serde(default, with = "blank_choice")]
    pub processo: Option<Processo>,

    /// Short title.
    pub titulo: String,

    /// Full description.
    pub descricao: String,

    /// How often it happens.
    #[serde(default, with = "blank_choice")]
    pub frequencia: Option<Frequencia>,

    /// Submitter-assigned priority.
    #[serde(default, with = "blank_choice")]
    pub prioridade: Option<Prioridade>,

    /// Whether there is a financial impact.
    #[serde(default, with = "blank_choice")]
    pub impacto_financeiro: Option<ImpactoFinanceiro>,

    /// Example construction site, free text.
    #[serde(default)]
    pub obra_exemplo: String,
}

/// Raw submission values as typed into the form.
///
/// Every field may be empty; [`FeedbackForm::validate`] decides whether the
/// submission is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    /// Selected feedback kind code.
    pub tipo: String,
    /// Submitter name.
    pub nome: String,
    /// Selected process code.
    pub processo: String,
    /// Title.
    pub titulo: String,
    /// Description.
    pub descricao: String,
    /// Selected frequency code.
    pub frequencia: String,
    /// Selected priority code.
    pub prioridade: String,
    /// Selected financial impact code.
    pub impacto_financeiro: String,
    /// Example construction site.
    pub obra_exemplo: String,
}

/// A form that passed validation, with trimmed text and parsed choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm {
    tipo: Tipo,
    nome: String,
    processo: Option<Processo>,
    titulo: String,
    descricao: String,
    frequencia: Option<Frequencia>,
    prioridade: Option<Prioridade>,
    impacto_financeiro: Option<ImpactoFinanceiro>,
    obra_exemplo: String,
}

/// Fields a submission cannot omit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// Feedback kind.
    Tipo,
    /// Submitter name.
    Nome,
    /// Title.
    Titulo,
    /// Description.
    Descricao,
}

impl RequiredField {
    /// Field name as it appears on the form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tipo => "tipo",
            Self::Nome => "nome",
            Self::Titulo => "titulo",
            Self::Descricao => "descricao",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields were empty after trimming.
    #[error("missing required fields: {}", join_fields(.0))]
    MissingRequired(Vec<RequiredField>),

    /// A choice field carried a code outside its set.
    #[error("invalid value '{value}' for {field}")]
    InvalidChoice {
        /// Field name.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_choice<T: Choice>(raw: &str) -> Result<Option<T>, ValidationError> {
    let code = raw.trim();
    if code.is_empty() {
        return Ok(None);
    }
    T::from_code(code)
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidChoice {
            field: T::FIELD,
            value: code.to_string(),
        })
}

impl FeedbackForm {
    /// Trim and check the submission.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingRequired`] naming every required
    /// field that is blank, or [`ValidationError::InvalidChoice`] for the
    /// first choice field holding an unknown code.
    pub fn validate(&self) -> Result<ValidForm, ValidationError> {
        let nome = self.nome.trim();
        let titulo = self.titulo.trim();
        let descricao = self.descricao.trim();

        let missing: Vec<RequiredField> = [
            (RequiredField::Tipo, self.tipo.trim()),
            (RequiredField::Nome, nome),
            (RequiredField::Titulo, titulo),
            (RequiredField::Descricao, descricao),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingRequired(missing));
        }

        let tipo = parse_choice::<Tipo>(&self.tipo)?.ok_or_else(|| {
            ValidationError::MissingRequired(vec![RequiredField::Tipo])
        })?;

        Ok(ValidForm {
            tipo,
            nome: nome.to_string(),
            processo: parse_choice(&self.processo)?,
            titulo: titulo.to_string(),
            descricao: descricao.to_string(),
            frequencia: parse_choice(&self.frequencia)?,
            prioridade: parse_choice(&self.prioridade)?,
            impacto_financeiro: parse_choice(&self.impacto_financeiro)?,
            obra_exemplo: self.obra_exemplo.trim().to_string(),
        })
    }
}

impl ValidForm {
    /// Stamp the validated fields with an identifier and creation time.
    #[must_use]
    pub fn into_record(self, id: String, timestamp: DateTime<Utc>) -> FeedbackRecord {
        FeedbackRecord {
            id,
            timestamp,
            tipo: self.tipo,
            nome: self.nome,
            processo: self.processo,
            titulo: self.titulo,
            descricao: self.descricao,
            frequencia: self.frequencia,
            prioridade: self.prioridade,
            impacto_financeiro: self.impacto_financeiro,
            obra_exemplo: self.obra_exemplo,
        }
    }
}

/// Filter value that matches every record.
pub const FILTER_ALL: &str = "todos";

/// Record fields that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    /// Feedback kind.
    Tipo,
    /// Process code.
    Processo,
    /// Frequency code.
    Frequencia,
    /// Priority code.
    Prioridade,
    /// Financial impact code.
    ImpactoFinanceiro,
    /// Submitter name.
    Nome,
    /// Example construction site.
    ObraExemplo,
}

impl FilterField {
    /// The record's wire value for this field, `""` when unset.
    #[must_use]
    pub fn value_of(self, record: &FeedbackRecord) -> &str {
        match self {
            Self::Tipo => record.tipo.code(),
            Self::Processo => record.processo.map_or("", Choice::code),
            Self::Frequencia => record.frequencia.map_or("", Choice::code),
            Self::Prioridade => record.prioridade.map_or("", Choice::code),
            Self::ImpactoFinanceiro => record.impacto_financeiro.map_or("", Choice::code),
            Self::Nome => &record.nome,
            Self::ObraExemplo => &record.obra_exemplo,
        }
    }
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix.
mod timestamp_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

/// Optional choices stored as their code, or `""` when unset.
mod blank_choice {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::Choice;

    pub fn serialize<T: Choice, S: Serializer>(value: &Option<T>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.map_or("", Choice::code))
    }

    pub fn deserialize<'de, T: Choice, D: Deserializer<'de>>(d: D) -> Result<Option<T>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(code) => T::from_code(code)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("unknown {} value: {code}", T::FIELD))),
        }
    }
}
