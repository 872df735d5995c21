//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::{
    Choice, FeedbackForm, FilterField, Frequencia, ImpactoFinanceiro, Prioridade, Processo, Tipo,
};

/// Submit command arguments.
///
/// Text fields default to empty so that a missing required value is reported
/// by validation rather than by argument parsing.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Feedback kind
    #[arg(short, long, value_enum)]
    pub tipo: Option<TipoArg>,

    /// Your name
    #[arg(short, long, default_value = "")]
    pub nome: String,

    /// Process the feedback refers to
    #[arg(short, long, value_enum)]
    pub processo: Option<ProcessoArg>,

    /// Short title
    #[arg(short = 'T', long, default_value = "")]
    pub titulo: String,

    /// Full description
    #[arg(short, long, default_value = "")]
    pub descricao: String,

    /// How often it happens
    #[arg(short, long, value_enum)]
    pub frequencia: Option<FrequenciaArg>,

    /// Priority
    #[arg(short = 'P', long, value_enum)]
    pub prioridade: Option<PrioridadeArg>,

    /// Whether there is a financial impact
    #[arg(short, long, value_enum)]
    pub impacto: Option<ImpactoArg>,

    /// Example construction site
    #[arg(short, long, default_value = "")]
    pub obra: String,
}

impl SubmitCommand {
    /// Collect the arguments as raw form values.
    #[must_use]
    pub fn to_form(&self) -> FeedbackForm {
        fn code<A: Copy + Into<C>, C: Choice>(arg: Option<A>) -> String {
            arg.map(|a| Into::<C>::into(a).code().to_string())
                .unwrap_or_default()
        }

        FeedbackForm {
            tipo: code::<_, Tipo>(self.tipo),
            nome: self.nome.clone(),
            processo: code::<_, Processo>(self.processo),
            titulo: self.titulo.clone(),
            descricao: self.descricao.clone(),
            frequencia: code::<_, Frequencia>(self.frequencia),
            prioridade: code::<_, Prioridade>(self.prioridade),
            impacto_financeiro: code::<_, ImpactoFinanceiro>(self.impacto),
            obra_exemplo: self.obra.clone(),
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Filter command arguments.
#[derive(Debug, Args)]
pub struct FilterCommand {
    /// Field to filter on
    #[arg(short = 'F', long, value_enum)]
    pub field: FilterFieldArg,

    /// Value to match ("todos" or empty matches everything)
    #[arg(long, default_value = "")]
    pub value: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the feedback to delete
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Directory to write the export file to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Print the export to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Feedback kind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TipoArg {
    /// Process improvement
    Melhoria,
    /// Recurring problem
    Problema,
}

impl From<TipoArg> for Tipo {
    fn from(arg: TipoArg) -> Self {
        match arg {
            TipoArg::Melhoria => Self::Melhoria,
            TipoArg::Problema => Self::Problema,
        }
    }
}

/// Process argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProcessoArg {
    /// 0. Orçamentação
    Orcamentacao,
    /// 1. Início de Obra
    Inicio,
    /// 2. Revisão de Projeto
    Revisao,
    /// 3. Demolição + Civil
    Demolicao,
    /// 4. Hidráulica
    Hidraulica,
    /// 5. Finalização de Obra
    Finalizacao,
    /// 6. Gestão de Mudanças
    Mudancas,
    /// Geral (não específico)
    Geral,
}

impl From<ProcessoArg> for Processo {
    fn from(arg: ProcessoArg) -> Self {
        match arg {
            ProcessoArg::Orcamentacao => Self::Orcamentacao,
            ProcessoArg::Inicio => Self::Inicio,
            ProcessoArg::Revisao => Self::Revisao,
            ProcessoArg::Demolicao => Self::Demolicao,
            ProcessoArg::Hidraulica => Self::Hidraulica,
            ProcessoArg::Finalizacao => Self::Finalizacao,
            ProcessoArg::Mudancas => Self::Mudancas,
            ProcessoArg::Geral => Self::Geral,
        }
    }
}

/// Frequency argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrequenciaArg {
    /// Once or twice
    Raramente,
    /// Monthly
    Ocasionalmente,
    /// Weekly
    Frequentemente,
    /// Every site
    Sempre,
}

impl From<FrequenciaArg> for Frequencia {
    fn from(arg: FrequenciaArg) -> Self {
        match arg {
            FrequenciaArg::Raramente => Self::Raramente,
            FrequenciaArg::Ocasionalmente => Self::Ocasionalmente,
            FrequenciaArg::Frequentemente => Self::Frequentemente,
            FrequenciaArg::Sempre => Self::Sempre,
        }
    }
}

/// Priority argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrioridadeArg {
    /// Low
    Baixa,
    /// Medium
    Media,
    /// High
    Alta,
}

impl From<PrioridadeArg> for Prioridade {
    fn from(arg: PrioridadeArg) -> Self {
        match arg {
            PrioridadeArg::Baixa => Self::Baixa,
            PrioridadeArg::Media => Self::Media,
            PrioridadeArg::Alta => Self::Alta,
        }
    }
}

/// Financial impact argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImpactoArg {
    /// Yes
    Sim,
    /// No
    Nao,
}

impl From<ImpactoArg> for ImpactoFinanceiro {
    fn from(arg: ImpactoArg) -> Self {
        match arg {
            ImpactoArg::Sim => Self::Sim,
            ImpactoArg::Nao => Self::Nao,
        }
    }
}

/// Filterable field argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterFieldArg {
    /// Feedback kind
    Tipo,
    /// Process code
    Processo,
    /// Frequency code
    Frequencia,
    /// Priority code
    Prioridade,
    /// Financial impact code
    #[value(name = "impacto")]
    ImpactoFinanceiro,
    /// Submitter name
    Nome,
    /// Example construction site
    #[value(name = "obra")]
    ObraExemplo,
}

impl From<FilterFieldArg> for FilterField {
    fn from(arg: FilterFieldArg) -> Self {
        match arg {
            FilterFieldArg::Tipo => Self::Tipo,
            FilterFieldArg::Processo => Self::Processo,
            FilterFieldArg::Frequencia => Self::Frequencia,
            FilterFieldArg::Prioridade => Self::Prioridade,
            FilterFieldArg::ImpactoFinanceiro => Self::ImpactoFinanceiro,
            FilterFieldArg::Nome => Self::Nome,
            FilterFieldArg::ObraExemplo => Self::ObraExemplo,
        }
    }
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text cards
    #[default]
    Plain,
    /// JSON array
    Json,
    /// HTML fragment
    Html,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(tipo: Option<TipoArg>) -> SubmitCommand {
        SubmitCommand {
            tipo,
            nome: "Ana".to_string(),
            processo: Some(ProcessoArg::Demolicao),
            titulo: "T1".to_string(),
            descricao: "D1".to_string(),
            frequencia: None,
            prioridade: Some(PrioridadeArg::Alta),
            impacto: Some(ImpactoArg::Nao),
            obra: String::new(),
        }
    }

    #[test]
    fn test_submit_to_form() {
        let form = submit(Some(TipoArg::Melhoria)).to_form();

        assert_eq!(form.tipo, "melhoria");
        assert_eq!(form.processo, "demolicao");
        assert_eq!(form.frequencia, "");
        assert_eq!(form.prioridade, "alta");
        assert_eq!(form.impacto_financeiro, "nao");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_submit_without_tipo_fails_validation() {
        let form = submit(None).to_form();
        assert_eq!(form.tipo, "");
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_choice_arg_conversion() {
        for arg in ProcessoArg::value_variants() {
            let processo = Processo::from(*arg);
            let name = arg.to_possible_value().unwrap();
            assert_eq!(name.get_name(), processo.code());
        }
        for arg in FrequenciaArg::value_variants() {
            let name = arg.to_possible_value().unwrap();
            assert_eq!(name.get_name(), Frequencia::from(*arg).code());
        }
        assert_eq!(Prioridade::from(PrioridadeArg::Media), Prioridade::Media);
        assert_eq!(ImpactoFinanceiro::from(ImpactoArg::Sim), ImpactoFinanceiro::Sim);
        assert_eq!(Tipo::from(TipoArg::Problema), Tipo::Problema);
    }

    #[test]
    fn test_filter_field_arg_conversion() {
        assert_eq!(
            FilterField::from(FilterFieldArg::ImpactoFinanceiro),
            FilterField::ImpactoFinanceiro
        );
        assert_eq!(
            FilterFieldArg::ObraExemplo
                .to_possible_value()
                .unwrap()
                .get_name(),
            "obra"
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }
}
