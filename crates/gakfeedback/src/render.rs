//! Presentation helpers for feedback records.
//!
//! Label tables, pt-BR date formatting, record cards (HTML fragment and plain
//! text) and the user-facing notice texts.

use std::fmt::Write as _;

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::record::{FeedbackRecord, Frequencia, ImpactoFinanceiro, Prioridade, Processo, Tipo};

/// Border colour for a card without a priority.
const NEUTRAL_COLOR: &str = "#dddddd";

/// Shown instead of a process name when none was selected.
const PROCESSO_UNSET: &str = "Não especificado";

/// User-facing notice texts.
pub mod notices {
    /// A required field was left blank.
    pub const MISSING_REQUIRED: &str =
        "⚠️ Por favor, preencha todos os campos obrigatórios marcados com *";
    /// Submission saved.
    pub const SAVED: &str = "✅ Feedback registrado com sucesso!";
    /// Export requested on an empty store.
    pub const NOTHING_TO_EXPORT: &str = "📋 Nenhum feedback para exportar.";
    /// Clear requested on an empty store.
    pub const NOTHING_TO_CLEAR: &str = "📋 Não há feedbacks para limpar.";
    /// Clear finished.
    pub const CLEARED: &str = "✅ Todos os feedbacks foram removidos.";
    /// Single-record deletion prompt.
    pub const CONFIRM_DELETE: &str = "⚠️ Tem certeza que deseja deletar este feedback?";
    /// Single record deleted.
    pub const DELETED: &str = "✅ Feedback deletado com sucesso!";
    /// Deletion target not found.
    pub const NOT_FOUND: &str = "📋 Nenhum feedback encontrado com este ID.";
    /// Empty full list.
    pub const EMPTY_LIST: &str = "📋 Nenhum feedback registrado ainda.";
    /// Second line of the empty full list.
    pub const EMPTY_LIST_HINT: &str = "Seja o primeiro a contribuir!";
    /// Empty filter result.
    pub const EMPTY_FILTER: &str = "📋 Nenhum feedback encontrado com este filtro.";

    /// Export finished.
    #[must_use]
    pub fn exported(count: usize) -> String {
        format!("✅ {count} feedback(s) exportado(s) com sucesso!")
    }

    /// Clear-all prompt.
    #[must_use]
    pub fn confirm_clear(count: usize) -> String {
        format!(
            "⚠️ ATENÇÃO!\n\nVocê está prestes a deletar {count} feedback(s).\n\n\
             Esta ação NÃO PODE ser desfeita.\n\n\
             Tem certeza que deseja continuar?"
        )
    }
}

/// Which list an empty result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListContext {
    /// The full collection.
    All,
    /// A filtered view.
    Filtered,
}

/// Icon shown next to the title.
#[must_use]
pub fn tipo_icon(tipo: Tipo) -> &'static str {
    match tipo {
        Tipo::Melhoria => "💡",
        Tipo::Problema => "⚠️",
    }
}

/// Long name of the feedback kind.
#[must_use]
pub fn tipo_label(tipo: Tipo) -> &'static str {
    match tipo {
        Tipo::Melhoria => "Melhoria de Processo",
        Tipo::Problema => "Problema Recorrente",
    }
}

/// Badge text for a priority.
#[must_use]
pub fn prioridade_label(prioridade: Prioridade) -> &'static str {
    match prioridade {
        Prioridade::Baixa => "🟢 Baixa",
        Prioridade::Media => "🟡 Média",
        Prioridade::Alta => "🔴 Alta",
    }
}

/// Badge and border colour for a priority.
#[must_use]
pub fn prioridade_color(prioridade: Prioridade) -> &'static str {
    match prioridade {
        Prioridade::Baixa => "#28a745",
        Prioridade::Media => "#ffc107",
        Prioridade::Alta => "#dc3545",
    }
}

/// Display name of a process, or "Não especificado".
#[must_use]
pub fn processo_name(processo: Option<Processo>) -> &'static str {
    match processo {
        Some(Processo::Orcamentacao) => "0. Orçamentação",
        Some(Processo::Inicio) => "1. Início de Obra",
        Some(Processo::Revisao) => "2. Revisão de Projeto",
        Some(Processo::Demolicao) => "3. Demolição + Civil",
        Some(Processo::Hidraulica) => "4. Hidráulica",
        Some(Processo::Finalizacao) => "5. Finalização de Obra",
        Some(Processo::Mudancas) => "6. Gestão de Mudanças",
        Some(Processo::Geral) => "Geral (não específico)",
        None => PROCESSO_UNSET,
    }
}

/// Frequency with its cadence hint.
#[must_use]
pub fn frequencia_label(frequencia: Frequencia) -> &'static str {
    match frequencia {
        Frequencia::Raramente => "Raramente (1-2 vezes)",
        Frequencia::Ocasionalmente => "Ocasionalmente (mensal)",
        Frequencia::Frequentemente => "Frequentemente (semanal)",
        Frequencia::Sempre => "Sempre (toda obra)",
    }
}

/// Financial impact answer.
#[must_use]
pub fn impacto_label(impacto: ImpactoFinanceiro) -> &'static str {
    match impacto {
        ImpactoFinanceiro::Sim => "💰 Sim",
        ImpactoFinanceiro::Nao => "Não",
    }
}

/// `DD/MM/YYYY` in local time.
#[must_use]
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    format_naive_date(timestamp.with_timezone(&Local).date_naive())
}

fn format_naive_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `feedbacks_gak_DD-MM-YYYY.json`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("feedbacks_gak_{}.json", format_naive_date(date).replace('/', "-"))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Optional detail lines as `(label, value)` pairs, unset fields omitted.
fn details(record: &FeedbackRecord) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    if let Some(f) = record.frequencia {
        out.push(("Frequência", frequencia_label(f).to_string()));
    }
    if let Some(i) = record.impacto_financeiro {
        out.push(("Impacto Financeiro", impacto_label(i).to_string()));
    }
    if !record.obra_exemplo.is_empty() {
        out.push(("Obra Exemplo", record.obra_exemplo.clone()));
    }
    out
}

/// Render one record as an HTML fragment. All user text is escaped.
#[must_use]
pub fn render_card_html(record: &FeedbackRecord) -> String {
    let color = record.prioridade.map_or(NEUTRAL_COLOR, prioridade_color);
    let mut html = String::new();

    let _ = writeln!(
        html,
        r#"<div class="feedback-card" data-id="{}" style="border-left: 4px solid {color};">"#,
        escape_html(&record.id)
    );
    let _ = writeln!(
        html,
        r#"  <h4 class="feedback-title">{} {}</h4>"#,
        tipo_icon(record.tipo),
        escape_html(&record.titulo)
    );
    let _ = writeln!(
        html,
        r#"  <div class="feedback-meta">👤 {} • 📅 {} • 🔄 Processo: <strong>{}</strong></div>"#,
        escape_html(&record.nome),
        format_date(record.timestamp),
        processo_name(record.processo)
    );
    if let Some(p) = record.prioridade {
        let _ = writeln!(
            html,
            r#"  <span class="feedback-priority" style="background: {};">{}</span>"#,
            prioridade_color(p),
            prioridade_label(p)
        );
    }
    let _ = writeln!(
        html,
        r#"  <div class="feedback-description">{}</div>"#,
        escape_html(&record.descricao)
    );

    let details = details(record);
    if !details.is_empty() {
        html.push_str("  <div class=\"feedback-details\">\n");
        for (label, value) in details {
            let _ = writeln!(
                html,
                "    <div><strong>{label}:</strong> {}</div>",
                escape_html(&value)
            );
        }
        html.push_str("  </div>\n");
    }

    let _ = writeln!(
        html,
        r#"  <div class="feedback-footer">Tipo: {} • ID: {}</div>"#,
        tipo_label(record.tipo),
        escape_html(&record.id)
    );
    html.push_str("</div>\n");
    html
}

/// Render one record as plain text for the terminal.
#[must_use]
pub fn render_card_text(record: &FeedbackRecord) -> String {
    let mut text = String::new();

    let _ = write!(text, "{} {}", tipo_icon(record.tipo), record.titulo);
    if let Some(p) = record.prioridade {
        let _ = write!(text, "  [{}]", prioridade_label(p));
    }
    text.push('\n');
    let _ = writeln!(
        text,
        "   👤 {} • 📅 {} • 🔄 Processo: {}",
        record.nome,
        format_date(record.timestamp),
        processo_name(record.processo)
    );
    for line in record.descricao.lines() {
        let _ = writeln!(text, "   {line}");
    }
    for (label, value) in details(record) {
        let _ = writeln!(text, "   {label}: {value}");
    }
    let _ = writeln!(
        text,
        "   Tipo: {} • ID: {}",
        tipo_label(record.tipo),
        record.id
    );
    text
}

/// Render a list of records, or the empty-state fragment for `context`.
#[must_use]
pub fn render_list_html(records: &[FeedbackRecord], context: ListContext) -> String {
    if records.is_empty() {
        return match context {
            ListContext::All => format!(
                "<div class=\"feedback-empty\">\n  <p>{}</p>\n  <p>{}</p>\n</div>\n",
                notices::EMPTY_LIST,
                notices::EMPTY_LIST_HINT
            ),
            ListContext::Filtered => format!(
                "<div class=\"feedback-empty\">\n  <p>{}</p>\n</div>\n",
                notices::EMPTY_FILTER
            ),
        };
    }
    records.iter().map(render_card_html).collect()
}

/// Render a list of records as text, separated by blank lines.
#[must_use]
pub fn render_list_text(records: &[FeedbackRecord], context: ListContext) -> String {
    if records.is_empty() {
        return match context {
            ListContext::All => format!("{}\n{}\n", notices::EMPTY_LIST, notices::EMPTY_LIST_HINT),
            ListContext::Filtered => format!("{}\n", notices::EMPTY_FILTER),
        };
    }
    records
        .iter()
        .map(render_card_text)
        .collect::<Vec<_>>()
        .join("\n")
}
