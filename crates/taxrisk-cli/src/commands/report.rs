use std::fmt::Write as _;

use anyhow::Context;
use serde::Serialize;
use taxrisk_core::entities::AnalysisRecord;
use taxrisk_core::enums::{ComplianceLevel, ComplianceStandard};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReportArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ReportWritten<'a> {
    analysis_id: &'a str,
    path: &'a str,
}

/// Handle `taxrisk report`. Markdown goes to stdout unless `--out` is given.
pub async fn handle(args: &ReportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let record = ctx.service.get_analysis(&args.id).await?;
    let markdown = render_markdown(&record);

    match &args.out {
        Some(path) => {
            std::fs::write(path, markdown).with_context(|| format!("failed to write {path}"))?;
            output(
                &ReportWritten {
                    analysis_id: &record.id,
                    path,
                },
                flags.format,
            )
        }
        None => {
            print!("{markdown}");
            Ok(())
        }
    }
}

/// Render the detailed report for one analysis.
#[must_use]
pub fn render_markdown(record: &AnalysisRecord) -> String {
    let result = &record.result;
    let mut md = String::new();

    let _ = writeln!(md, "# Tax Risk Report: {}\n", result.document_name);
    let _ = writeln!(
        md,
        "Analysis `{}` ({} source), analyzed {}.\n",
        record.id,
        record.source,
        result.analyzed_at.format("%Y-%m-%d %H:%M UTC")
    );

    md.push_str("## Executive Summary\n\n| Metric | Value |\n|---|---|\n");
    let _ = writeln!(
        md,
        "| Overall risk score | {:.2}/100 |",
        result.overall_risk_score
    );
    let _ = writeln!(md, "| Risk level | {} |", result.risk_level.label());
    let _ = writeln!(md, "| Keywords flagged | {} |", result.flagged_keywords.len());
    let _ = writeln!(
        md,
        "| Categories identified | {} |",
        result.risk_categories.len()
    );
    let _ = writeln!(
        md,
        "| 12-month audit probability | {:.1}% |",
        result.audit_probability.twelve_month
    );
    let _ = writeln!(
        md,
        "| 36-month audit probability | {:.1}% |\n",
        result.audit_probability.thirty_six_month
    );

    let contingency = &result.expected_tax_contingency;
    md.push_str("## Tax Liability & Contingency\n\n| Estimate | Amount |\n|---|---:|\n");
    let _ = writeln!(md, "| Mean exposure | {} |", money(contingency.mean));
    let _ = writeln!(md, "| P75 (75th percentile) | {} |", money(contingency.p75));
    let _ = writeln!(md, "| P90 (90th percentile) | {} |\n", money(contingency.p90));

    let escrow = &result.escrow_adequacy;
    md.push_str("### Escrow Adequacy\n\n");
    let _ = writeln!(md, "- Recommended escrow: {}", money(escrow.recommended));
    let _ = writeln!(md, "- Current escrow: {}", money(escrow.current));
    if escrow.adequate {
        md.push_str("- Status: Adequate\n\n");
    } else {
        let _ = writeln!(
            md,
            "- Status: Insufficient (shortfall {})\n",
            money(escrow.shortfall)
        );
    }

    md.push_str("## Risk Categories\n\n");
    let categories = result.categories_by_score();
    if categories.is_empty() {
        md.push_str("_No risk keywords found._\n\n");
    }
    for category in categories {
        let _ = writeln!(
            md,
            "### {} ({})\n",
            category.label,
            category.risk_level.label()
        );
        let _ = writeln!(md, "- Score: {:.1}", category.score);
        let _ = writeln!(md, "- Confidence: {:.2}%", category.confidence);
        let _ = writeln!(md, "- Keywords: {}", category.keywords.join(", "));
        if !category.recommendations.is_empty() {
            md.push_str("- Recommendations:\n");
            for rec in &category.recommendations {
                let _ = writeln!(md, "  - {rec}");
            }
        }
        md.push('\n');
    }

    md.push_str("## Compliance Standards\n\n| Standard | Status | Issues |\n|---|---|---|\n");
    for standard in ComplianceStandard::ALL {
        let assessment = result.compliance_assessment.get(&standard);
        let level = assessment.map_or(ComplianceLevel::Compliant, |a| a.compliance_level);
        let issues = assessment
            .filter(|a| !a.issues.is_empty())
            .map_or_else(|| "None identified".to_string(), |a| a.issues.join("; "));
        let _ = writeln!(md, "| {standard} | {level} | {issues} |");
    }

    md
}

/// Format a dollar amount with thousands separators and cents.
fn money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
