// src/tools/render.rs

// MIT License
//
// Copyright (c) 2025 Guilherme Leste
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Texto devolvido pelas ferramentas. Funções puras, sem I/O.

use crate::catalog::models::{DataSource, Workbook, WorkbookDetail};
use crate::catalog::xml::UNKNOWN;
use crate::catalog::SearchMatches;

pub const CONNECTION_FAILED: &str =
    "❌ Failed to connect to Tableau Server. Check your credentials and network connection.";
pub const NO_WORKBOOKS: &str = "No workbooks found.";
pub const NO_DATA_SOURCES: &str = "No data sources found.";
pub const DETAILS_UNAVAILABLE: &str = "❌ Unable to retrieve workbook details.";
pub const MISSING_WORKBOOK_SELECTOR: &str = "❌ Please provide either workbook_name or workbook_id.";

fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or(UNKNOWN)
}

#[must_use]
pub fn connection_ok(server_url: &str, site_id: &str, token_present: bool) -> String {
    format!(
        "✅ Successfully connected to {server_url}\nSite: {site_id}\nAuth Token: {}",
        if token_present { "Present" } else { "Missing" }
    )
}

#[must_use]
pub fn workbook_list(workbooks: &[Workbook], host: &str) -> String {
    if workbooks.is_empty() {
        return NO_WORKBOOKS.to_string();
    }
    let blocks: Vec<String> = workbooks
        .iter()
        .map(|wb| {
            format!(
                "📊 **{}**\n   Project: {}\n   Owner: {}\n   Updated: {}\n   Size: {} bytes\n",
                wb.name,
                wb.project,
                wb.owner,
                or_unknown(wb.updated_at.as_deref()),
                wb.size
            )
        })
        .collect();
    format!("Found {} workbooks on {host}:\n\n{}", workbooks.len(), blocks.join("\n"))
}

#[must_use]
pub fn data_source_list(data_sources: &[DataSource]) -> String {
    if data_sources.is_empty() {
        return NO_DATA_SOURCES.to_string();
    }
    let blocks: Vec<String> = data_sources
        .iter()
        .map(|ds| {
            format!(
                "🗄️ **{}**\n   Type: {}\n   Project: {}\n   Updated: {}\n",
                ds.name,
                or_unknown(ds.datasource_type.as_deref()),
                ds.project,
                or_unknown(ds.updated_at.as_deref())
            )
        })
        .collect();
    format!("Found {} data sources:\n\n{}", data_sources.len(), blocks.join("\n"))
}

#[must_use]
pub fn workbook_detail(detail: &WorkbookDetail) -> String {
    let views: Vec<String> = detail.views.iter().map(|v| format!("   📋 {}", v.name)).collect();
    let wb = &detail.workbook;
    format!(
        "📊 **Workbook Details: {}**\n\n**Worksheets & Dashboards ({}):**\n{}\n\n**Project:** {}\n**Owner:** {}\n**Size:** {} bytes\n**Description:** {}",
        wb.name,
        detail.view_count(),
        views.join("\n"),
        wb.project,
        wb.owner,
        wb.size,
        wb.description
    )
}

#[must_use]
pub fn workbook_not_found(name: &str) -> String {
    format!("❌ Workbook '{name}' not found.")
}

/// Mensagem de erro para quando a coleção não pôde ser obtida.
#[must_use]
pub fn unable_to_retrieve(what: &str, reason: &dyn std::fmt::Display) -> String {
    format!("❌ Unable to retrieve {what}: {reason}")
}

#[must_use]
pub fn search_results(matches: &SearchMatches<'_>, query: &str) -> String {
    if matches.is_empty() {
        return format!("No content found matching '{query}'");
    }

    let mut lines = Vec::new();
    if !matches.workbooks.is_empty() {
        lines.push(format!("**📊 Workbooks matching '{query}':**"));
        lines.extend(matches.workbooks.iter().map(|wb| format!("   • {} (Project: {})", wb.name, wb.project)));
    }
    if !matches.data_sources.is_empty() {
        lines.push(format!("\n**🗄️ Data Sources matching '{query}':**"));
        lines.extend(
            matches
                .data_sources
                .iter()
                .map(|ds| format!("   • {} (Type: {})", ds.name, or_unknown(ds.datasource_type.as_deref()))),
        );
    }
    lines.join("\n")
}
