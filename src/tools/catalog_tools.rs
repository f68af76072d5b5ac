// src/tools/catalog_tools.rs

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

//! Handlers das cinco ferramentas MCP.
//!
//! Todo handler devolve um `CallToolResult` (nunca um erro): falhas viram texto
//! marcado com `is_error = true`.

use super::params::{GetWorkbookDetailsParams, SearchContentParams};
use super::render;
use crate::api_client::TableauApiClient;
use crate::catalog;
use rmcp::model::{CallToolResult, Content};

fn text_ok(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

fn text_error(text: String) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text)])
}

/// Força um novo sign-in e informa se o servidor devolveu um token.
#[tracing::instrument(skip(client), name = "tool_test_connection")]
pub async fn handle_test_connection(client: &TableauApiClient) -> CallToolResult {
    let tableau = client.session().tableau();
    match client.session().force_reauthenticate().await {
        Ok(outcome) => {
            tracing::info!(token.present = outcome.token_present, "Teste de conexão concluído.");
            text_ok(render::connection_ok(&tableau.display_url(), &tableau.site_id, outcome.token_present))
        }
        Err(e) => {
            tracing::warn!(error.message = %e, "Teste de conexão falhou.");
            text_error(render::CONNECTION_FAILED.to_string())
        }
    }
}

#[tracing::instrument(skip(client), name = "tool_list_workbooks")]
pub async fn handle_list_workbooks(client: &TableauApiClient) -> CallToolResult {
    match catalog::fetch_workbooks(client).await {
        Ok(workbooks) => text_ok(render::workbook_list(&workbooks, &client.session().tableau().host())),
        Err(e) => {
            tracing::error!(error.message = %e, error.kind = e.kind(), "Não foi possível listar workbooks.");
            text_error(render::unable_to_retrieve("workbooks", &e))
        }
    }
}

#[tracing::instrument(skip(client), name = "tool_list_data_sources")]
pub async fn handle_list_data_sources(client: &TableauApiClient) -> CallToolResult {
    match catalog::fetch_data_sources(client).await {
        Ok(data_sources) => text_ok(render::data_source_list(&data_sources)),
        Err(e) => {
            tracing::error!(error.message = %e, error.kind = e.kind(), "Não foi possível listar fontes de dados.");
            text_error(render::unable_to_retrieve("data sources", &e))
        }
    }
}

/// Resolve o workbook por id ou por nome e devolve metadados e views.
#[tracing::instrument(
    skip(client, params),
    name = "tool_get_workbook_details",
    fields(
        workbook.id = params.workbook_id.as_deref().unwrap_or_default(),
        workbook.name = params.workbook_name.as_deref().unwrap_or_default()
    )
)]
pub async fn handle_get_workbook_details(
    client: &TableauApiClient,
    params: GetWorkbookDetailsParams,
) -> CallToolResult {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let workbook_id = match (non_empty(params.workbook_id), non_empty(params.workbook_name)) {
        (Some(id), _) => id,
        (None, Some(name)) => {
            let workbooks = match catalog::fetch_workbooks(client).await {
                Ok(workbooks) => workbooks,
                Err(e) => {
                    tracing::error!(error.message = %e, "Falha ao listar workbooks para resolver o nome.");
                    return text_error(render::unable_to_retrieve("workbooks", &e));
                }
            };
            match catalog::find_workbook_by_name(&workbooks, &name) {
                Some(wb) => wb.id.clone(),
                None => {
                    tracing::info!("Nenhum workbook com o nome informado.");
                    return text_error(render::workbook_not_found(&name));
                }
            }
        }
        (None, None) => return text_error(render::MISSING_WORKBOOK_SELECTOR.to_string()),
    };

    match catalog::fetch_workbook_details(client, &workbook_id).await {
        Ok(Some(detail)) => text_ok(render::workbook_detail(&detail)),
        Ok(None) => text_error(render::DETAILS_UNAVAILABLE.to_string()),
        Err(e) => {
            tracing::error!(error.message = %e, error.kind = e.kind(), "Falha ao obter detalhes do workbook.");
            text_error(render::DETAILS_UNAVAILABLE.to_string())
        }
    }
}

/// Busca por substring em workbooks e fontes de dados.
///
/// Se apenas uma das coleções falhar, ela é tratada como vazia. Se ambas
/// falharem, o resultado é marcado como erro.
#[tracing::instrument(skip(client, params), name = "tool_search_content", fields(query.length = params.query.len()))]
pub async fn handle_search_content(client: &TableauApiClient, params: SearchContentParams) -> CallToolResult {
    let workbooks = catalog::fetch_workbooks(client).await;
    let data_sources = catalog::fetch_data_sources(client).await;

    let (workbooks, data_sources) = match (workbooks, data_sources) {
        (Err(e), Err(_)) => {
            tracing::error!(error.message = %e, "Busca sem nenhuma coleção disponível.");
            return text_error(render::unable_to_retrieve("content", &e));
        }
        (workbooks, data_sources) => (
            workbooks.unwrap_or_else(|e| {
                tracing::warn!(error.message = %e, "Workbooks indisponíveis; busca segue só com fontes de dados.");
                Vec::new()
            }),
            data_sources.unwrap_or_else(|e| {
                tracing::warn!(error.message = %e, "Fontes de dados indisponíveis; busca segue só com workbooks.");
                Vec::new()
            }),
        ),
    };

    // Os títulos mostram a consulta já normalizada.
    let query = params.query.to_lowercase();
    let matches = catalog::search(&workbooks, &data_sources, &query);
    tracing::debug!(
        matches.workbooks = matches.workbooks.len(),
        matches.data_sources = matches.data_sources.len(),
        "Busca concluída."
    );
    text_ok(render::search_results(&matches, &query))
}
