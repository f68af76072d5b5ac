// src/mcp_service_handler.rs

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

//! Contém a implementação principal do `rmcp::ServerHandler` para o `Tableau-MCP-Server`.
//!
//! O handler anuncia as ferramentas de [`crate::tools`] e despacha cada chamada
//! pelo nome. Nenhuma chamada de ferramenta devolve `Err`: falhas de argumentos,
//! ferramentas desconhecidas e até pânicos viram um `CallToolResult` marcado como erro.

use std::time::Instant;

// rmcp v0.1.5
use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    ServerHandler,
};
use serde::de::DeserializeOwned;
use tokio::task::JoinError;

use crate::{
    api_client::TableauApiClient,
    error::McpServerError,
    tools::{self, catalog_tools, ToolName},
};

/// Instruções iniciais fornecidas aos clientes MCP ao conectar.
const SERVER_INSTRUCTIONS: &str = r"
You are connected to a Tableau Server catalog. Available tools:

*   `list_workbooks`: lists every workbook on the site (project, owner, last update, size).
*   `list_data_sources`: lists every published data source (type, project, last update).
*   `get_workbook_details`: details and views of one workbook. Pass `workbook_id`, or
    `workbook_name` for a case-insensitive exact name match.
*   `search_content`: case-insensitive substring search over workbook and data source
    names and descriptions. Requires `query`.
*   `test_connection`: signs in again and reports whether a session token was issued.

All tools are read-only.
";

/// Estrutura principal que implementa `ServerHandler`.
#[derive(Clone, Debug)]
pub struct McpServiceHandler {
    /// Cliente da REST API, com a sessão compartilhada.
    pub client: TableauApiClient,
}

/// Converte o desfecho da task de uma ferramenta em resultado, inclusive pânicos.
fn settle_tool_outcome(
    name: &str,
    outcome: Result<Result<CallToolResult, McpServerError>, JoinError>,
) -> CallToolResult {
    match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            tracing::warn!(error.message = %e, "Chamada de ferramenta rejeitada.");
            CallToolResult::error(vec![Content::text(format!("Error executing {name}: {e}"))])
        }
        Err(join_error) => {
            let e = McpServerError::Internal(join_error.to_string());
            tracing::error!(error.message = %e, "Handler de ferramenta abortou.");
            CallToolResult::error(vec![Content::text(format!("Error executing {name}: {e}"))])
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: JsonObject) -> Result<T, McpServerError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| McpServerError::InvalidArguments(e.to_string()))
}

impl McpServiceHandler {
    #[must_use]
    pub fn new(client: TableauApiClient) -> Self {
        Self { client }
    }

    /// Constrói as capacidades do servidor MCP.
    fn build_server_capabilities() -> ServerCapabilities {
        ServerCapabilities::builder().enable_tools().build()
    }

    async fn run_tool(
        &self,
        tool: ToolName,
        arguments: JsonObject,
    ) -> Result<CallToolResult, McpServerError> {
        let result = match tool {
            ToolName::TestConnection => catalog_tools::handle_test_connection(&self.client).await,
            ToolName::ListWorkbooks => catalog_tools::handle_list_workbooks(&self.client).await,
            ToolName::ListDataSources => catalog_tools::handle_list_data_sources(&self.client).await,
            ToolName::GetWorkbookDetails => {
                catalog_tools::handle_get_workbook_details(&self.client, parse_arguments(arguments)?)
                    .await
            }
            ToolName::SearchContent => {
                catalog_tools::handle_search_content(&self.client, parse_arguments(arguments)?).await
            }
        };
        Ok(result)
    }

    /// Executa a ferramenta `name` e sempre devolve um resultado.
    ///
    /// A execução roda numa task própria para que um pânico dentro do handler
    /// seja reportado como erro da chamada em vez de derrubar o servidor.
    #[tracing::instrument(skip(self, arguments), name = "mcp_dispatch_tool")]
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let Some(tool) = ToolName::from_name(name) else {
            tracing::warn!("Ferramenta desconhecida solicitada.");
            return CallToolResult::error(vec![Content::text(format!("Unknown tool: {name}"))]);
        };

        let start = Instant::now();
        let handler = self.clone();
        let arguments = arguments.unwrap_or_default();
        let outcome = tokio::spawn(async move { handler.run_tool(tool, arguments).await }).await;

        let result = settle_tool_outcome(name, outcome);

        let status = if result.is_error == Some(true) { "error" } else { "success" };
        crate::metrics::record_tool_call(tool.as_str(), status, start.elapsed());
        tracing::debug!(tool.status = status, duration_ms = start.elapsed().as_millis() as u64, "Chamada de ferramenta concluída.");
        result
    }
}

impl ServerHandler for McpServiceHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            server_info: Implementation::from_build_env(),
            capabilities: Self::build_server_capabilities(),
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }

    async fn call_tool(
        &self,
        request_param: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::debug!(tool.name = %request_param.name, "Recebida chamada de ferramenta MCP.");
        Ok(self.dispatch(&request_param.name, request_param.arguments).await)
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult { next_cursor: None, tools: tools::tool_definitions() })
    }
}
