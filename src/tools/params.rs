// src/tools/params.rs

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

//! Define as estruturas de parâmetros de entrada das ferramentas MCP
//! expostas pelo `Tableau-MCP-Server`.
//!
//! Cada struct é desserializada a partir de `CallToolRequestParam.arguments` e
//! também gera o `input_schema` da ferramenta via `#[derive(JsonSchema)]`.
//! Os nomes dos campos no JSON são snake_case (`workbook_name`, `workbook_id`).

// rmcp v0.1.5 reexporta serde e schemars. Usamos estas reexportações.
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

/// Parâmetros para a ferramenta `get_workbook_details`.
///
/// Ao menos um dos campos deve estar presente. Se ambos vierem, o id prevalece.
#[derive(Deserialize, JsonSchema, Debug, Clone, Default, PartialEq, Eq)]
pub struct GetWorkbookDetailsParams {
    #[schemars(description = "Name of the workbook (case-insensitive exact match).")]
    #[serde(default)]
    pub workbook_name: Option<String>,
    #[schemars(description = "ID of the workbook. Takes precedence over workbook_name.")]
    #[serde(default)]
    pub workbook_id: Option<String>,
}

/// Parâmetros para a ferramenta `search_content`.
#[derive(Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct SearchContentParams {
    /// Texto procurado em nomes e descrições.
    #[schemars(description = "Search query to match against workbook and data source names and descriptions.")]
    pub query: String,
}
