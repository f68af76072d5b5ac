// src/tools/mod.rs

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

//! Módulo agregador das ferramentas MCP do `Tableau-MCP-Server`.
//!
//! Define o registro das cinco ferramentas (nome, descrição e `input_schema`);
//! a execução fica em [`catalog_tools`] e o texto de saída em [`render`].

/// Handlers das ferramentas de catálogo e de conexão.
pub mod catalog_tools;

/// Parâmetros de entrada das ferramentas.
pub mod params;

/// Formatação do texto devolvido ao cliente.
pub mod render;

use rmcp::model::{JsonObject, Tool};
use rmcp::schemars::{self, JsonSchema};
use std::sync::Arc;

/// As ferramentas expostas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListWorkbooks,
    ListDataSources,
    GetWorkbookDetails,
    SearchContent,
    TestConnection,
}

impl ToolName {
    pub const ALL: [Self; 5] = [
        Self::ListWorkbooks,
        Self::ListDataSources,
        Self::GetWorkbookDetails,
        Self::SearchContent,
        Self::TestConnection,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListWorkbooks => "list_workbooks",
            Self::ListDataSources => "list_data_sources",
            Self::GetWorkbookDetails => "get_workbook_details",
            Self::SearchContent => "search_content",
            Self::TestConnection => "test_connection",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ListWorkbooks => "List all workbooks available on the Tableau Server site",
            Self::ListDataSources => "List all data sources available on the Tableau Server site",
            Self::GetWorkbookDetails => {
                "Get detailed information about a specific workbook, including its views"
            }
            Self::SearchContent => "Search for workbooks and data sources by name or description",
            Self::TestConnection => "Test the connection to Tableau Server",
        }
    }

    fn input_schema(self) -> JsonObject {
        match self {
            Self::GetWorkbookDetails => schema_object::<params::GetWorkbookDetailsParams>(),
            Self::SearchContent => schema_object::<params::SearchContentParams>(),
            Self::ListWorkbooks | Self::ListDataSources | Self::TestConnection => empty_object_schema(),
        }
    }
}

fn empty_object_schema() -> JsonObject {
    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), serde_json::Value::String("object".to_string()));
    schema.insert("properties".to_string(), serde_json::Value::Object(JsonObject::new()));
    schema
}

fn schema_object<T: JsonSchema>() -> JsonObject {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(serde_json::Value::Object(schema)) => schema,
        other => {
            tracing::error!(schema.result = ?other, "Schema de parâmetros não é um objeto JSON.");
            empty_object_schema()
        }
    }
}

/// Definições expostas em `tools/list`.
#[must_use]
pub fn tool_definitions() -> Vec<Tool> {
    ToolName::ALL
        .into_iter()
        .map(|tool| Tool::new(tool.as_str(), tool.description(), Arc::new(tool.input_schema())))
        .collect()
}
