// src/lib.rs

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

//! Tableau-MCP-Server
//!
//! Este crate define a lógica central do servidor: a manipulação do protocolo
//! MCP, a sessão autenticada com a REST API do Tableau Server, a leitura do
//! catálogo (workbooks, fontes de dados, views) e as ferramentas expostas.
//! O binário em `src/main.rs` utiliza esta biblioteca para construir e
//! executar o servidor sobre stdio.
//!
//! Módulos expostos:
//! - `config`: Carregamento e gerenciamento de configurações.
//! - `error`: Tipos de erro customizados.
//! - `auth`: Sign-in/sign-out com Personal Access Token.
//! - `session`: Cliente HTTP e estado de autenticação.
//! - `api_client`: Chamadas autenticadas relativas ao site.
//! - `catalog`: Operações de catálogo e achatamento do XML.
//! - `tools`: Parâmetros, handlers e texto das ferramentas MCP.
//! - `mcp_service_handler`: Implementação do `ServerHandler` do RMCP.
//! - `metrics`: Definição de métricas.

/// Módulo para carregamento e gerenciamento de configurações da aplicação.
pub mod config;

/// Módulo para definições de erro customizadas.
pub mod error;

/// Autenticação na REST API do Tableau.
pub mod auth;

/// Sessão compartilhada com o Tableau Server.
pub mod session;

/// Cliente da REST API.
pub mod api_client;

/// Catálogo do site: registros, XML e operações.
pub mod catalog;

/// Módulo agregador para todas as ferramentas MCP e seus parâmetros.
pub mod tools;

/// Módulo contendo o handler principal do serviço MCP e o despacho de ferramentas.
pub mod mcp_service_handler;

/// Módulo para definição e registro de métricas da aplicação (Prometheus).
pub mod metrics;
