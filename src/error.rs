// src/error.rs

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

//! Define os tipos de erro customizados para o `Tableau-MCP-Server` e utilitários
//! para conversão e tratamento de erros.
//!
//! `CatalogError` cobre tudo o que pode falhar entre uma ferramenta e a REST API
//! do Tableau. `McpServerError` é o erro da aplicação como um todo (configuração,
//! I/O, inicialização). Nenhum dos dois atravessa a fronteira das ferramentas:
//! lá eles viram um `CallToolResult` marcado como erro.

use thiserror::Error;

/// Erros da cadeia ferramenta → catálogo → API → autenticação.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Credenciais (Personal Access Token) ausentes na configuração.
    #[error("Credenciais ausentes: {0}")]
    Configuration(String),

    /// O servidor rejeitou o sign-in ou a resposta não trouxe credenciais utilizáveis.
    #[error("Falha de autenticação{}: {reason}", status_suffix(.status))]
    AuthenticationFailure {
        /// Status HTTP devolvido, quando houve resposta.
        status: Option<u16>,
        /// Descrição da falha.
        reason: String,
    },

    /// A API respondeu com um status diferente de 200/201.
    #[error("Requisição falhou com HTTP {status}: {body}")]
    RequestFailure {
        /// Status HTTP devolvido.
        status: u16,
        /// Corpo da resposta (possivelmente truncado).
        body: String,
    },

    /// Falha de transporte (rede, DNS, TLS, timeout).
    #[error("Erro de transporte: {0}")]
    Transport(String),

    /// Resposta malformada (XML ou JSON inválido).
    #[error("Resposta malformada: {0}")]
    ParseFailure(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl CatalogError {
    /// Categoria curta usada em logs e labels de métricas.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::AuthenticationFailure { .. } => "authentication",
            Self::RequestFailure { .. } | Self::Transport(_) => "request",
            Self::ParseFailure(_) => "parse",
        }
    }

    /// `true` para falhas que degradam para um resultado vazio em vez de um erro visível.
    #[must_use]
    pub const fn is_parse_failure(&self) -> bool {
        matches!(self, Self::ParseFailure(_))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<roxmltree::Error> for CatalogError {
    fn from(err: roxmltree::Error) -> Self {
        Self::ParseFailure(err.to_string())
    }
}

/// Enum principal para erros específicos da aplicação `Tableau-MCP-Server`.
#[derive(Error, Debug)]
pub enum McpServerError {
    /// Erro ao carregar ou processar as configurações da aplicação.
    #[error("Erro de configuração: {0}")]
    Configuration(#[from] config::ConfigError),

    /// Erro vindo da camada de catálogo.
    #[error("Erro do catálogo Tableau: {0}")]
    Catalog(#[from] CatalogError),

    /// Erro genérico de I/O.
    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Erro ao construir o cliente HTTP (proxy inválido, TLS...).
    #[error("Erro no cliente HTTP: {0}")]
    HttpClient(String),

    /// Argumentos de ferramenta que não casam com o schema declarado.
    #[error("Argumentos inválidos: {0}")]
    InvalidArguments(String),

    /// Erro interno inesperado no servidor.
    #[error("Erro interno do servidor: {0}")]
    Internal(String),
}
