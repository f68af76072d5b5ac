// src/api_client.rs

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

//! Chamadas autenticadas à REST API, relativas ao site atual.
//!
//! `request("workbooks", ...)` vira `{server_url}/api/{versão}/sites/{site_uuid}/workbooks`,
//! com o token de sessão no header `X-Tableau-Auth`. O sign-in acontece sob demanda.

use crate::auth::AUTH_HEADER;
use crate::error::CatalogError;
use crate::session::TableauSession;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use std::time::Instant;

/// Tamanho máximo do corpo de erro preservado em `CatalogError::RequestFailure`.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Corpo de uma resposta bem-sucedida, conforme o `Content-Type`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    Xml(String),
    Json(serde_json::Value),
}

impl ApiPayload {
    /// # Errors
    ///
    /// `CatalogError::ParseFailure` se o servidor respondeu JSON.
    pub fn into_xml(self) -> Result<String, CatalogError> {
        match self {
            Self::Xml(text) => Ok(text),
            Self::Json(_) => Err(CatalogError::ParseFailure("esperado XML, recebido JSON".to_string())),
        }
    }
}

/// Cliente da REST API. Barato de clonar.
#[derive(Debug, Clone)]
pub struct TableauApiClient {
    session: Arc<TableauSession>,
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Primeiro segmento do endpoint, usado como label de métrica (`workbooks/abc/views` → `workbooks`).
fn endpoint_kind(endpoint: &str) -> &str {
    endpoint.split('/').next().unwrap_or(endpoint)
}

impl TableauApiClient {
    #[must_use]
    pub fn new(session: Arc<TableauSession>) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<TableauSession> {
        &self.session
    }

    /// Executa uma chamada relativa ao site autenticado.
    ///
    /// Status 200 e 201 são sucesso. Corpos cujo `Content-Type` contém `xml` são
    /// devolvidos como texto; os demais são interpretados como JSON.
    ///
    /// # Errors
    ///
    /// * Erros de autenticação de [`TableauSession::ensure_authenticated`].
    /// * `CatalogError::Transport` para falhas de rede ou timeout.
    /// * `CatalogError::RequestFailure` para qualquer outro status.
    /// * `CatalogError::ParseFailure` para JSON inválido.
    #[tracing::instrument(skip(self, body), name = "tableau_api_request", fields(http.method = %method, api.endpoint = %endpoint))]
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<String>,
    ) -> Result<ApiPayload, CatalogError> {
        let site_auth = self.session.ensure_authenticated().await?;
        let url = format!(
            "{}/sites/{}/{}",
            self.session.tableau().api_base_url()?,
            site_auth.site_uuid,
            endpoint.trim_start_matches('/')
        );

        let content_type = if body.is_some() { "application/xml" } else { "application/json" };
        let mut builder = self
            .session
            .http()
            .request(method, &url)
            .header(AUTH_HEADER, &site_auth.token)
            .header(CONTENT_TYPE, content_type);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let start = Instant::now();
        let result = builder.send().await;
        let kind = endpoint_kind(endpoint);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error.message = %e, "Falha de transporte na chamada à API.");
                crate::metrics::record_api_request(kind, "transport_error", start.elapsed());
                return Err(e.into());
            }
        };

        let status = response.status();
        crate::metrics::record_api_request(kind, status.as_str(), start.elapsed());

        let is_xml = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("xml"));
        let text = response.text().await?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            tracing::warn!(http.status = status.as_u16(), "API respondeu com status de erro.");
            return Err(CatalogError::RequestFailure {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        tracing::debug!(http.status = status.as_u16(), body.length = text.len(), xml = is_xml, "Resposta recebida.");
        if is_xml {
            Ok(ApiPayload::Xml(text))
        } else {
            serde_json::from_str(&text)
                .map(ApiPayload::Json)
                .map_err(|e| CatalogError::ParseFailure(e.to_string()))
        }
    }

    /// `GET` que exige corpo XML.
    ///
    /// # Errors
    ///
    /// Ver [`TableauApiClient::request`] e [`ApiPayload::into_xml`].
    pub async fn get_xml(&self, endpoint: &str) -> Result<String, CatalogError> {
        self.request(endpoint, Method::GET, None).await?.into_xml()
    }
}
