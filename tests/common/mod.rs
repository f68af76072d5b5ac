// tests/common/mod.rs

// Licença Apache 2.0
// Copyright 2025 Guilherme Leste
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Utilitários compartilhados pelos testes de integração.
//!
//! [`MockTableau`] sobe um `wiremock::MockServer` que responde como a REST API
//! do Tableau: sign-in devolve o token `T1` para o site `S1` e os endpoints de
//! catálogo ficam sob `/api/3.19/sites/S1/`.

use std::sync::Arc;

use rmcp::model::CallToolResult;
use tableau_mcp_server_lib::{
    api_client::TableauApiClient, config, mcp_service_handler::McpServiceHandler,
    session::TableauSession,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_VERSION: &str = "3.19";
pub const SITE_CONTENT_URL: &str = "finance";
pub const TOKEN: &str = "T1";
pub const SITE_UUID: &str = "S1";

pub const SIGNIN_OK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tsResponse xmlns="http://tableau.com/api">
  <credentials token="T1" estimatedTimeToExpiration="240:00:00">
    <site id="S1" contentUrl="finance"/>
    <user id="u1"/>
  </credentials>
</tsResponse>"#;

/// Envolve os elementos informados num `tsResponse` com namespace.
pub fn ts_response(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><tsResponse xmlns="http://tableau.com/api">{inner}</tsResponse>"#
    )
}

/// Resposta XML como o Tableau envia (o content type define o parsing).
pub fn xml_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/xml;charset=UTF-8")
}

/// Texto concatenado de todos os blocos de um resultado.
pub fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tableau Server simulado.
pub struct MockTableau {
    pub server: MockServer,
}

impl MockTableau {
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Caminho absoluto de um endpoint relativo ao site.
    pub fn site_path(endpoint: &str) -> String {
        format!("/api/{API_VERSION}/sites/{SITE_UUID}/{endpoint}")
    }

    /// Sign-in bem-sucedido, esperado exatamente `times` vezes.
    pub async fn expect_sign_in(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/api/{API_VERSION}/auth/signin")))
            .respond_with(ResponseTemplate::new(200).set_body_string(SIGNIN_OK))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Sign-in bem-sucedido, sem limite de chamadas.
    pub async fn allow_sign_in(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/api/{API_VERSION}/auth/signin")))
            .respond_with(ResponseTemplate::new(200).set_body_string(SIGNIN_OK))
            .mount(&self.server)
            .await;
    }

    pub async fn reject_sign_in(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/api/{API_VERSION}/auth/signin")))
            .respond_with(ResponseTemplate::new(status).set_body_string("<error/>"))
            .mount(&self.server)
            .await;
    }

    /// `GET` autenticado em `endpoint` devolvendo `body` como XML.
    pub async fn serve_xml(&self, endpoint: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(Self::site_path(endpoint)))
            .and(header("X-Tableau-Auth", TOKEN))
            .respond_with(xml_response(body))
            .mount(&self.server)
            .await;
    }

    pub async fn serve_status(&self, endpoint: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(Self::site_path(endpoint)))
            .respond_with(ResponseTemplate::new(status).set_body_string("falha simulada"))
            .mount(&self.server)
            .await;
    }

    pub fn tableau_config(&self) -> config::Tableau {
        config::Tableau {
            server_url: self.uri(),
            site_id: SITE_CONTENT_URL.to_string(),
            api_version: API_VERSION.to_string(),
            token_name: Some("integration".to_string()),
            token_value: Some("segredo".to_string()),
        }
    }

    /// Cliente da API apontando para este servidor, sem proxy.
    pub fn client(&self) -> TableauApiClient {
        Self::client_for(self.tableau_config())
    }

    pub fn client_for(tableau: config::Tableau) -> TableauApiClient {
        let http = reqwest::Client::builder().no_proxy().build().expect("cliente HTTP de teste");
        TableauApiClient::new(Arc::new(TableauSession::with_client(http, tableau)))
    }

    pub fn handler(&self) -> McpServiceHandler {
        McpServiceHandler::new(self.client())
    }
}
