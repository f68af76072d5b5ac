// src/auth.rs

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

//! Autenticação na REST API do Tableau via Personal Access Token.
//!
//! `sign_in` troca o par nome/segredo do token por um token de sessão e pelo id
//! (UUID) do site; `sign_out` invalida o token de sessão. O estado da sessão
//! (token atual, reautenticação) fica em [`crate::session`].

use crate::catalog::xml::{parse_signin_credentials, SignInCredentials};
use crate::config;
use crate::error::CatalogError;
use quick_xml::escape::escape;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

/// Header que carrega o token de sessão nas chamadas autenticadas.
pub const AUTH_HEADER: &str = "X-Tableau-Auth";

/// Corpo XML do `POST /auth/signin`.
#[must_use]
pub fn build_signin_body(token_name: &str, token_secret: &str, site_content_url: &str) -> String {
    format!(
        "<tsRequest><credentials personalAccessTokenName=\"{}\" personalAccessTokenSecret=\"{}\"><site contentUrl=\"{}\" /></credentials></tsRequest>",
        escape(token_name),
        escape(token_secret),
        escape(site_content_url)
    )
}

/// Executa o sign-in com as credenciais configuradas.
///
/// Uma resposta 200 pode trazer credenciais parciais (token sem site id, por
/// exemplo); quem chama decide o que fazer com elas.
///
/// # Errors
///
/// * `CatalogError::Configuration` se nome ou segredo do token estiverem ausentes
///   ou se `server_url` for inválida.
/// * `CatalogError::AuthenticationFailure` para status diferente de 200, falha de
///   transporte ou corpo malformado.
#[tracing::instrument(skip(http, tableau), name = "tableau_sign_in", fields(site.content_url = %tableau.site_id))]
pub async fn sign_in(
    http: &reqwest::Client,
    tableau: &config::Tableau,
) -> Result<SignInCredentials, CatalogError> {
    let result = perform_sign_in(http, tableau).await;
    crate::metrics::record_sign_in(if result.is_ok() { "success" } else { "failure" });
    result
}

async fn perform_sign_in(
    http: &reqwest::Client,
    tableau: &config::Tableau,
) -> Result<SignInCredentials, CatalogError> {
    let Some((token_name, token_secret)) = tableau.credentials() else {
        tracing::error!("Nome/segredo do Personal Access Token não configurados.");
        return Err(CatalogError::Configuration(
            "tableau.token_name e tableau.token_value são obrigatórios".to_string(),
        ));
    };

    let url = format!("{}/auth/signin", tableau.api_base_url()?);
    let body = build_signin_body(token_name, token_secret, &tableau.site_id);

    let response = http
        .post(&url)
        .header(CONTENT_TYPE, "application/xml")
        .body(body)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error.message = %e, "Falha de transporte durante o sign-in.");
            CatalogError::AuthenticationFailure { status: None, reason: e.to_string() }
        })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| CatalogError::AuthenticationFailure {
        status: Some(status.as_u16()),
        reason: e.to_string(),
    })?;

    if status != StatusCode::OK {
        tracing::error!(http.status = status.as_u16(), "Sign-in rejeitado pelo servidor.");
        return Err(CatalogError::AuthenticationFailure {
            status: Some(status.as_u16()),
            reason: text,
        });
    }

    let credentials = parse_signin_credentials(&text).map_err(|e| {
        tracing::error!(error.message = %e, "Resposta de sign-in malformada.");
        CatalogError::AuthenticationFailure { status: Some(status.as_u16()), reason: e.to_string() }
    })?;

    tracing::info!(
        token.present = credentials.token.is_some(),
        site.uuid_present = credentials.site_uuid.is_some(),
        "Sign-in concluído."
    );
    Ok(credentials)
}

/// Invalida o token de sessão no servidor.
///
/// # Errors
///
/// `CatalogError::Transport` ou `CatalogError::RequestFailure` se o servidor não confirmar.
#[tracing::instrument(skip_all, name = "tableau_sign_out")]
pub async fn sign_out(
    http: &reqwest::Client,
    tableau: &config::Tableau,
    token: &str,
) -> Result<(), CatalogError> {
    let url = format!("{}/auth/signout", tableau.api_base_url()?);
    let response = http.post(&url).header(AUTH_HEADER, token).send().await?;
    let status = response.status();
    if status.is_success() {
        tracing::info!("Sessão Tableau encerrada.");
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(http.status = status.as_u16(), "Sign-out não confirmado pelo servidor.");
        Err(CatalogError::RequestFailure { status: status.as_u16(), body })
    }
}
