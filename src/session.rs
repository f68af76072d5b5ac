// src/session.rs

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

//! Sessão com o Tableau Server: cliente HTTP configurado e estado de autenticação.
//!
//! Uma única `TableauSession` é criada no arranque e compartilhada (via `Arc`) por
//! todas as chamadas de ferramenta. O estado só fica `Authenticated` quando o
//! sign-in devolveu token **e** site id.

use crate::auth;
use crate::config::{self, Settings};
use crate::error::{CatalogError, McpServerError};
use reqwest::{NoProxy, Proxy};
use std::fmt;
use tokio::sync::Mutex;

/// Token de sessão e UUID do site obtidos no sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct SiteAuth {
    pub token: String,
    pub site_uuid: String,
}

impl fmt::Debug for SiteAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteAuth")
            .field("token", &"<redacted>")
            .field("site_uuid", &self.site_uuid)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AuthState {
    Unauthenticated,
    Authenticated(SiteAuth),
}

/// Resultado de uma reautenticação forçada, usado por `test_connection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReauthOutcome {
    /// O servidor devolveu um token.
    pub token_present: bool,
    /// A sessão ficou utilizável (token e site id presentes).
    pub authenticated: bool,
}

/// Cliente HTTP + estado de autenticação com o Tableau Server.
pub struct TableauSession {
    http: reqwest::Client,
    tableau: config::Tableau,
    state: Mutex<AuthState>,
}

impl fmt::Debug for TableauSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableauSession")
            .field("tableau", &self.tableau)
            .finish_non_exhaustive()
    }
}

/// Constrói o `reqwest::Client` a partir das seções `proxy` e `http`.
///
/// # Errors
///
/// `McpServerError::HttpClient` para URL de proxy inválida ou falha do builder.
pub fn build_http_client(settings: &Settings) -> Result<reqwest::Client, McpServerError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(settings.http.user_agent.clone())
        .timeout(settings.http.request_timeout);

    builder = match settings.proxy.url.as_deref().filter(|u| !u.is_empty()) {
        Some(proxy_url) => {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| McpServerError::HttpClient(format!("proxy inválido '{proxy_url}': {e}")))?
                .no_proxy(NoProxy::from_string(&settings.proxy.no_proxy));
            tracing::info!(proxy.url = %proxy_url, proxy.bypass = %settings.proxy.no_proxy, "Usando proxy de saída.");
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };

    builder.build().map_err(|e| McpServerError::HttpClient(e.to_string()))
}

impl TableauSession {
    /// Cria a sessão, ainda não autenticada. Nenhuma chamada de rede é feita aqui.
    ///
    /// # Errors
    ///
    /// Ver [`build_http_client`].
    pub fn new(settings: &Settings) -> Result<Self, McpServerError> {
        Ok(Self::with_client(build_http_client(settings)?, settings.tableau.clone()))
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, tableau: config::Tableau) -> Self {
        Self { http, tableau, state: Mutex::new(AuthState::Unauthenticated) }
    }

    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    #[must_use]
    pub fn tableau(&self) -> &config::Tableau {
        &self.tableau
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.state.lock().await, AuthState::Authenticated(_))
    }

    /// Devolve as credenciais atuais, fazendo sign-in antes se necessário.
    ///
    /// O lock é mantido durante o sign-in para que chamadas concorrentes não
    /// disparem vários logins.
    ///
    /// # Errors
    ///
    /// Erros de [`auth::sign_in`], ou `AuthenticationFailure` se a resposta não
    /// trouxe token e site id.
    pub async fn ensure_authenticated(&self) -> Result<SiteAuth, CatalogError> {
        let mut state = self.state.lock().await;
        if let AuthState::Authenticated(site_auth) = &*state {
            return Ok(site_auth.clone());
        }

        let credentials = auth::sign_in(&self.http, &self.tableau).await?;
        match (credentials.token, credentials.site_uuid) {
            (Some(token), Some(site_uuid)) => {
                let site_auth = SiteAuth { token, site_uuid };
                *state = AuthState::Authenticated(site_auth.clone());
                Ok(site_auth)
            }
            (token, _) => {
                tracing::warn!(token.present = token.is_some(), "Sign-in sem token ou sem site id.");
                Err(CatalogError::AuthenticationFailure {
                    status: None,
                    reason: "resposta de sign-in sem token ou sem site id".to_string(),
                })
            }
        }
    }

    /// Faz um novo sign-in independentemente do estado atual.
    ///
    /// Em caso de erro o estado anterior é preservado. Uma resposta parcial
    /// deixa a sessão não autenticada.
    ///
    /// # Errors
    ///
    /// Erros de [`auth::sign_in`].
    pub async fn force_reauthenticate(&self) -> Result<ReauthOutcome, CatalogError> {
        let mut state = self.state.lock().await;
        let credentials = auth::sign_in(&self.http, &self.tableau).await?;
        let token_present = credentials.token.is_some();
        *state = match (credentials.token, credentials.site_uuid) {
            (Some(token), Some(site_uuid)) => AuthState::Authenticated(SiteAuth { token, site_uuid }),
            _ => AuthState::Unauthenticated,
        };
        Ok(ReauthOutcome {
            token_present,
            authenticated: matches!(*state, AuthState::Authenticated(_)),
        })
    }

    /// Encerra a sessão no servidor, se houver uma. Falhas são apenas registradas.
    pub async fn close(&self) {
        let previous = std::mem::replace(&mut *self.state.lock().await, AuthState::Unauthenticated);
        if let AuthState::Authenticated(site_auth) = previous {
            if let Err(e) = auth::sign_out(&self.http, &self.tableau, &site_auth.token).await {
                tracing::warn!(error.message = %e, "Falha ao encerrar a sessão Tableau.");
            }
        }
    }
}
