// src/metrics.rs

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

//! Módulo para definição e registro de métricas da aplicação.
//!
//! Este módulo utiliza a crate `metrics` como uma fachada para a instrumentação
//! e define todas as métricas que serão expostas pelo `Tableau-MCP-Server`,
//! tipicamente via um exportador Prometheus (habilitado por `server.metrics_enabled`).
//! Sem exportador instalado as macros são no-op.
//!
//! As métricas são prefixadas com `tableau_mcp_server_` para fácil identificação.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, SharedString, Unit};
use std::time::Duration;

/// Prefixo global para todos os nomes de métricas expostas por esta aplicação.
pub const METRIC_PREFIX: &str = "tableau_mcp_server_";

// Contadores
pub const TOOL_CALLS_TOTAL: &str = "tool_calls_total";
pub const TABLEAU_REQUESTS_TOTAL: &str = "tableau_requests_total";
pub const SIGNIN_ATTEMPTS_TOTAL: &str = "signin_attempts_total";
// Gauges
pub const SERVER_INFO_GAUGE: &str = "info";
// Histogramas
pub const TOOL_CALL_DURATION_SECONDS: &str = "tool_call_duration_seconds";
pub const TABLEAU_REQUEST_DURATION_SECONDS: &str = "tableau_request_duration_seconds";

// Labels
pub const LABEL_TOOL_NAME: &str = "tool_name";
pub const LABEL_STATUS: &str = "status";
pub const LABEL_ENDPOINT_KIND: &str = "endpoint_kind";
pub const LABEL_VERSION: &str = "app_version";

fn metric_name(suffix: &str) -> String {
    format!("{METRIC_PREFIX}{suffix}")
}

/// Registra as descrições de todas as métricas da aplicação.
///
/// Deve ser chamada uma vez na inicialização, depois de instalar o recorder.
#[tracing::instrument(name = "register_metric_descriptions")]
pub fn register_metrics_descriptions() {
    describe_counter!(
        metric_name(TOOL_CALLS_TOTAL),
        Unit::Count,
        SharedString::from("Número total de chamadas de ferramentas MCP, com labels para nome da ferramenta e status.")
    );
    describe_counter!(
        metric_name(TABLEAU_REQUESTS_TOTAL),
        Unit::Count,
        SharedString::from("Número total de requisições à REST API do Tableau, por tipo de endpoint e status HTTP.")
    );
    describe_counter!(
        metric_name(SIGNIN_ATTEMPTS_TOTAL),
        Unit::Count,
        SharedString::from("Número total de tentativas de sign-in, com label de status ('success' ou 'failure').")
    );

    describe_gauge!(
        metric_name(SERVER_INFO_GAUGE),
        Unit::Count,
        SharedString::from("Informações sobre o servidor (versão exposta via label).")
    );

    describe_histogram!(
        metric_name(TOOL_CALL_DURATION_SECONDS),
        Unit::Seconds,
        SharedString::from("Distribuição da duração das chamadas de ferramentas MCP.")
    );
    describe_histogram!(
        metric_name(TABLEAU_REQUEST_DURATION_SECONDS),
        Unit::Seconds,
        SharedString::from("Distribuição da duração das requisições à REST API do Tableau.")
    );

    gauge!(metric_name(SERVER_INFO_GAUGE), LABEL_VERSION => env!("CARGO_PKG_VERSION")).set(1.0);

    tracing::info!("Descrições de métricas registradas com o prefixo: {}", METRIC_PREFIX);
}

/// Conta uma chamada de ferramenta e registra sua duração.
pub fn record_tool_call(tool_name: &str, status: &'static str, elapsed: Duration) {
    counter!(
        metric_name(TOOL_CALLS_TOTAL),
        LABEL_TOOL_NAME => tool_name.to_string(),
        LABEL_STATUS => status
    )
    .increment(1);
    histogram!(metric_name(TOOL_CALL_DURATION_SECONDS), LABEL_TOOL_NAME => tool_name.to_string())
        .record(elapsed.as_secs_f64());
}

/// Conta uma requisição à REST API. `status` é o código HTTP ou `transport_error`.
pub fn record_api_request(endpoint_kind: &str, status: &str, elapsed: Duration) {
    counter!(
        metric_name(TABLEAU_REQUESTS_TOTAL),
        LABEL_ENDPOINT_KIND => endpoint_kind.to_string(),
        LABEL_STATUS => status.to_string()
    )
    .increment(1);
    histogram!(metric_name(TABLEAU_REQUEST_DURATION_SECONDS), LABEL_ENDPOINT_KIND => endpoint_kind.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_sign_in(status: &'static str) {
    counter!(metric_name(SIGNIN_ATTEMPTS_TOTAL), LABEL_STATUS => status).increment(1);
}
