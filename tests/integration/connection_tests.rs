// tests/integration/connection_tests.rs

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

//! Testes de conexão: `test_connection` e reaproveitamento da sessão.

use crate::common::{text_of, MockTableau, SITE_CONTENT_URL};
use anyhow::Result;
use tableau_mcp_server_lib::tools::render;
use tracing::info;

#[tokio::test]
async fn test_connection_reports_success_and_token() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.expect_sign_in(1).await;

    let result = tableau.handler().dispatch("test_connection", None).await;
    info!("Resposta de test_connection: {}", text_of(&result));

    assert_ne!(result.is_error, Some(true));
    assert_eq!(
        text_of(&result),
        format!(
            "✅ Successfully connected to {}\nSite: {SITE_CONTENT_URL}\nAuth Token: Present",
            tableau.uri()
        )
    );
    Ok(())
}

#[tokio::test]
async fn test_connection_signs_in_again_on_every_call() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.expect_sign_in(2).await;
    let handler = tableau.handler();

    for _ in 0..2 {
        let result = handler.dispatch("test_connection", None).await;
        assert!(text_of(&result).ends_with("Auth Token: Present"));
    }
    // `expect(2)` é verificado no drop do MockServer.
    Ok(())
}

#[tokio::test]
async fn test_connection_failure_is_error_result() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.reject_sign_in(401).await;

    let result = tableau.handler().dispatch("test_connection", None).await;
    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), render::CONNECTION_FAILED);
    Ok(())
}

#[tokio::test]
async fn test_catalog_calls_reuse_one_sign_in() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.expect_sign_in(1).await;
    tableau.serve_xml("workbooks", &crate::common::ts_response("<workbooks/>")).await;
    tableau.serve_xml("datasources", &crate::common::ts_response("<datasources/>")).await;
    let handler = tableau.handler();

    let workbooks = handler.dispatch("list_workbooks", None).await;
    let data_sources = handler.dispatch("list_data_sources", None).await;

    assert_eq!(text_of(&workbooks), render::NO_WORKBOOKS);
    assert_eq!(text_of(&data_sources), render::NO_DATA_SOURCES);
    assert!(handler.client.session().is_authenticated().await);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_share_a_single_sign_in() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.expect_sign_in(1).await;
    tableau
        .serve_xml(
            "workbooks",
            &crate::common::ts_response(r#"<workbooks><workbook id="wb1" name="Orders"/></workbooks>"#),
        )
        .await;
    let handler = tableau.handler();

    let mut calls = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let handler = handler.clone();
        calls.spawn(async move { handler.dispatch("list_workbooks", None).await });
    }

    let mut finished = 0;
    while let Some(joined) = calls.join_next().await {
        let result = joined?;
        assert_ne!(result.is_error, Some(true), "{}", text_of(&result));
        assert!(text_of(&result).contains("📊 **Orders**"));
        finished += 1;
    }
    assert_eq!(finished, 8);
    tableau.server.verify().await;
    Ok(())
}

#[tokio::test]
async fn test_close_signs_out_authenticated_session() -> Result<()> {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    Mock::given(method("POST"))
        .and(path("/api/3.19/auth/signout"))
        .and(header("X-Tableau-Auth", crate::common::TOKEN))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&tableau.server)
        .await;

    let client = tableau.client();
    client.session().ensure_authenticated().await?;
    client.session().close().await;
    assert!(!client.session().is_authenticated().await);
    Ok(())
}
