// tests/integration/search_tests.rs

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

//! Testes da ferramenta `search_content`.

use crate::common::{text_of, ts_response, MockTableau};
use anyhow::Result;
use serde_json::json;

const WORKBOOKS: &str = r#"<workbooks>
  <workbook id="wb1" name="Sales Dashboard"><project id="p1" name="Finance"/></workbook>
  <workbook id="wb2" name="Inventory" description="Warehouse SALES by region"><project id="p2" name="Ops"/></workbook>
  <workbook id="wb3" name="Marketing"/>
</workbooks>"#;

const DATA_SOURCES: &str = r#"<datasources>
  <datasource id="ds1" name="salesforce extract" type="salesforce"/>
  <datasource id="ds2" name="HR"/>
</datasources>"#;

fn query(q: &str) -> Option<rmcp::model::JsonObject> {
    json!({ "query": q }).as_object().cloned()
}

#[tokio::test]
async fn test_search_matches_case_insensitively_and_shows_lowercased_query() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau.serve_xml("workbooks", &ts_response(WORKBOOKS)).await;
    tableau.serve_xml("datasources", &ts_response(DATA_SOURCES)).await;

    let result = tableau.handler().dispatch("search_content", query("Sales")).await;
    assert_ne!(result.is_error, Some(true));
    assert_eq!(
        text_of(&result),
        "**📊 Workbooks matching 'sales':**\n   • Sales Dashboard (Project: Finance)\n   • Inventory (Project: Ops)\n\n**🗄️ Data Sources matching 'sales':**\n   • salesforce extract (Type: salesforce)"
    );
    Ok(())
}

#[tokio::test]
async fn test_search_without_matches_is_not_an_error() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau.serve_xml("workbooks", &ts_response(WORKBOOKS)).await;
    tableau.serve_xml("datasources", &ts_response(DATA_SOURCES)).await;

    let result = tableau.handler().dispatch("search_content", query("Zzz")).await;
    assert_ne!(result.is_error, Some(true));
    assert_eq!(text_of(&result), "No content found matching 'zzz'");
    Ok(())
}

#[tokio::test]
async fn test_search_continues_when_one_collection_fails() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau.serve_status("workbooks", 500).await;
    tableau.serve_xml("datasources", &ts_response(DATA_SOURCES)).await;

    let result = tableau.handler().dispatch("search_content", query("sales")).await;
    assert_ne!(result.is_error, Some(true));
    assert_eq!(
        text_of(&result),
        "\n**🗄️ Data Sources matching 'sales':**\n   • salesforce extract (Type: salesforce)"
    );
    Ok(())
}

#[tokio::test]
async fn test_search_fails_when_both_collections_fail() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.reject_sign_in(401).await;

    let result = tableau.handler().dispatch("search_content", query("sales")).await;
    assert_eq!(result.is_error, Some(true));
    assert!(text_of(&result).starts_with("❌ Unable to retrieve content: "));
    Ok(())
}

#[tokio::test]
async fn test_search_requires_query_argument() -> Result<()> {
    let tableau = MockTableau::start().await;

    let result = tableau
        .handler()
        .dispatch("search_content", json!({ "q": "sales" }).as_object().cloned())
        .await;
    assert_eq!(result.is_error, Some(true));
    assert!(text_of(&result).starts_with("Error executing search_content: Argumentos inválidos: "));
    Ok(())
}
