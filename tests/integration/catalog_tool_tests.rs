// tests/integration/catalog_tool_tests.rs

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

//! Testes das ferramentas de listagem e de detalhe de workbook.

use crate::common::{text_of, ts_response, MockTableau};
use anyhow::Result;
use serde_json::json;
use tableau_mcp_server_lib::{
    catalog::{self, models::Workbook},
    mcp_service_handler::McpServiceHandler,
    tools::render,
};

const WORKBOOKS: &str = r#"<pagination pageNumber="1" pageSize="100" totalAvailable="3"/>
<workbooks>
  <workbook id="wb-sales" name="Sales Report" description="Quarterly sales" size="2048"
            createdAt="2024-01-02T10:00:00Z" updatedAt="2024-03-04T12:30:00Z">
    <project id="p1" name="Finance"/>
    <owner id="u1" name="ana"/>
  </workbook>
  <workbook id="wb-copy" name="sales report copy">
    <project id="p1" name="Finance"/>
  </workbook>
  <workbook id="wb-ops" name="Operations">
    <project id="p2" name="Ops"/>
  </workbook>
</workbooks>"#;

const SALES_DETAIL: &str = r#"<workbook id="wb-sales" name="Sales Report" description="Quarterly sales" size="2048">
  <project id="p1" name="Finance"/>
  <owner id="u1" name="ana"/>
</workbook>"#;

const SALES_VIEWS: &str = r#"<views>
  <view id="v1" name="Overview" contentUrl="SalesReport/sheets/Overview"/>
  <view id="v2" name="By Region" contentUrl="SalesReport/sheets/ByRegion"/>
</views>"#;

async fn tableau_with_sales() -> MockTableau {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau.serve_xml("workbooks", &ts_response(WORKBOOKS)).await;
    tableau.serve_xml("workbooks/wb-sales", &ts_response(SALES_DETAIL)).await;
    tableau.serve_xml("workbooks/wb-sales/views", &ts_response(SALES_VIEWS)).await;
    tableau
}

#[tokio::test]
async fn test_list_workbooks_fills_missing_fields_with_defaults() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau
        .serve_xml("workbooks", &ts_response(r#"<workbooks><workbook id="wb1" name="Orders"/></workbooks>"#))
        .await;

    let result = tableau.handler().dispatch("list_workbooks", None).await;
    assert_ne!(result.is_error, Some(true));

    let host = tableau.uri().trim_start_matches("http://").to_string();
    assert_eq!(
        text_of(&result),
        format!(
            "Found 1 workbooks on {host}:\n\n📊 **Orders**\n   Project: Unknown\n   Owner: Unknown\n   Updated: Unknown\n   Size: 0 bytes\n"
        )
    );

    let workbooks = catalog::fetch_workbooks(&tableau.client()).await?;
    assert_eq!(
        workbooks,
        vec![Workbook {
            id: "wb1".to_string(),
            name: "Orders".to_string(),
            description: String::new(),
            size: "0".to_string(),
            created_at: None,
            updated_at: None,
            project: "Unknown".to_string(),
            owner: "Unknown".to_string(),
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_credentials_in_server_url_stay_out_of_tool_text() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau
        .serve_xml("workbooks", &ts_response(r#"<workbooks><workbook id="wb1" name="Orders"/></workbooks>"#))
        .await;

    let mut config = tableau.tableau_config();
    config.server_url = tableau.uri().replacen("http://", "http://svc:p4ss@", 1);
    let handler = McpServiceHandler::new(MockTableau::client_for(config));

    let listing = text_of(&handler.dispatch("list_workbooks", None).await);
    let host = tableau.uri().trim_start_matches("http://").to_string();
    assert!(listing.starts_with(&format!("Found 1 workbooks on {host}:")), "{listing}");
    assert!(!listing.contains("p4ss"));

    let connection = text_of(&handler.dispatch("test_connection", None).await);
    assert!(connection.starts_with(&format!("✅ Successfully connected to {}\n", tableau.uri())), "{connection}");
    assert!(!connection.contains("p4ss"));
    Ok(())
}

#[tokio::test]
async fn test_list_workbooks_renders_project_owner_and_update() -> Result<()> {
    let tableau = tableau_with_sales().await;

    let text = text_of(&tableau.handler().dispatch("list_workbooks", None).await);
    assert!(text.starts_with("Found 3 workbooks on "));
    assert!(text.contains(
        "📊 **Sales Report**\n   Project: Finance\n   Owner: ana\n   Updated: 2024-03-04T12:30:00Z\n   Size: 2048 bytes\n"
    ));
    assert!(text.contains("📊 **Operations**\n   Project: Ops\n"));
    Ok(())
}

#[tokio::test]
async fn test_malformed_catalog_is_reported_as_empty() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau.serve_xml("workbooks", "<tsResponse><workbooks>").await;
    tableau.serve_xml("datasources", "isto não é xml").await;
    let handler = tableau.handler();

    let workbooks = handler.dispatch("list_workbooks", None).await;
    assert_ne!(workbooks.is_error, Some(true));
    assert_eq!(text_of(&workbooks), render::NO_WORKBOOKS);

    let data_sources = handler.dispatch("list_data_sources", None).await;
    assert_eq!(text_of(&data_sources), render::NO_DATA_SOURCES);
    Ok(())
}

#[tokio::test]
async fn test_failed_listing_is_error_result_but_degrades_to_empty_in_catalog() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau.serve_status("workbooks", 500).await;
    tableau.serve_status("datasources", 403).await;

    let result = tableau.handler().dispatch("list_workbooks", None).await;
    assert_eq!(result.is_error, Some(true));
    assert!(text_of(&result).starts_with("❌ Unable to retrieve workbooks: "));

    let client = tableau.client();
    assert!(catalog::list_workbooks(&client).await.is_empty());
    assert!(catalog::list_data_sources(&client).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_list_data_sources_renders_type_and_project() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau
        .serve_xml(
            "datasources",
            &ts_response(
                r#"<datasources>
                     <datasource id="ds1" name="Orders DB" type="postgres" updatedAt="2024-05-01T00:00:00Z">
                       <project id="p1" name="Finance"/>
                     </datasource>
                     <datasource id="ds2" name="Legacy Extract"/>
                   </datasources>"#,
            ),
        )
        .await;

    let text = text_of(&tableau.handler().dispatch("list_data_sources", None).await);
    assert!(text.starts_with("Found 2 data sources:\n\n"));
    assert!(text.contains(
        "🗄️ **Orders DB**\n   Type: postgres\n   Project: Finance\n   Updated: 2024-05-01T00:00:00Z\n"
    ));
    assert!(text.contains("🗄️ **Legacy Extract**\n   Type: Unknown\n   Project: Unknown\n   Updated: Unknown\n"));
    Ok(())
}

#[tokio::test]
async fn test_details_by_exact_name_ignores_case_and_prefix_matches() -> Result<()> {
    let tableau = tableau_with_sales().await;

    let arguments = json!({"workbook_name": "SALES REPORT"});
    let result = tableau
        .handler()
        .dispatch("get_workbook_details", arguments.as_object().cloned())
        .await;

    assert_ne!(result.is_error, Some(true));
    let text = text_of(&result);
    assert!(text.starts_with("📊 **Workbook Details: Sales Report**"));
    assert!(text.contains("**Worksheets & Dashboards (2):**\n   📋 Overview\n   📋 By Region\n"));
    assert!(text.contains("**Description:** Quarterly sales"));
    assert!(!text.contains("sales report copy"));
    Ok(())
}

#[tokio::test]
async fn test_details_by_id_skips_name_lookup() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau.serve_xml("workbooks/wb-sales", &ts_response(SALES_DETAIL)).await;
    tableau.serve_xml("workbooks/wb-sales/views", &ts_response(SALES_VIEWS)).await;

    // Sem mock para /workbooks: uma busca por nome falharia.
    let arguments = json!({"workbook_id": "wb-sales", "workbook_name": "Something Else"});
    let result = tableau
        .handler()
        .dispatch("get_workbook_details", arguments.as_object().cloned())
        .await;

    assert_ne!(result.is_error, Some(true));
    assert!(text_of(&result).contains("**Size:** 2048 bytes"));

    let detail = catalog::get_workbook_details(&tableau.client(), "wb-sales").await;
    assert_eq!(detail.map(|d| d.view_count()), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_details_for_unknown_name_reports_not_found() -> Result<()> {
    let tableau = tableau_with_sales().await;

    let arguments = json!({"workbook_name": "Sales"});
    let result = tableau
        .handler()
        .dispatch("get_workbook_details", arguments.as_object().cloned())
        .await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), "❌ Workbook 'Sales' not found.");
    Ok(())
}

#[tokio::test]
async fn test_details_without_views_endpoint_still_render() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau.serve_xml("workbooks/wb-sales", &ts_response(SALES_DETAIL)).await;
    tableau.serve_status("workbooks/wb-sales/views", 500).await;

    let arguments = json!({"workbook_id": "wb-sales"});
    let result = tableau
        .handler()
        .dispatch("get_workbook_details", arguments.as_object().cloned())
        .await;

    assert_ne!(result.is_error, Some(true));
    assert!(text_of(&result).contains("**Worksheets & Dashboards (0):**"));
    Ok(())
}

#[tokio::test]
async fn test_details_for_missing_workbook_are_unavailable() -> Result<()> {
    let tableau = MockTableau::start().await;
    tableau.allow_sign_in().await;
    tableau.serve_status("workbooks/nope", 404).await;

    let arguments = json!({"workbook_id": "nope"});
    let result = tableau
        .handler()
        .dispatch("get_workbook_details", arguments.as_object().cloned())
        .await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), render::DETAILS_UNAVAILABLE);
    assert!(catalog::get_workbook_details(&tableau.client(), "nope").await.is_none());
    Ok(())
}
