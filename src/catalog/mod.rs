// src/catalog/mod.rs

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

//! Operações de leitura sobre o catálogo do site: workbooks, fontes de dados e views.
//!
//! As funções `fetch_*` distinguem "a requisição falhou" (`Err`) de "não há nada"
//! (`Ok` vazio). Respostas XML malformadas são registradas e tratadas como vazias.
//! As variantes `list_*`/`get_*` descartam o erro e devolvem vazio ou `None`.

pub mod models;
pub mod xml;

use crate::api_client::TableauApiClient;
use crate::error::CatalogError;
use models::{DataSource, Workbook, WorkbookDetail};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Caracteres escapados num segmento de caminho (RFC 3986, `pchar`).
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Converte falha de parsing em coleção vazia; demais erros seguem adiante.
fn empty_on_parse_failure<T>(
    result: Result<Vec<T>, CatalogError>,
    collection: &str,
) -> Result<Vec<T>, CatalogError> {
    match result {
        Err(e) if e.is_parse_failure() => {
            tracing::warn!(catalog.collection = collection, error.message = %e, "Resposta malformada tratada como vazia.");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Todos os workbooks visíveis no site.
///
/// # Errors
///
/// Falhas de autenticação, configuração ou requisição.
#[tracing::instrument(skip(client), name = "catalog_fetch_workbooks")]
pub async fn fetch_workbooks(client: &TableauApiClient) -> Result<Vec<Workbook>, CatalogError> {
    let parsed = client.get_xml("workbooks").await.and_then(|body| xml::parse_workbooks(&body));
    let workbooks = empty_on_parse_failure(parsed, "workbooks")?;
    tracing::debug!(catalog.count = workbooks.len(), "Workbooks obtidos.");
    Ok(workbooks)
}

/// Como [`fetch_workbooks`], mas qualquer falha vira lista vazia.
pub async fn list_workbooks(client: &TableauApiClient) -> Vec<Workbook> {
    fetch_workbooks(client).await.unwrap_or_else(|e| {
        tracing::error!(error.message = %e, "Falha ao listar workbooks.");
        Vec::new()
    })
}

/// Todas as fontes de dados publicadas no site.
///
/// # Errors
///
/// Falhas de autenticação, configuração ou requisição.
#[tracing::instrument(skip(client), name = "catalog_fetch_data_sources")]
pub async fn fetch_data_sources(client: &TableauApiClient) -> Result<Vec<DataSource>, CatalogError> {
    let parsed = client.get_xml("datasources").await.and_then(|body| xml::parse_data_sources(&body));
    let sources = empty_on_parse_failure(parsed, "datasources")?;
    tracing::debug!(catalog.count = sources.len(), "Fontes de dados obtidas.");
    Ok(sources)
}

/// Como [`fetch_data_sources`], mas qualquer falha vira lista vazia.
pub async fn list_data_sources(client: &TableauApiClient) -> Vec<DataSource> {
    fetch_data_sources(client).await.unwrap_or_else(|e| {
        tracing::error!(error.message = %e, "Falha ao listar fontes de dados.");
        Vec::new()
    })
}

/// Metadados de um workbook e suas views.
///
/// `Ok(None)` quando a resposta do workbook não contém o elemento ou está
/// malformada, e também quando a lista de views está malformada. Se a requisição
/// de views falhar, o detalhe é devolvido sem views.
///
/// # Errors
///
/// Falhas de autenticação, configuração ou requisição ao buscar o workbook.
#[tracing::instrument(skip(client), name = "catalog_fetch_workbook_details")]
pub async fn fetch_workbook_details(
    client: &TableauApiClient,
    workbook_id: &str,
) -> Result<Option<WorkbookDetail>, CatalogError> {
    let encoded_id = encode_segment(workbook_id);
    let body = client.get_xml(&format!("workbooks/{encoded_id}")).await?;

    let workbook = match xml::parse_workbook(&body) {
        Ok(Some(workbook)) => workbook,
        Ok(None) => {
            tracing::info!("Resposta sem elemento workbook.");
            return Ok(None);
        }
        Err(e) => {
            tracing::warn!(error.message = %e, "Detalhe do workbook malformado.");
            return Ok(None);
        }
    };

    let views = match client.get_xml(&format!("workbooks/{encoded_id}/views")).await {
        Ok(views_body) => match xml::parse_views(&views_body) {
            Ok(views) => views,
            Err(e) => {
                tracing::warn!(error.message = %e, "Lista de views malformada.");
                return Ok(None);
            }
        },
        Err(e) => {
            tracing::warn!(error.message = %e, "Falha ao buscar views; detalhe segue sem views.");
            Vec::new()
        }
    };

    Ok(Some(WorkbookDetail { workbook, views }))
}

/// Como [`fetch_workbook_details`], mas qualquer falha vira `None`.
pub async fn get_workbook_details(client: &TableauApiClient, workbook_id: &str) -> Option<WorkbookDetail> {
    fetch_workbook_details(client, workbook_id).await.unwrap_or_else(|e| {
        tracing::error!(error.message = %e, "Falha ao obter detalhes do workbook.");
        None
    })
}

/// Primeiro workbook cujo nome é igual a `name`, sem diferenciar maiúsculas.
#[must_use]
pub fn find_workbook_by_name<'a>(workbooks: &'a [Workbook], name: &str) -> Option<&'a Workbook> {
    let wanted = name.to_lowercase();
    workbooks.iter().find(|wb| wb.name.to_lowercase() == wanted)
}

/// Itens que casam com uma busca, na ordem do servidor.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchMatches<'a> {
    pub workbooks: Vec<&'a Workbook>,
    pub data_sources: Vec<&'a DataSource>,
}

impl SearchMatches<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workbooks.is_empty() && self.data_sources.is_empty()
    }
}

/// Filtra por substring, sem diferenciar maiúsculas, em nome ou descrição.
/// Uma consulta vazia casa com tudo.
#[must_use]
pub fn search<'a>(workbooks: &'a [Workbook], data_sources: &'a [DataSource], query: &str) -> SearchMatches<'a> {
    let needle = query.to_lowercase();
    SearchMatches {
        workbooks: workbooks.iter().filter(|wb| wb.matches(&needle)).collect(),
        data_sources: data_sources.iter().filter(|ds| ds.matches(&needle)).collect(),
    }
}
