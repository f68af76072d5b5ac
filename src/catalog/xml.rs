// src/catalog/xml.rs

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

//! Achatamento das respostas XML da REST API do Tableau em registros planos.
//!
//! As respostas usam o namespace `http://tableau.com/api`; a busca por elementos
//! compara apenas o nome local, então documentos com ou sem namespace funcionam.
//!
//! Tabela de valores padrão aplicada aqui:
//!
//! | Campo                         | Ausente vira |
//! |-------------------------------|--------------|
//! | `id`, `name`, `description`   | `""`         |
//! | `size`                        | `"0"`        |
//! | `createdAt`, `updatedAt`      | `None`       |
//! | `project`, `owner` (aninhados)| `"Unknown"`  |
//! | `type`, `contentUrl`, ...     | `None`       |

use super::models::{DataSource, View, Workbook};
use crate::error::CatalogError;
use roxmltree::{Document, Node};

/// Valor usado quando um projeto/dono aninhado não existe.
pub const UNKNOWN: &str = "Unknown";
/// Tamanho assumido quando o atributo `size` não existe.
pub const DEFAULT_SIZE: &str = "0";

fn parse_document(xml: &str) -> Result<Document<'_>, CatalogError> {
    Ok(Document::parse(xml)?)
}

/// Todos os elementos descendentes (incluindo a raiz) com o nome local `tag`, em ordem de documento.
fn elements<'a, 'input: 'a>(
    doc: &'a Document<'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    doc.descendants().filter(move |n| n.is_element() && n.has_tag_name(tag))
}

fn attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

fn attr_or_empty(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

/// Atributo `name` do primeiro descendente `tag`, ou [`UNKNOWN`].
fn nested_name(node: Node<'_, '_>, tag: &str) -> String {
    node.descendants()
        .skip(1)
        .find(|n| n.is_element() && n.has_tag_name(tag))
        .and_then(|n| n.attribute("name"))
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn workbook_from_node(node: Node<'_, '_>) -> Workbook {
    Workbook {
        id: attr_or_empty(node, "id"),
        name: attr_or_empty(node, "name"),
        description: attr_or_empty(node, "description"),
        size: node.attribute("size").unwrap_or(DEFAULT_SIZE).to_string(),
        created_at: attr(node, "createdAt"),
        updated_at: attr(node, "updatedAt"),
        project: nested_name(node, "project"),
        owner: nested_name(node, "owner"),
    }
}

fn data_source_from_node(node: Node<'_, '_>) -> DataSource {
    DataSource {
        id: attr_or_empty(node, "id"),
        name: attr_or_empty(node, "name"),
        description: attr_or_empty(node, "description"),
        datasource_type: attr(node, "type"),
        created_at: attr(node, "createdAt"),
        updated_at: attr(node, "updatedAt"),
        project: nested_name(node, "project"),
    }
}

fn view_from_node(node: Node<'_, '_>) -> View {
    View {
        id: attr_or_empty(node, "id"),
        name: attr_or_empty(node, "name"),
        content_url: attr(node, "contentUrl"),
        view_url_name: attr(node, "viewUrlName"),
    }
}

/// Todos os elementos `workbook` do documento.
///
/// # Errors
///
/// `CatalogError::ParseFailure` se o XML estiver malformado.
pub fn parse_workbooks(xml: &str) -> Result<Vec<Workbook>, CatalogError> {
    let doc = parse_document(xml)?;
    let workbooks = elements(&doc, "workbook").map(workbook_from_node).collect();
    Ok(workbooks)
}

/// Todos os elementos `datasource` do documento.
///
/// # Errors
///
/// `CatalogError::ParseFailure` se o XML estiver malformado.
pub fn parse_data_sources(xml: &str) -> Result<Vec<DataSource>, CatalogError> {
    let doc = parse_document(xml)?;
    let sources = elements(&doc, "datasource").map(data_source_from_node).collect();
    Ok(sources)
}

/// Primeiro elemento `workbook` do documento, se existir.
///
/// # Errors
///
/// `CatalogError::ParseFailure` se o XML estiver malformado.
pub fn parse_workbook(xml: &str) -> Result<Option<Workbook>, CatalogError> {
    let doc = parse_document(xml)?;
    let first = elements(&doc, "workbook").next().map(workbook_from_node);
    Ok(first)
}

/// Todos os elementos `view` do documento.
///
/// # Errors
///
/// `CatalogError::ParseFailure` se o XML estiver malformado.
pub fn parse_views(xml: &str) -> Result<Vec<View>, CatalogError> {
    let doc = parse_document(xml)?;
    let views = elements(&doc, "view").map(view_from_node).collect();
    Ok(views)
}

/// Par (token, site id) extraído de uma resposta de sign-in. Qualquer um pode faltar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInCredentials {
    pub token: Option<String>,
    pub site_uuid: Option<String>,
}

/// Lê `credentials@token` e `credentials/site@id`.
///
/// # Errors
///
/// `CatalogError::ParseFailure` se o XML estiver malformado.
pub fn parse_signin_credentials(xml: &str) -> Result<SignInCredentials, CatalogError> {
    let doc = parse_document(xml)?;
    let Some(credentials) = elements(&doc, "credentials").next() else {
        return Ok(SignInCredentials::default());
    };
    let site_uuid = credentials
        .children()
        .find(|n| n.is_element() && n.has_tag_name("site"))
        .and_then(|site| attr(site, "id"));
    Ok(SignInCredentials { token: attr(credentials, "token"), site_uuid })
}
