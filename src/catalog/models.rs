// src/catalog/models.rs

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

//! Registros planos do catálogo Tableau.
//!
//! Cada registro é produzido pela camada XML a partir de um elemento da REST API,
//! já com os valores padrão aplicados (ver [`crate::catalog::xml`]). Campos
//! opcionais que o servidor pode omitir ficam como `Option` e são renderizados
//! como `Unknown` pelas ferramentas.

/// Um workbook publicado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Tamanho em bytes, como texto (o servidor devolve string).
    pub size: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Nome do projeto dono do workbook, ou `Unknown`.
    pub project: String,
    /// Nome do usuário dono do workbook, ou `Unknown`.
    pub owner: String,
}

/// Uma fonte de dados publicada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Tipo do conector (ex: `postgres`, `excel-direct`).
    pub datasource_type: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub project: String,
}

/// Uma planilha ou dashboard de um workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub id: String,
    pub name: String,
    pub content_url: Option<String>,
    pub view_url_name: Option<String>,
}

/// Workbook acompanhado das suas views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookDetail {
    pub workbook: Workbook,
    pub views: Vec<View>,
}

impl WorkbookDetail {
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }
}

/// Comparação usada por `search_content`: substring, sem diferenciar maiúsculas,
/// em nome ou descrição. `needle_lower` já deve estar em minúsculas.
fn matches_lowercase(name: &str, description: &str, needle_lower: &str) -> bool {
    name.to_lowercase().contains(needle_lower) || description.to_lowercase().contains(needle_lower)
}

impl Workbook {
    #[must_use]
    pub fn matches(&self, needle_lower: &str) -> bool {
        matches_lowercase(&self.name, &self.description, needle_lower)
    }
}

impl DataSource {
    #[must_use]
    pub fn matches(&self, needle_lower: &str) -> bool {
        matches_lowercase(&self.name, &self.description, needle_lower)
    }
}
