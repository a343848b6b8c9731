//! Finds the transfer-history table on a player page.
//!
//! Player pages are third-party, unversioned and localized, so there is no stable CSS
//! path or column order to rely on. Candidates are matched on literal header vocabulary
//! (the configured markers) instead, in document order.

use crate::error::{Result, TransferError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("static selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("static selector"));
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("static selector"));

/// Cap on `colspan` so a malformed attribute cannot blow up a row.
const MAX_COLSPAN: usize = 64;

/// Cell text of one table: the header row plus body rows, colspans expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCells {
    pub header: Vec<String>,
    pub body: Vec<Vec<String>>,
}

/// A table-bearing container and the text used to match it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub text: String,
    pub table: TableCells,
}

/// The table picked by [`locate`] and where it sat among the candidates.
#[derive(Debug, Clone)]
pub struct LocatedTable {
    pub position: usize,
    pub marker: String,
    pub cells: TableCells,
}

/// What the locator needs from a parsed page.
pub trait DocumentQuery {
    /// Table-bearing containers in document order.
    fn candidates(&self) -> Vec<Candidate>;

    /// Text of the page's primary heading, if any.
    fn primary_heading(&self) -> Option<String>;
}

/// Returns the table of the first candidate whose text contains any marker.
pub fn locate(document: &dyn DocumentQuery, markers: &[String]) -> Result<LocatedTable> {
    let markers: Vec<&String> = markers.iter().filter(|m| !m.trim().is_empty()).collect();
    let candidates = document.candidates();
    debug!("Scanning {} candidate containers", candidates.len());

    for (position, candidate) in candidates.into_iter().enumerate() {
        if let Some(marker) = markers.iter().find(|m| candidate.text.contains(m.as_str())) {
            debug!("Container {} matched marker '{}'", position, marker);
            return Ok(LocatedTable {
                position,
                marker: marker.to_string(),
                cells: candidate.table,
            });
        }
    }

    warn!("No container matched markers {:?}; the page structure may have changed", markers);
    Err(TransferError::TableNotFound {
        markers: markers.into_iter().cloned().collect(),
    })
}

/// [`DocumentQuery`] over an HTML page.
pub struct HtmlDocument {
    html: Html,
    container_selector: Selector,
}

impl HtmlDocument {
    pub fn parse(body: &str, container_selector: &str) -> Result<Self> {
        let container_selector = Selector::parse(container_selector).map_err(|e| {
            TransferError::Config(format!("Invalid container selector '{}': {}", container_selector, e))
        })?;
        Ok(Self {
            html: Html::parse_document(body),
            container_selector,
        })
    }

    fn first_table<'a>(container: ElementRef<'a>) -> Option<ElementRef<'a>> {
        if container.value().name() == "table" {
            return Some(container);
        }
        container.select(&TABLE).next()
    }
}

impl DocumentQuery for HtmlDocument {
    fn candidates(&self) -> Vec<Candidate> {
        self.html
            .select(&self.container_selector)
            .filter_map(|container| {
                let table = Self::first_table(container)?;
                Some(Candidate {
                    text: element_text(container),
                    table: table_cells(table),
                })
            })
            .collect()
    }

    fn primary_heading(&self) -> Option<String> {
        self.html
            .select(&HEADING)
            .map(element_text)
            .find(|text| !text.is_empty())
    }
}

/// Whitespace-collapsed text content of an element.
pub fn element_text(element: ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rows that belong to `table` itself, not to a table nested inside it.
fn own_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    table
        .select(&ROW)
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "table")
                .map(|el| el.id() == table.id())
                .unwrap_or(false)
        })
        .collect()
}

fn in_thead(row: ElementRef) -> bool {
    row.parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.value().name() == "thead")
        .unwrap_or(false)
}

fn cells<'a>(row: ElementRef<'a>, tag: Option<&str>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| match tag {
            Some(tag) => cell.value().name() == tag,
            None => matches!(cell.value().name(), "td" | "th"),
        })
        .collect()
}

fn row_text(row: ElementRef) -> Vec<String> {
    let mut out = Vec::new();
    for cell in cells(row, None) {
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_COLSPAN);
        let text = element_text(cell);
        out.extend(std::iter::repeat(text).take(span));
    }
    out
}

/// Header is the first `thead` row, else the first row with `th` cells, else the first row.
/// Body rows are the remaining rows with at least one `td`.
pub fn table_cells(table: ElementRef) -> TableCells {
    let rows = own_rows(table);

    let header_idx = rows
        .iter()
        .position(|row| in_thead(*row))
        .or_else(|| rows.iter().position(|row| !cells(*row, Some("th")).is_empty()))
        .or(if rows.is_empty() { None } else { Some(0) });

    let Some(header_idx) = header_idx else {
        return TableCells::default();
    };

    let header = row_text(rows[header_idx]);
    let body = rows
        .iter()
        .enumerate()
        .filter(|(idx, row)| *idx != header_idx && !in_thead(**row) && !cells(**row, Some("td")).is_empty())
        .map(|(_, row)| row_text(*row))
        .collect();

    TableCells { header, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubDocument(Vec<Candidate>);

    impl DocumentQuery for StubDocument {
        fn candidates(&self) -> Vec<Candidate> {
            self.0.clone()
        }

        fn primary_heading(&self) -> Option<String> {
            None
        }
    }

    fn candidate(text: &str, header: &[&str]) -> Candidate {
        Candidate {
            text: text.to_string(),
            table: TableCells {
                header: header.iter().map(|s| s.to_string()).collect(),
                body: vec![],
            },
        }
    }

    fn markers() -> Vec<String> {
        vec!["Season".to_string(), "Saison".to_string()]
    }

    #[test]
    fn test_earlier_matching_container_wins() {
        let doc = StubDocument(vec![
            candidate("Market value history", &["Date"]),
            candidate("Saison Verein", &["first"]),
            candidate("Season Club", &["second"]),
        ]);

        let located = locate(&doc, &markers()).unwrap();
        assert_eq!(located.position, 1);
        assert_eq!(located.marker, "Saison");
        assert_eq!(located.cells.header, vec!["first"]);
    }

    #[test]
    fn test_no_match_is_not_found() {
        let doc = StubDocument(vec![candidate("Stats", &["Games"])]);
        let result = locate(&doc, &markers());
        match result {
            Err(TransferError::TableNotFound { markers }) => assert_eq!(markers.len(), 2),
            other => panic!("expected TableNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_document_is_not_found() {
        let doc = StubDocument(vec![]);
        assert!(matches!(locate(&doc, &markers()), Err(TransferError::TableNotFound { .. })));
    }

    #[test]
    fn test_html_candidates_skip_containers_without_table() {
        let html = r#"
            <html><body>
              <h1>  Lionel
                 Messi </h1>
              <div class="box"><h2>Season summary</h2><p>no table here</p></div>
              <div class="box"><h2>Stats</h2><table><tr><th>Games</th></tr><tr><td>10</td></tr></table></div>
              <div class="box"><h2>Transfer history</h2>
                <table>
                  <thead><tr><th>Season</th><th colspan="2">Joined</th><th>Fee</th></tr></thead>
                  <tbody>
                    <tr><td>10/11</td><td><img/></td><td>FC Barcelona</td><td>€1.00m</td></tr>
                  </tbody>
                </table>
              </div>
            </body></html>
        "#;
        let doc = HtmlDocument::parse(html, "div.box").unwrap();

        assert_eq!(doc.primary_heading().as_deref(), Some("Lionel Messi"));
        assert_eq!(doc.candidates().len(), 2);

        let located = locate(&doc, &markers()).unwrap();
        assert_eq!(located.position, 1);
        assert_eq!(located.cells.header, vec!["Season", "Joined", "Joined", "Fee"]);
        assert_eq!(located.cells.body, vec![vec!["10/11", "", "FC Barcelona", "€1.00m"]]);
    }

    #[test]
    fn test_table_cells_without_thead_ignores_nested_rows() {
        let html = r#"
            <table id="outer">
              <tr><th>Season</th><th>Club</th></tr>
              <tr><td>10/11</td><td><table><tr><td>inner</td></tr></table></td></tr>
              <tr><td colspan="2">Total transfer income</td></tr>
            </table>
        "#;
        let doc = HtmlDocument::parse(html, "table#outer").unwrap();
        let candidates = doc.candidates();
        assert_eq!(candidates.len(), 1);

        let cells = &candidates[0].table;
        assert_eq!(cells.header, vec!["Season", "Club"]);
        assert_eq!(cells.body.len(), 2);
        assert_eq!(cells.body[0], vec!["10/11", "inner"]);
        assert_eq!(cells.body[1], vec!["Total transfer income", "Total transfer income"]);
    }

    #[test]
    fn test_invalid_container_selector_is_config_error() {
        let result = HtmlDocument::parse("<html></html>", "div[");
        assert!(matches!(result, Err(TransferError::Config(_))));
    }
}
