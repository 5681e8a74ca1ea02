use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::DateTime;

use crate::core::error::{AppError, Result};
use crate::features::categories::CategoryService;
use crate::features::reports::dtos::{CreateReportWithImagesDto, ReportPayloadDto};
use crate::shared::validation::parse_catalog_date;

/// Content types accepted for spreadsheet uploads
pub const EXCEL_CONTENT_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

const CATALOG_DATE_FORMAT: &str = "%Y/%m/%d";

pub fn is_excel_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_lowercase();
    EXCEL_CONTENT_TYPES.contains(&content_type.as_str())
}

/// Derive a report url from its title.
///
/// Everything after the first "market" is dropped, a leading "global " is removed
/// and words are joined with hyphens: "Global Widget Market Size 2024" gives
/// "widget-market".
pub fn derive_url_slug(title: &str) -> String {
    let lower = title.to_lowercase();
    let head = match lower.find("market") {
        Some(pos) => &lower[..pos + "market".len()],
        None => lower.as_str(),
    };

    head.replace("global ", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Format a millisecond Unix timestamp as `YYYY/MM/DD` (UTC)
pub fn epoch_millis_to_date(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.format(CATALOG_DATE_FORMAT).to_string())
}

/// One spreadsheet row keyed by lowercased header name
struct SheetRow {
    sheet: String,
    /// 1-based row number as shown in the spreadsheet
    number: usize,
    cells: HashMap<String, Data>,
}

impl SheetRow {
    fn location(&self) -> String {
        format!("Sheet '{}' row {}", self.sheet, self.number)
    }

    fn get(&self, column: &str) -> Option<&Data> {
        self.cells.get(column).filter(|d| !matches!(d, Data::Empty))
    }

    fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(cell_text)
    }

    fn text_or_empty(&self, column: &str) -> String {
        self.text(column).unwrap_or_default()
    }
}

/// Render a cell as text; integral numbers print without a fraction
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some((*f as i64).to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format(CATALOG_DATE_FORMAT).to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Turns uploaded spreadsheets into payloads for bulk report creation
pub struct ExcelImportService {
    category_service: Arc<CategoryService>,
}

impl ExcelImportService {
    pub fn new(category_service: Arc<CategoryService>) -> Self {
        Self { category_service }
    }

    /// Convert every row of every worksheet into a report creation payload
    pub async fn generate_payload(&self, data: Vec<u8>) -> Result<Vec<CreateReportWithImagesDto>> {
        let rows = tokio::task::spawn_blocking(move || read_rows(data))
            .await
            .map_err(|e| AppError::Internal(format!("Spreadsheet reader task failed: {}", e)))??;

        let categories = self.category_service.name_index().await?;

        let payload = rows
            .iter()
            .map(|row| build_payload(row, &categories))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Generated {} report payloads from spreadsheet", payload.len());
        Ok(payload)
    }
}

fn read_rows(data: Vec<u8>) -> Result<Vec<SheetRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))
        .map_err(|e| AppError::BadRequest(format!("Unable to read spreadsheet: {}", e)))?;

    let mut rows = Vec::new();
    for sheet in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet).map_err(|e| {
            AppError::BadRequest(format!("Unable to read sheet '{}': {}", sheet, e))
        })?;

        let mut sheet_rows = range.rows();
        let Some(header) = sheet_rows.next() else {
            continue;
        };
        let columns: Vec<String> = header
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default().trim().to_lowercase())
            .collect();

        for (index, cells) in sheet_rows.enumerate() {
            if cells.iter().all(|c| matches!(c, Data::Empty)) {
                continue;
            }

            let cells = columns
                .iter()
                .zip(cells.iter())
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, cell)| (name.clone(), cell.clone()))
                .collect();

            rows.push(SheetRow {
                sheet: sheet.clone(),
                // header is row 1
                number: index + 2,
                cells,
            });
        }
    }

    Ok(rows)
}

fn whole_category_id(row: &SheetRow, id: f64) -> Result<i32> {
    if id.fract() != 0.0 || id < 1.0 || id > f64::from(i32::MAX) {
        return Err(AppError::BadRequest(format!(
            "{}: category_id {} is not a whole number",
            row.location(),
            id
        )));
    }
    Ok(id as i32)
}

fn build_payload(
    row: &SheetRow,
    categories: &HashMap<String, i32>,
) -> Result<CreateReportWithImagesDto> {
    let title = row
        .text("title")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{}: title is required", row.location())))?;

    let created_date = match row.get("created_date") {
        Some(Data::Float(millis)) => epoch_millis_to_date(*millis as i64),
        Some(Data::Int(millis)) => epoch_millis_to_date(*millis),
        Some(cell) => cell_text(cell).map(|s| s.trim().to_string()),
        None => None,
    }
    .ok_or_else(|| {
        AppError::BadRequest(format!("{}: created_date is required", row.location()))
    })?;
    if parse_catalog_date(&created_date).is_none() {
        return Err(AppError::BadRequest(format!(
            "{}: created_date '{}' is not a valid date",
            row.location(),
            created_date
        )));
    }

    let category_id = match row.get("category_id") {
        Some(Data::Float(id)) => Some(whole_category_id(row, *id)?),
        Some(Data::Int(id)) => Some(i32::try_from(*id).map_err(|_| {
            AppError::BadRequest(format!("{}: category_id {} is out of range", row.location(), id))
        })?),
        Some(cell) => {
            let name = cell_text(cell).unwrap_or_default();
            let id = categories.get(&name.trim().to_lowercase()).copied();
            if id.is_none() {
                return Err(AppError::BadRequest(format!(
                    "{}: unknown category '{}'",
                    row.location(),
                    name.trim()
                )));
            }
            id
        }
        None => None,
    }
    .ok_or_else(|| AppError::BadRequest(format!("{}: category_id is required", row.location())))?;

    let description = row.text("description");
    let first_line = description
        .as_deref()
        .map(|d| d.lines().next().unwrap_or_default().to_string());

    let report = ReportPayloadDto {
        url: derive_url_slug(&title),
        title,
        category_id,
        summary: first_line
            .clone()
            .unwrap_or_else(|| row.text_or_empty("summary")),
        meta_desc: first_line.unwrap_or_else(|| row.text_or_empty("meta_desc")),
        description: description.unwrap_or_default(),
        toc: row.text_or_empty("toc"),
        highlights: row.text_or_empty("highlights"),
        faqs: row.text_or_empty("faqs"),
        meta_title: row.text_or_empty("meta_title"),
        meta_keyword: row.text_or_empty("meta_keyword"),
        pages: row.text_or_empty("pages"),
        cover_img: row.text_or_empty("cover_img"),
        created_date,
    };

    Ok(CreateReportWithImagesDto {
        report,
        images: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> HashMap<String, i32> {
        HashMap::from([("analytics".to_string(), 1), ("services".to_string(), 5)])
    }

    fn row(cells: Vec<(&str, Data)>) -> SheetRow {
        SheetRow {
            sheet: "Sheet1".to_string(),
            number: 2,
            cells: cells
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    #[test]
    fn test_derive_url_slug() {
        assert_eq!(derive_url_slug("Global Widget Market"), "widget-market");
        assert_eq!(
            derive_url_slug("Global Lithium Battery Market Size, Share 2024"),
            "lithium-battery-market"
        );
        assert_eq!(derive_url_slug("Smart Home  Devices"), "smart-home-devices");
    }

    #[test]
    fn test_derived_slugs_are_hyphenated_market_names() {
        use fake::faker::lorem::en::Words;
        use fake::Fake;

        for _ in 0..20 {
            let words: Vec<String> = Words(1..4).fake();
            let slug = derive_url_slug(&format!("Global {} Market Outlook", words.join(" ")));
            assert!(slug.ends_with("-market"), "{}", slug);
            assert!(!slug.contains(' '));
            assert!(!slug.starts_with("global"));
        }
    }

    #[test]
    fn test_epoch_millis_to_date() {
        assert_eq!(
            epoch_millis_to_date(1_709_942_400_000).as_deref(),
            Some("2024/03/09")
        );
    }

    #[test]
    fn test_excel_content_types() {
        assert!(is_excel_content_type(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
        assert!(is_excel_content_type("application/vnd.ms-excel"));
        assert!(!is_excel_content_type("text/csv"));
    }

    #[test]
    fn test_cell_text_drops_integral_fraction() {
        assert_eq!(cell_text(&Data::Float(250.0)).as_deref(), Some("250"));
        assert_eq!(cell_text(&Data::Float(2.5)).as_deref(), Some("2.5"));
        assert_eq!(cell_text(&Data::Empty), None);
    }

    #[test]
    fn test_build_payload_from_row() {
        let row = row(vec![
            ("title", Data::String("Global Widget Market".to_string())),
            ("category_id", Data::String("Analytics".to_string())),
            ("pages", Data::Float(180.0)),
            ("created_date", Data::Float(1_709_942_400_000.0)),
            (
                "description",
                Data::String("Widgets are growing.\nMore detail here.".to_string()),
            ),
        ]);

        let payload = build_payload(&row, &categories()).unwrap();
        let report = payload.report;
        assert_eq!(report.url, "widget-market");
        assert_eq!(report.category_id, 1);
        assert_eq!(report.pages, "180");
        assert_eq!(report.created_date, "2024/03/09");
        assert_eq!(report.summary, "Widgets are growing.");
        assert_eq!(report.meta_desc, "Widgets are growing.");
        assert_eq!(report.faqs, "");
        assert_eq!(report.cover_img, "");
        assert!(payload.images.is_empty());
    }

    #[test]
    fn test_category_name_is_case_insensitive() {
        let row = row(vec![
            ("title", Data::String("Consulting Services Market".to_string())),
            ("category_id", Data::String(" SERVICES ".to_string())),
            ("created_date", Data::String("2024/01/15".to_string())),
        ]);

        let payload = build_payload(&row, &categories()).unwrap();
        assert_eq!(payload.report.category_id, 5);
        assert_eq!(payload.report.created_date, "2024/01/15");
    }

    #[test]
    fn test_unknown_category_names_the_row() {
        let row = row(vec![
            ("title", Data::String("Global Widget Market".to_string())),
            ("category_id", Data::String("Astrology".to_string())),
            ("created_date", Data::String("2024/01/15".to_string())),
        ]);

        match build_payload(&row, &categories()) {
            Err(AppError::BadRequest(msg)) => {
                assert!(msg.contains("row 2"));
                assert!(msg.contains("Astrology"));
            }
            other => panic!("expected bad request, got {:?}", other.map(|p| p.report.url)),
        }
    }

    #[test]
    fn test_numeric_category_is_an_id() {
        let row = row(vec![
            ("title", Data::String("Global Widget Market".to_string())),
            ("category_id", Data::Float(22.0)),
            ("created_date", Data::String("2024/01/15".to_string())),
        ]);

        assert_eq!(build_payload(&row, &categories()).unwrap().report.category_id, 22);
    }

    #[test]
    fn test_fractional_category_id_is_rejected() {
        let row = row(vec![
            ("title", Data::String("Global Widget Market".to_string())),
            ("category_id", Data::Float(22.7)),
            ("created_date", Data::String("2024/01/15".to_string())),
        ]);

        match build_payload(&row, &categories()) {
            Err(AppError::BadRequest(msg)) => {
                assert!(msg.contains("row 2"));
                assert!(msg.contains("22.7"));
            }
            other => panic!("expected bad request, got {:?}", other.map(|p| p.report.url)),
        }
    }

    #[test]
    fn test_unparseable_date_text_names_the_row() {
        let row = row(vec![
            ("title", Data::String("Global Widget Market".to_string())),
            ("category_id", Data::String("Analytics".to_string())),
            ("created_date", Data::String("03/09/2024".to_string())),
        ]);

        match build_payload(&row, &categories()) {
            Err(AppError::BadRequest(msg)) => {
                assert!(msg.contains("Sheet 'Sheet1' row 2"));
                assert!(msg.contains("03/09/2024"));
            }
            other => panic!("expected bad request, got {:?}", other.map(|p| p.report.url)),
        }
    }

    #[test]
    fn test_unreadable_workbook_is_bad_request() {
        assert!(matches!(
            read_rows(b"not a spreadsheet".to_vec()),
            Err(AppError::BadRequest(_))
        ));
    }
}
