// ============================================================
// CLEANING PIPELINE
// ============================================================
// decode -> preview -> clean -> preview -> encode, as one call

use std::time::Instant;

use tracing::info;

use crate::application::use_cases::preview_sampler::PreviewSampler;
use crate::application::use_cases::rule_engine::RuleEngine;
use crate::domain::error::Result;
use crate::domain::table::{CleaningConfig, CleaningResult};
use crate::infrastructure::format::FormatAdapter;

#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    adapter: FormatAdapter,
    sampler: PreviewSampler,
}

impl CleaningPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sampler(mut self, sampler: PreviewSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Clean one uploaded file.
    ///
    /// The format is chosen from `filename`. Any decode or encode failure
    /// aborts the run; nothing partial is returned.
    pub fn run(
        &self,
        bytes: &[u8],
        filename: &str,
        config: &CleaningConfig,
    ) -> Result<CleaningResult> {
        let started = Instant::now();

        let table = self.adapter.decode(bytes, filename)?;
        let before = self.sampler.sample(&table);

        let engine = RuleEngine::from_config(config);
        let cleaned = engine.apply(&table);
        let after = self.sampler.sample(&cleaned);

        let cleaned_bytes = self.adapter.encode(&cleaned, filename)?;
        let output_filename = self.adapter.output_filename(filename)?;

        info!(
            filename = %filename,
            output = %output_filename,
            rows_before = table.row_count(),
            rows_after = cleaned.row_count(),
            rules = ?engine.rule_names(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Cleaned table"
        );

        Ok(CleaningResult::new(
            before,
            after,
            cleaned_bytes,
            output_filename,
            table.row_count(),
            cleaned.row_count(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::table::Cell;
    use crate::domain::table::Table;
    use crate::infrastructure::format::{read_xlsx, XlsxWriter};

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = CleaningPipeline::new()
            .run(b"a,b\n1,2\n", "notes.txt", &CleaningConfig::all())
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_malformed_csv_is_a_parse_error() {
        let err = CleaningPipeline::new()
            .run(b"a,b\n1,2,3\n", "bad.csv", &CleaningConfig::new())
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_corrupt_workbook_is_a_parse_error() {
        let err = CleaningPipeline::new()
            .run(b"definitely not a zip", "book.xlsx", &CleaningConfig::new())
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_rules_interact_on_csv_input() {
        let csv = "name,city\n  Ann   Lee ,Oslo\n,\nAnn Lee,Oslo\nBob,  Rome\n";
        let result = CleaningPipeline::new()
            .run(csv.as_bytes(), "people.csv", &CleaningConfig::all())
            .unwrap();

        assert_eq!(result.rows_before(), 4);
        assert_eq!(result.rows_after(), 2);
        assert_eq!(result.rows_removed(), 2);
        assert_eq!(result.output_filename(), "people.csv");
        assert_eq!(
            String::from_utf8(result.cleaned_bytes().to_vec()).unwrap(),
            "name,city\nAnn Lee,Oslo\nBob,Rome\n"
        );

        assert_eq!(result.before().rows()[0].get("name"), Some("  Ann   Lee "));
        assert_eq!(result.after().rows()[0].get("name"), Some("Ann Lee"));
    }

    #[test]
    fn test_no_rules_passes_rows_through() {
        let csv = "a,b\n1,2\n1,2\n,\n";
        let result = CleaningPipeline::new()
            .run(csv.as_bytes(), "data.csv", &CleaningConfig::new())
            .unwrap();

        assert_eq!(result.rows_before(), 3);
        assert_eq!(result.rows_after(), 3);
        assert_eq!(result.cleaned_bytes(), csv.as_bytes());
    }

    #[test]
    fn test_previews_are_bounded() {
        let mut csv = String::from("id\n");
        for i in 0..1000 {
            csv.push_str(&format!("{}\n", i));
        }

        let result = CleaningPipeline::new()
            .run(csv.as_bytes(), "big.csv", &CleaningConfig::all())
            .unwrap();

        assert_eq!(result.before().len(), 10);
        assert_eq!(result.after().len(), 10);
        assert_eq!(result.rows_after(), 1000);
    }

    #[test]
    fn test_xlsx_round_trip_dedupes_numbers() {
        let table = Table::new(
            vec!["sku".to_string(), "qty".to_string()],
            vec![
                vec![Cell::text("A1"), Cell::Number(1.0)],
                vec![Cell::text("A1"), Cell::Number(1.0)],
                vec![Cell::text("B2"), Cell::Number(2.5)],
            ],
        )
        .unwrap();
        let bytes = XlsxWriter::default().write(&table).unwrap();

        let result = CleaningPipeline::new()
            .run(
                &bytes,
                "stock.xlsx",
                &CleaningConfig::new().with_remove_duplicates(true),
            )
            .unwrap();

        assert_eq!(result.rows_after(), 2);
        assert_eq!(result.output_filename(), "stock.xlsx");
        assert_eq!(&result.cleaned_bytes()[..2], b"PK");
        assert_eq!(result.after().rows()[1].get("qty"), Some("2.5"));
    }

    #[test]
    fn test_legacy_xls_is_cleaned_to_xlsx() {
        let bytes = include_bytes!("../../../tests/fixtures/legacy.xls");

        let result = CleaningPipeline::new()
            .run(
                bytes,
                "legacy.xls",
                &CleaningConfig::new().with_remove_duplicates(true),
            )
            .unwrap();

        assert_eq!(result.output_filename(), "legacy.xlsx");
        assert_eq!(result.rows_before(), 4);
        assert_eq!(result.rows_after(), 3);
        assert_eq!(result.before().rows()[0].get("qty"), Some("12"));

        let reread = read_xlsx(result.cleaned_bytes()).unwrap();
        assert_eq!(reread.columns(), ["name", "qty", "active"]);
        assert_eq!(
            reread.rows()[2],
            vec![Cell::text("washer"), Cell::Empty, Cell::Bool(false)]
        );
    }

    #[test]
    fn test_custom_preview_limit() {
        let pipeline = CleaningPipeline::new().with_sampler(PreviewSampler::new().with_limit(1));
        let result = pipeline
            .run(b"x\n1\n2\n", "small.csv", &CleaningConfig::new())
            .unwrap();
        assert_eq!(result.before().len(), 1);
    }
}
