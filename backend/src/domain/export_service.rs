//! Export service domain logic.
//!
//! Renders stored recaps as CSV, oldest period first, with one column per
//! persisted recap value.

use anyhow::{anyhow, Context};
use chrono::Local;
use tracing::info;

use crate::domain::commands::export::ExportRecapsResult;
use crate::domain::errors::RecapError;
use crate::domain::models::recap::MonthlyRecap;
use crate::storage::repositories::RecapRepository;
use crate::storage::DbConnection;

const CSV_HEADER: [&str; 17] = [
    "id",
    "month",
    "year",
    "period",
    "opening_balance",
    "total_income",
    "total_expense",
    "closing_balance",
    "spp_income",
    "registration_income",
    "mentor_payment_expense",
    "operational_expense",
    "total_students",
    "total_mentors",
    "generated_by",
    "generated_by_name",
    "generated_at",
];

/// Export service that renders recaps for download
#[derive(Clone)]
pub struct ExportService {
    recap_repository: RecapRepository,
}

impl ExportService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            recap_repository: RecapRepository::new(db),
        }
    }

    /// Export the recaps of one year, or of every year, as CSV
    pub async fn export_recaps_csv(&self, year: Option<i32>) -> Result<ExportRecapsResult, RecapError> {
        info!("Exporting recaps as CSV for year: {:?}", year);
        let context = year.map(|y| y.to_string()).unwrap_or_else(|| "all years".to_string());

        let result: Result<_, RecapError> = async {
            let recaps = self.recap_repository.list_chronological(year).await?;
            let csv_content = render_csv(&recaps)?;
            let filename = export_filename(year, &Local::now().format("%Y%m%d").to_string());

            info!("Exported {} recaps to {}", recaps.len(), filename);
            Ok(ExportRecapsResult {
                csv_content,
                filename,
                recap_count: recaps.len(),
            })
        }
        .await;

        result.map_err(|e| {
            e.log("Recap export", &context);
            e
        })
    }
}

fn export_filename(year: Option<i32>, date_stamp: &str) -> String {
    let scope = year.map(|y| y.to_string()).unwrap_or_else(|| "all".to_string());
    format!("monthly_recaps_{}_{}.csv", scope, date_stamp)
}

fn render_csv(recaps: &[MonthlyRecap]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for recap in recaps {
        let f = &recap.figures;
        writer.write_record([
            recap.id.to_string(),
            recap.period.month().to_string(),
            recap.period.year().to_string(),
            recap.period.to_string(),
            f.opening_balance.to_string(),
            f.total_income.to_string(),
            f.total_expense.to_string(),
            f.closing_balance.to_string(),
            f.spp_income.to_string(),
            f.registration_income.to_string(),
            f.mentor_payment_expense.to_string(),
            f.operational_expense.to_string(),
            f.total_students.to_string(),
            f.total_mentors.to_string(),
            recap.generated_by.map(|id| id.to_string()).unwrap_or_default(),
            recap.generated_by_name.clone().unwrap_or_default(),
            recap.generated_at.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::recaps::GenerateRecapCommand;
    use crate::domain::recap_service::RecapService;
    use crate::storage::test_utils;

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(Some(2025), "20250301"), "monthly_recaps_2025_20250301.csv");
        assert_eq!(export_filename(None, "20250301"), "monthly_recaps_all_20250301.csv");
    }

    #[tokio::test]
    async fn test_export_recaps_csv() {
        let db = DbConnection::init_test().await.unwrap();
        let recap_service = RecapService::new(db.clone());
        let export_service = ExportService::new(db.clone());
        let admin = test_utils::insert_user(&db, "bendahara", "Bendahara, Masjid").await;
        test_utils::insert_transaction(&db, "2025-02-10", "income", "spp", 250_000).await;

        for (month, year) in [(2, 2025), (12, 2024), (1, 2025)] {
            recap_service
                .generate(GenerateRecapCommand {
                    month,
                    year,
                    force_regenerate: false,
                    generated_by: Some(admin),
                })
                .await
                .unwrap();
        }

        let all = export_service.export_recaps_csv(None).await.unwrap();
        assert_eq!(all.recap_count, 3);
        assert!(all.filename.starts_with("monthly_recaps_all_"));

        let mut reader = csv::Reader::from_reader(all.csv_content.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), CSV_HEADER.len());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][3], "December 2024");
        assert_eq!(&rows[2][3], "February 2025");
        assert_eq!(&rows[2][7], "250000");
        // Quoted by the writer because of the comma
        assert_eq!(&rows[0][15], "Bendahara, Masjid");

        let only_2025 = export_service.export_recaps_csv(Some(2025)).await.unwrap();
        assert_eq!(only_2025.recap_count, 2);
        assert!(only_2025.filename.starts_with("monthly_recaps_2025_"));
    }

    #[tokio::test]
    async fn test_export_with_no_recaps_has_header_only() {
        let db = DbConnection::init_test().await.unwrap();
        let export_service = ExportService::new(db);

        let export = export_service.export_recaps_csv(Some(2020)).await.unwrap();
        assert_eq!(export.recap_count, 0);
        assert_eq!(export.csv_content.lines().count(), 1);
    }
}
