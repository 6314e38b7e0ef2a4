use shared::{
    AnnualSummaryResponse, CompareRecapsResponse, ExportRecapsResponse, FieldDifference,
    GenerateRangeResponse, GenerateRecapResponse, MonthlyRecap, PageInfo, RecapListResponse, Trend,
};

use crate::domain::commands::export::ExportRecapsResult;
use crate::domain::commands::recaps::{
    BatchGenerationResult, CompareRecapsResult, GenerateRecapResult, PageInfo as DomainPageInfo,
    RecapPage,
};
use crate::domain::models::comparison::{FieldComparison, Trend as DomainTrend};
use crate::domain::models::recap::MonthlyRecap as DomainRecap;
use crate::domain::models::statistics::AnnualSummary;

pub struct RecapMapper;

impl RecapMapper {
    /// Convert a domain recap to its DTO
    pub fn to_dto(recap: DomainRecap) -> MonthlyRecap {
        let f = recap.figures;
        MonthlyRecap {
            id: recap.id,
            month: recap.period.month(),
            year: recap.period.year(),
            period_label: recap.period.to_string(),
            opening_balance: f.opening_balance,
            total_income: f.total_income,
            total_expense: f.total_expense,
            closing_balance: f.closing_balance,
            spp_income: f.spp_income,
            registration_income: f.registration_income,
            mentor_payment_expense: f.mentor_payment_expense,
            operational_expense: f.operational_expense,
            total_students: f.total_students,
            total_mentors: f.total_mentors,
            generated_by: recap.generated_by,
            generated_by_name: recap.generated_by_name,
            generated_at: recap.generated_at,
        }
    }

    pub fn to_generate_response(result: GenerateRecapResult) -> GenerateRecapResponse {
        let regenerated = result.regenerated();
        GenerateRecapResponse {
            success: true,
            message: result.message,
            recap: Self::to_dto(result.recap),
            regenerated,
        }
    }

    pub fn to_list_response(page: RecapPage) -> RecapListResponse {
        RecapListResponse {
            success: true,
            recaps: page.recaps.into_iter().map(Self::to_dto).collect(),
            pagination: Self::page_info_to_dto(page.page_info),
        }
    }

    fn page_info_to_dto(info: DomainPageInfo) -> PageInfo {
        PageInfo {
            current_page: info.current_page,
            per_page: info.per_page,
            total_records: info.total_records,
            total_pages: info.total_pages,
        }
    }

    pub fn to_range_response(result: BatchGenerationResult) -> GenerateRangeResponse {
        let error_count = result.error_count();
        GenerateRangeResponse {
            success: error_count == 0,
            message: format!(
                "Generated {} of {} recaps ({} failed)",
                result.success_count, result.total_periods, error_count
            ),
            total_periods: result.total_periods,
            success_count: result.success_count,
            error_count,
            errors: result.errors,
        }
    }

    pub fn to_compare_response(result: CompareRecapsResult) -> CompareRecapsResponse {
        let comparison = result.comparison;
        CompareRecapsResponse {
            success: true,
            differences: comparison
                .differences
                .iter()
                .map(Self::difference_to_dto)
                .collect(),
            period1: Self::to_dto(comparison.first),
            period2: Self::to_dto(comparison.second),
        }
    }

    fn difference_to_dto(difference: &FieldComparison) -> FieldDifference {
        FieldDifference {
            field: difference.field.name().to_string(),
            value1: difference.value1,
            value2: difference.value2,
            difference: difference.difference,
            percentage_change: difference.percentage_change,
            trend: Self::trend_to_dto(difference.trend),
        }
    }

    pub fn trend_to_dto(trend: DomainTrend) -> Trend {
        match trend {
            DomainTrend::Increase => Trend::Increase,
            DomainTrend::Decrease => Trend::Decrease,
            DomainTrend::Stable => Trend::Stable,
        }
    }

    pub fn to_annual_response(summary: AnnualSummary) -> AnnualSummaryResponse {
        AnnualSummaryResponse {
            success: true,
            year: summary.year,
            net_change: summary.net_change(),
            months_generated: summary.months_generated,
            months_missing: summary.months_missing,
            opening_balance: summary.opening_balance,
            closing_balance: summary.closing_balance,
            total_income: summary.total_income,
            total_expense: summary.total_expense,
            spp_income: summary.spp_income,
            registration_income: summary.registration_income,
            mentor_payment_expense: summary.mentor_payment_expense,
            operational_expense: summary.operational_expense,
        }
    }

    pub fn to_export_response(result: ExportRecapsResult) -> ExportRecapsResponse {
        ExportRecapsResponse {
            success: true,
            csv_content: result.csv_content,
            filename: result.filename,
            recap_count: result.recap_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::period::Period;
    use crate::domain::models::recap::RecapFigures;

    #[test]
    fn test_to_dto_labels_the_period() {
        let recap = DomainRecap {
            id: 7,
            period: Period::new(3, 2025).unwrap(),
            figures: RecapFigures {
                opening_balance: 100,
                total_income: 50,
                closing_balance: 150,
                ..Default::default()
            },
            generated_by: Some(2),
            generated_by_name: Some("Bendahara".to_string()),
            generated_at: "2025-04-01T08:00:00+00:00".to_string(),
        };

        let dto = RecapMapper::to_dto(recap);
        assert_eq!(dto.period_label, "March 2025");
        assert_eq!(dto.month, 3);
        assert_eq!(dto.closing_balance, 150);
        assert_eq!(dto.generated_by_name.as_deref(), Some("Bendahara"));
    }

    #[test]
    fn test_range_response_counts() {
        let response = RecapMapper::to_range_response(BatchGenerationResult {
            total_periods: 3,
            success_count: 2,
            errors: vec!["March 2025: The recap data could not be read or saved. Please try again later.".to_string()],
        });
        assert!(!response.success);
        assert_eq!(response.error_count, 1);
        assert_eq!(response.message, "Generated 2 of 3 recaps (1 failed)");
    }
}
