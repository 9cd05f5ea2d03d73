use crate::model::api::JoinReportDto;

/// Aggregated outcome of one bulk guild-join run.
///
/// Every member stored at the start of the run is counted exactly once, so
/// `success_count + failure_count` always equals the number of members the
/// batch attempted. Failure reasons are collected in completion order, which
/// is unrelated to store order since members are joined concurrently.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JoinReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub errors: Vec<String>,
}

impl JoinReport {
    pub fn into_dto(self) -> JoinReportDto {
        JoinReportDto {
            success_count: self.success_count,
            failure_count: self.failure_count,
            errors: self.errors,
        }
    }
}
