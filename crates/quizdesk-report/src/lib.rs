//! Results summaries for instructors.
//!
//! Both reports are built from the JSON result records written by
//! [`quizdesk_core::results::ResultWriter`].

pub mod html;
pub mod text;

use quizdesk_core::results::LoadedResults;
use serde::Serialize;

/// Aggregate numbers shown at the top of every report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overview {
    pub submissions: usize,
    pub unreadable: usize,
    /// Mean auto-graded percentage; `None` with no submissions.
    pub average_percentage: Option<f64>,
    pub highest_percentage: Option<f64>,
    pub lowest_percentage: Option<f64>,
    /// Answers across all submissions still waiting for a human.
    pub manual_answers: usize,
    pub late_submissions: usize,
}

impl Overview {
    pub fn from_results(loaded: &LoadedResults) -> Self {
        let percentages: Vec<f64> = loaded
            .records
            .iter()
            .map(|(_, r)| r.score.percentage)
            .collect();

        let average_percentage = if percentages.is_empty() {
            None
        } else {
            let mean = percentages.iter().sum::<f64>() / percentages.len() as f64;
            Some((mean * 100.0).round() / 100.0)
        };

        Self {
            submissions: loaded.records.len(),
            unreadable: loaded.unreadable.len(),
            average_percentage,
            highest_percentage: percentages.iter().copied().reduce(f64::max),
            lowest_percentage: percentages.iter().copied().reduce(f64::min),
            manual_answers: loaded
                .records
                .iter()
                .map(|(_, r)| r.score.manual_count())
                .sum(),
            late_submissions: loaded.records.iter().filter(|(_, r)| r.late).count(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_aggregates_scores() {
        let overview = Overview::from_results(&fixtures::loaded());
        assert_eq!(overview.submissions, 2);
        assert_eq!(overview.unreadable, 1);
        // Ada 2/3, Bob 0/3.
        assert_eq!(overview.highest_percentage, Some(66.67));
        assert_eq!(overview.lowest_percentage, Some(0.0));
        let average = overview.average_percentage.unwrap();
        assert!((average - 33.34).abs() < 0.011, "average = {average}");
        assert_eq!(overview.manual_answers, 2);
        assert_eq!(overview.late_submissions, 1);
    }

    #[test]
    fn overview_of_nothing() {
        let overview = Overview::from_results(&LoadedResults::default());
        assert_eq!(overview.submissions, 0);
        assert!(overview.average_percentage.is_none());
    }
}
