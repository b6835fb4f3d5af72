//! Dashboard filtering.

use serde::Deserialize;

use crate::backend::Summary;

/// Department value meaning "no department filter".
pub const ALL_DEPARTMENTS: &str = "All";

/// Dashboard query string: `?q=…&department=…`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentFilter {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub department: String,
}

impl DocumentFilter {
    #[must_use]
    pub fn matches(&self, summary: &Summary) -> bool {
        let department = self.department.trim();
        let department_ok = department.is_empty()
            || department == ALL_DEPARTMENTS
            || summary.department_id == department;

        let needle = self.q.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || summary.display_title().to_lowercase().contains(&needle)
            || summary.summary_text.to_lowercase().contains(&needle);

        department_ok && search_ok
    }

    /// Summaries passing the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, summaries: &'a [Summary]) -> Vec<&'a Summary> {
        summaries.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Distinct departments, sorted, for the filter dropdown.
#[must_use]
pub fn departments(summaries: &[Summary]) -> Vec<String> {
    let mut all: Vec<String> = summaries.iter().map(|s| s.department_id.clone()).collect();
    all.sort();
    all.dedup();
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, title: Option<&str>, text: &str, dept: &str) -> Summary {
        Summary {
            document_id: id.into(),
            title: title.map(String::from),
            summary_text: text.into(),
            department_id: dept.into(),
        }
    }

    fn sample() -> Vec<Summary> {
        vec![
            summary("1", Some("Q3 Budget"), "Spending plan", "finance"),
            summary("2", Some("Leave Policy"), "Annual leave rules", "hr"),
            summary("3", None, "Track maintenance budget", "operations"),
        ]
    }

    fn ids(found: &[&Summary]) -> Vec<String> {
        found.iter().map(|s| s.document_id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let all = sample();
        assert_eq!(DocumentFilter::default().apply(&all).len(), 3);
        let explicit_all = DocumentFilter {
            q: String::new(),
            department: ALL_DEPARTMENTS.into(),
        };
        assert_eq!(explicit_all.apply(&all).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_text() {
        let all = sample();
        let filter = DocumentFilter {
            q: "BUDGET".into(),
            department: String::new(),
        };
        assert_eq!(ids(&filter.apply(&all)), ["1", "3"]);
    }

    #[test]
    fn test_department_and_search_combine() {
        let all = sample();
        let filter = DocumentFilter {
            q: "budget".into(),
            department: "operations".into(),
        };
        assert_eq!(ids(&filter.apply(&all)), ["3"]);
    }

    #[test]
    fn test_departments_are_distinct_and_sorted() {
        let mut all = sample();
        all.push(summary("4", None, "x", "finance"));
        assert_eq!(departments(&all), ["finance", "hr", "operations"]);
    }
}
