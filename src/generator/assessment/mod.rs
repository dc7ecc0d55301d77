//! Post-scoring stages: financial outlook, risk profile and the executive summary

mod financial;
mod risk;
mod summary;

pub use summary::{DEFAULT_NEXT_STEPS, DEFAULT_RECOMMENDATIONS};

/// Issues the prompts that run after the headline scores are known
#[derive(Default)]
pub struct Assessor;

/// Split an inline list on semicolons, or on commas when there are none
fn split_inline_list(text: &str) -> Vec<String> {
    let separator = if text.contains(';') { ';' } else { ',' };
    text.split(separator)
        .map(|item| item.trim().trim_end_matches('.').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_inline_list() {
        assert_eq!(
            split_inline_list("Angel investment; Loan of $50,000; "),
            vec!["Angel investment", "Loan of $50,000"]
        );
        assert_eq!(split_inline_list("Marketing, Staff."), vec!["Marketing", "Staff"]);
        assert!(split_inline_list("  ").is_empty());
    }
}
