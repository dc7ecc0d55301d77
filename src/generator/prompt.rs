use crate::types::BusinessConcept;

pub const NOT_SPECIFIED: &str = "Not specified";

/// Shape every evaluation prompt follows: an opening instruction, the restated concept
/// fields, the evaluation criteria and the requested output format.
#[derive(Debug, Clone, Default)]
pub struct PromptTemplate {
    /// Opening instruction
    pub opening_instruction: String,
    /// `Label: value` context lines; an empty value renders a bare `Label:` heading
    pub context: Vec<(String, String)>,
    /// Heading above the criteria list
    pub criteria_heading: String,
    pub criteria: Vec<String>,
    /// Output format instruction
    pub closing_instruction: String,
}

impl PromptTemplate {
    pub fn new(opening_instruction: impl Into<String>) -> Self {
        Self {
            opening_instruction: opening_instruction.into(),
            criteria_heading: "Consider:".to_string(),
            ..Default::default()
        }
    }

    pub fn context(mut self, label: &str, value: impl Into<String>) -> Self {
        self.context.push((label.to_string(), value.into()));
        self
    }

    pub fn criteria(mut self, heading: &str, criteria: &[&str]) -> Self {
        self.criteria_heading = heading.to_string();
        self.criteria = criteria.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn closing(mut self, closing_instruction: impl Into<String>) -> Self {
        self.closing_instruction = closing_instruction.into();
        self
    }

    pub fn render(&self) -> String {
        let mut prompt = format!("{}\n\n", self.opening_instruction);

        for (label, value) in &self.context {
            if value.is_empty() {
                prompt.push_str(&format!("{}:\n", label));
            } else {
                prompt.push_str(&format!("{}: {}\n", label, value));
            }
        }

        if !self.criteria.is_empty() {
            prompt.push_str(&format!("\n{}\n", self.criteria_heading));
            for (i, criterion) in self.criteria.iter().enumerate() {
                prompt.push_str(&format!("{}. {}\n", i + 1, criterion));
            }
        }

        if !self.closing_instruction.is_empty() {
            prompt.push_str(&format!("\n{}\n", self.closing_instruction));
        }
        prompt
    }
}

/// Comma-joined list, or the placeholder when empty
pub fn join_or(items: &[String], limit: usize, placeholder: &str) -> String {
    if items.is_empty() {
        placeholder.to_string()
    } else {
        items
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Product description for prompts
pub fn product_line(concept: &BusinessConcept) -> String {
    concept
        .product_info
        .description_or(NOT_SPECIFIED)
        .to_string()
}

/// "Age 25-40, middle" demographic line for prompts
pub fn demographic_line(concept: &BusinessConcept) -> String {
    let demographics = &concept.target_demographics;
    format!(
        "Age {}, {}",
        demographics.age_band(),
        demographics.income_range()
    )
}
