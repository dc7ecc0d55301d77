use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{EvaluationError, Result};

/// Lowercase words joined by `_`, ignoring punctuation and a standalone "and".
fn label_key(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty() && !part.eq_ignore_ascii_case("and"))
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Target income bracket
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String")]
pub enum IncomeRange {
    /// < $30k
    #[serde(rename = "low")]
    Low,
    /// $30k - $50k
    #[serde(rename = "lower_middle")]
    LowerMiddle,
    /// $50k - $80k
    #[serde(rename = "middle")]
    #[default]
    Middle,
    /// $80k - $120k
    #[serde(rename = "upper_middle")]
    UpperMiddle,
    /// > $120k
    #[serde(rename = "high")]
    High,
}

impl std::fmt::Display for IncomeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncomeRange::Low => write!(f, "low"),
            IncomeRange::LowerMiddle => write!(f, "lower_middle"),
            IncomeRange::Middle => write!(f, "middle"),
            IncomeRange::UpperMiddle => write!(f, "upper_middle"),
            IncomeRange::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for IncomeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match label_key(s).as_str() {
            "low" => Ok(IncomeRange::Low),
            "lower_middle" => Ok(IncomeRange::LowerMiddle),
            "middle" => Ok(IncomeRange::Middle),
            "upper_middle" => Ok(IncomeRange::UpperMiddle),
            "high" => Ok(IncomeRange::High),
            _ => Err(format!("Unknown income range: {}", s)),
        }
    }
}

impl TryFrom<String> for IncomeRange {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// Business / product category
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum BusinessCategory {
    Technology,
    Retail,
    FoodBeverage,
    HealthFitness,
    Education,
    Entertainment,
    Finance,
    RealEstate,
    Automotive,
    Fashion,
    HomeGarden,
    Travel,
    ProfessionalServices,
    Other,
}

impl BusinessCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessCategory::Technology => "technology",
            BusinessCategory::Retail => "retail",
            BusinessCategory::FoodBeverage => "food_beverage",
            BusinessCategory::HealthFitness => "health_fitness",
            BusinessCategory::Education => "education",
            BusinessCategory::Entertainment => "entertainment",
            BusinessCategory::Finance => "finance",
            BusinessCategory::RealEstate => "real_estate",
            BusinessCategory::Automotive => "automotive",
            BusinessCategory::Fashion => "fashion",
            BusinessCategory::HomeGarden => "home_garden",
            BusinessCategory::Travel => "travel",
            BusinessCategory::ProfessionalServices => "professional_services",
            BusinessCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BusinessCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let category = match label_key(s).as_str() {
            "technology" | "tech" => BusinessCategory::Technology,
            "retail" => BusinessCategory::Retail,
            "food_beverage" | "food" => BusinessCategory::FoodBeverage,
            "health_fitness" | "health" | "fitness" => BusinessCategory::HealthFitness,
            "education" => BusinessCategory::Education,
            "entertainment" => BusinessCategory::Entertainment,
            "finance" => BusinessCategory::Finance,
            "real_estate" => BusinessCategory::RealEstate,
            "automotive" => BusinessCategory::Automotive,
            "fashion" => BusinessCategory::Fashion,
            "home_garden" => BusinessCategory::HomeGarden,
            "travel" => BusinessCategory::Travel,
            "professional_services" => BusinessCategory::ProfessionalServices,
            "other" => BusinessCategory::Other,
            _ => return Err(format!("Unknown business category: {}", s)),
        };
        Ok(category)
    }
}

impl TryFrom<String> for BusinessCategory {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// Target demographic description.
///
/// `age_min <= age_max` is enforced by every constructor, including deserialization.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(try_from = "DemographicsFields")]
pub struct Demographics {
    age_min: u8,
    age_max: u8,
    income_range: IncomeRange,
    location: String,
    interests: Vec<String>,
    gender: Option<String>,
    education_level: Option<String>,
    lifestyle: Option<String>,
}

/// Unvalidated wire form of [`Demographics`].
#[derive(Debug, Deserialize)]
struct DemographicsFields {
    age_min: u8,
    age_max: u8,
    income_range: IncomeRange,
    location: String,
    #[serde(default)]
    interests: Vec<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    education_level: Option<String>,
    #[serde(default)]
    lifestyle: Option<String>,
}

impl TryFrom<DemographicsFields> for Demographics {
    type Error = EvaluationError;

    fn try_from(fields: DemographicsFields) -> Result<Self> {
        Ok(Demographics::new(
            fields.age_min,
            fields.age_max,
            fields.income_range,
            fields.location,
        )?
        .with_interests(fields.interests)
        .with_gender(fields.gender)
        .with_education_level(fields.education_level)
        .with_lifestyle(fields.lifestyle))
    }
}

pub const MAX_AGE: u8 = 100;

impl Demographics {
    pub fn new(
        age_min: u8,
        age_max: u8,
        income_range: IncomeRange,
        location: impl Into<String>,
    ) -> Result<Self> {
        if age_max > MAX_AGE {
            return Err(EvaluationError::validation(format!(
                "age_max must be at most {}, got {}",
                MAX_AGE, age_max
            )));
        }
        if age_max < age_min {
            return Err(EvaluationError::validation(format!(
                "age_max ({}) must be greater than or equal to age_min ({})",
                age_max, age_min
            )));
        }

        Ok(Self {
            age_min,
            age_max,
            income_range,
            location: location.into(),
            interests: Vec::new(),
            gender: None,
            education_level: None,
            lifestyle: None,
        })
    }

    /// Replaces the interest tags, dropping later duplicates.
    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = dedup_preserving_order(interests.into_iter().map(Into::into));
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_education_level(mut self, education_level: Option<String>) -> Self {
        self.education_level = education_level;
        self
    }

    pub fn with_lifestyle(mut self, lifestyle: Option<String>) -> Self {
        self.lifestyle = lifestyle;
        self
    }

    pub fn age_min(&self) -> u8 {
        self.age_min
    }

    pub fn age_max(&self) -> u8 {
        self.age_max
    }

    pub fn income_range(&self) -> IncomeRange {
        self.income_range
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn education_level(&self) -> Option<&str> {
        self.education_level.as_deref()
    }

    pub fn lifestyle(&self) -> Option<&str> {
        self.lifestyle.as_deref()
    }

    /// "25-40" style age band used in prompts.
    pub fn age_band(&self) -> String {
        format!("{}-{}", self.age_min, self.age_max)
    }
}

/// Deduplicate while keeping the first occurrence of each entry.
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Product imagery, either on disk or inline.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProductImage {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Product description.
///
/// At least one of description or image must be present.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(try_from = "ProductInfoFields")]
pub struct ProductInfo {
    name: Option<String>,
    description: Option<String>,
    image: Option<ProductImage>,
    category: Option<BusinessCategory>,
    price_range: Option<String>,
    features: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ProductInfoFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<ProductImage>,
    #[serde(default)]
    image_path: Option<PathBuf>,
    #[serde(default)]
    category: Option<BusinessCategory>,
    #[serde(default)]
    price_range: Option<String>,
    #[serde(default)]
    features: Vec<String>,
}

impl TryFrom<ProductInfoFields> for ProductInfo {
    type Error = EvaluationError;

    fn try_from(fields: ProductInfoFields) -> Result<Self> {
        let image = fields.image.or(fields.image_path.map(ProductImage::Path));
        ProductInfo::builder()
            .name(fields.name)
            .description(fields.description)
            .image(image)
            .category(fields.category)
            .price_range(fields.price_range)
            .features(fields.features)
            .build()
    }
}

impl ProductInfo {
    pub fn builder() -> ProductInfoBuilder {
        ProductInfoBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn image(&self) -> Option<&ProductImage> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        match &self.image {
            Some(ProductImage::Bytes(bytes)) => !bytes.is_empty(),
            Some(ProductImage::Path(path)) => !path.as_os_str().is_empty(),
            None => false,
        }
    }

    pub fn category(&self) -> Option<BusinessCategory> {
        self.category
    }

    pub fn price_range(&self) -> Option<&str> {
        self.price_range.as_deref()
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Description for prompts, or the given placeholder.
    pub fn description_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.description().unwrap_or(placeholder)
    }

    /// Replaces the product image.
    pub fn with_image(mut self, image: ProductImage) -> Self {
        self.image = Some(image);
        self
    }
}

#[derive(Debug, Default, Clone)]
pub struct ProductInfoBuilder {
    name: Option<String>,
    description: Option<String>,
    image: Option<ProductImage>,
    category: Option<BusinessCategory>,
    price_range: Option<String>,
    features: Vec<String>,
}

impl ProductInfoBuilder {
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn image(mut self, image: Option<ProductImage>) -> Self {
        self.image = image;
        self
    }

    pub fn category(mut self, category: Option<BusinessCategory>) -> Self {
        self.category = category;
        self
    }

    pub fn price_range(mut self, price_range: Option<String>) -> Self {
        self.price_range = price_range;
        self
    }

    pub fn features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    pub fn build(self) -> Result<ProductInfo> {
        let description = self.description.filter(|d| !d.trim().is_empty());
        let product = ProductInfo {
            name: self.name,
            description,
            image: self.image,
            category: self.category,
            price_range: self.price_range,
            features: self.features,
        };

        if product.description.is_none() && !product.has_image() {
            return Err(EvaluationError::validation(
                "either a product description or a product image must be provided",
            ));
        }
        Ok(product)
    }
}

/// The complete structured business idea.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BusinessConcept {
    pub concept_description: String,
    pub target_demographics: Demographics,
    pub product_info: ProductInfo,
    #[serde(default)]
    pub business_model: Option<String>,
    #[serde(default)]
    pub competitive_advantages: Vec<String>,
    #[serde(default)]
    pub funding_requirements: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
}

impl BusinessConcept {
    pub fn new(
        concept_description: impl Into<String>,
        target_demographics: Demographics,
        product_info: ProductInfo,
    ) -> Self {
        Self {
            concept_description: concept_description.into(),
            target_demographics,
            product_info,
            business_model: None,
            competitive_advantages: Vec::new(),
            funding_requirements: None,
            timeline: None,
        }
    }

    pub fn with_business_model(mut self, business_model: impl Into<String>) -> Self {
        self.business_model = Some(business_model.into());
        self
    }

    pub fn with_competitive_advantages(mut self, advantages: Vec<String>) -> Self {
        self.competitive_advantages = advantages;
        self
    }

    pub fn with_funding_requirements(mut self, funding: impl Into<String>) -> Self {
        self.funding_requirements = Some(funding.into());
        self
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline = Some(timeline.into());
        self
    }

    /// "Age 25-40, middle, Austin, TX" style audience line used in prompts.
    pub fn audience_summary(&self) -> String {
        let demographics = &self.target_demographics;
        format!(
            "Age {}, {}, {}",
            demographics.age_band(),
            demographics.income_range(),
            demographics.location()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demographics_rejects_inverted_ages() {
        let result = Demographics::new(40, 25, IncomeRange::Middle, "Austin");
        assert!(matches!(result, Err(EvaluationError::Validation(_))));
    }

    #[test]
    fn test_demographics_accepts_equal_ages() {
        let demographics = Demographics::new(30, 30, IncomeRange::High, "Denver").unwrap();
        assert_eq!(demographics.age_band(), "30-30");
    }

    #[test]
    fn test_demographics_rejects_age_above_limit() {
        assert!(Demographics::new(20, 130, IncomeRange::Low, "Paris").is_err());
    }

    #[test]
    fn test_demographics_interests_are_deduplicated_in_order() {
        let demographics = Demographics::new(18, 35, IncomeRange::Middle, "Austin")
            .unwrap()
            .with_interests(vec!["fitness", "coffee", "fitness", "travel", "coffee"]);
        assert_eq!(demographics.interests(), ["fitness", "coffee", "travel"]);
    }

    #[test]
    fn test_demographics_deserialize_enforces_invariant() {
        let json = r#"{"age_min": 50, "age_max": 20, "income_range": "middle", "location": "Austin"}"#;
        assert!(serde_json::from_str::<Demographics>(json).is_err());

        let json = r#"{"age_min": 20, "age_max": 50, "income_range": "upper_middle", "location": "Austin", "interests": ["a", "a"]}"#;
        let demographics: Demographics = serde_json::from_str(json).unwrap();
        assert_eq!(demographics.income_range(), IncomeRange::UpperMiddle);
        assert_eq!(demographics.interests().len(), 1);
    }

    #[test]
    fn test_product_requires_description_or_image() {
        let result = ProductInfo::builder().name(Some("Widget".into())).build();
        assert!(matches!(result, Err(EvaluationError::Validation(_))));

        let result = ProductInfo::builder()
            .description(Some("   ".into()))
            .build();
        assert!(result.is_err());

        let result = ProductInfo::builder()
            .image(Some(ProductImage::Bytes(Vec::new())))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_product_with_image_only() {
        let product = ProductInfo::builder()
            .image(Some(ProductImage::Path(PathBuf::from("product.png"))))
            .build()
            .unwrap();
        assert!(product.has_image());
        assert_eq!(product.description_or("Not specified"), "Not specified");
    }

    #[test]
    fn test_product_deserialize_accepts_image_path_alias() {
        let json = r#"{"image_path": "shot.jpg", "category": "food_beverage"}"#;
        let product: ProductInfo = serde_json::from_str(json).unwrap();
        assert_eq!(
            product.image(),
            Some(&ProductImage::Path(PathBuf::from("shot.jpg")))
        );
        assert_eq!(product.category(), Some(BusinessCategory::FoodBeverage));

        assert!(serde_json::from_str::<ProductInfo>(r#"{"name": "x"}"#).is_err());
    }

    #[test]
    fn test_category_and_income_parsing() {
        assert_eq!(
            "Food & Beverage".parse::<BusinessCategory>().unwrap(),
            BusinessCategory::FoodBeverage
        );
        assert_eq!(
            "professional-services".parse::<BusinessCategory>().unwrap(),
            BusinessCategory::ProfessionalServices
        );
        assert_eq!(
            "Home and Garden".parse::<BusinessCategory>().unwrap(),
            BusinessCategory::HomeGarden
        );
        assert!("spaceflight".parse::<BusinessCategory>().is_err());
        assert_eq!(
            "Upper Middle".parse::<IncomeRange>().unwrap(),
            IncomeRange::UpperMiddle
        );
        assert_eq!(IncomeRange::LowerMiddle.to_string(), "lower_middle");
    }

    #[test]
    fn test_concept_files_accept_display_labels() {
        let json = r#"{"description": "Smoothie bar", "category": "Food & Beverage"}"#;
        let product: ProductInfo = serde_json::from_str(json).unwrap();
        assert_eq!(product.category(), Some(BusinessCategory::FoodBeverage));

        let json = r#"{"age_min": 20, "age_max": 40, "income_range": "Lower-Middle", "location": "Austin"}"#;
        let demographics: Demographics = serde_json::from_str(json).unwrap();
        assert_eq!(demographics.income_range(), IncomeRange::LowerMiddle);

        let json = r#"{"description": "x", "category": "spaceflight"}"#;
        assert!(serde_json::from_str::<ProductInfo>(json).is_err());
    }

    #[test]
    fn test_audience_summary() {
        let demographics = Demographics::new(25, 40, IncomeRange::Middle, "Austin, TX").unwrap();
        let product = ProductInfo::builder()
            .description(Some("Cold brew subscription".into()))
            .build()
            .unwrap();
        let concept = BusinessConcept::new("Coffee delivery", demographics, product);
        assert_eq!(concept.audience_summary(), "Age 25-40, middle, Austin, TX");
    }
}
