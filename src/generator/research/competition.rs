use tracing::info;

use super::MarketResearcher;
use crate::generator::context::GeneratorContext;
use crate::generator::prompt::{NOT_SPECIFIED, PromptTemplate, join_or, product_line};
use crate::types::{BusinessConcept, CompetitiveAnalysis, MarketInsights};

impl MarketResearcher {
    /// Map the competitive landscape.
    ///
    /// Direct and indirect competitors are researched first; advantages, gaps and
    /// differentiation are then prompted with the top competitors as context.
    pub async fn analyze_competition(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        insights: &MarketInsights,
    ) -> CompetitiveAnalysis {
        info!("analyzing competitive landscape");

        let (direct_competitors, indirect_competitors) = futures::join!(
            self.direct_competitors(context, concept),
            self.indirect_competitors(context, concept),
        );

        let (competitive_advantages, market_gaps, differentiation_opportunities) = futures::join!(
            self.competitive_advantages(context, concept, &direct_competitors),
            self.market_gaps(context, concept, &direct_competitors, insights),
            self.differentiation_opportunities(
                context,
                concept,
                &direct_competitors,
                &indirect_competitors
            ),
        );

        CompetitiveAnalysis {
            direct_competitors,
            indirect_competitors,
            competitive_advantages,
            market_gaps,
            differentiation_opportunities,
        }
    }

    async fn direct_competitors(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
    ) -> Vec<String> {
        let prompt = PromptTemplate::new("Identify direct competitors for this business concept:")
            .context("Business Concept", &concept.concept_description)
            .context("Product/Service", product_line(concept))
            .context("Target Market", concept.target_demographics.location())
            .closing(
                "List 5-7 direct competitors (companies offering similar products/services to similar customers).\nInclude both local and national competitors if relevant.\nFormat as company names, one per line.",
            );

        context
            .prompt_list("direct_competitors", &prompt, 200, 7, Vec::new())
            .await
    }

    async fn indirect_competitors(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
    ) -> Vec<String> {
        let prompt = PromptTemplate::new("Identify indirect competitors for this business concept:")
            .context("Business Concept", &concept.concept_description)
            .context("Product/Service", product_line(concept))
            .closing(
                "List 3-5 indirect competitors (companies solving the same customer problem with different approaches).\nFormat as company names or categories, one per line.",
            );

        context
            .prompt_list("indirect_competitors", &prompt, 150, 5, Vec::new())
            .await
    }

    async fn competitive_advantages(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        competitors: &[String],
    ) -> Vec<String> {
        let prompt =
            PromptTemplate::new("Identify competitive advantages for this business concept:")
                .context("Business Concept", &concept.concept_description)
                .context(
                    "Product Features",
                    join_or(concept.product_info.features(), usize::MAX, NOT_SPECIFIED),
                )
                .context(
                    "Listed Advantages",
                    join_or(&concept.competitive_advantages, usize::MAX, "None listed"),
                )
                .context("Key Competitors", join_or(competitors, 3, "None identified"))
                .criteria(
                    "List 3-5 potential competitive advantages, considering:",
                    &[
                        "Unique features or capabilities",
                        "Cost advantages",
                        "Market positioning",
                        "Customer experience",
                        "Innovation potential",
                    ],
                )
                .closing("Format as advantages, one per line.");

        context
            .prompt_list(
                "competitive_advantages",
                &prompt,
                200,
                5,
                concept.competitive_advantages.clone(),
            )
            .await
    }

    async fn market_gaps(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        competitors: &[String],
        insights: &MarketInsights,
    ) -> Vec<String> {
        let prompt =
            PromptTemplate::new("Identify market gaps and opportunities for this business concept:")
                .context("Business Concept", &concept.concept_description)
                .context("Competition Level", insights.competition_level.to_string())
                .context("Key Competitors", join_or(competitors, 3, "None identified"))
                .context("Market Trends", join_or(&insights.trends, 3, ""))
                .criteria(
                    "List 3-5 market gaps or underserved segments, considering:",
                    &[
                        "Unmet customer needs",
                        "Underserved demographics",
                        "Geographic gaps",
                        "Service/feature gaps",
                        "Price point gaps",
                    ],
                )
                .closing("Format as opportunities, one per line.");

        context
            .prompt_list("market_gaps", &prompt, 200, 5, Vec::new())
            .await
    }

    async fn differentiation_opportunities(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        direct_competitors: &[String],
        indirect_competitors: &[String],
    ) -> Vec<String> {
        let prompt =
            PromptTemplate::new("Identify differentiation opportunities for this business concept:")
                .context("Business Concept", &concept.concept_description)
                .context("Direct Competitors", join_or(direct_competitors, 3, "None"))
                .context("Indirect Competitors", join_or(indirect_competitors, 3, "None"))
                .criteria(
                    "List 3-5 ways to differentiate from competitors:",
                    &[
                        "Product/service differentiation",
                        "Customer experience differentiation",
                        "Pricing strategy differentiation",
                        "Brand positioning differentiation",
                        "Distribution channel differentiation",
                    ],
                )
                .closing("Format as differentiation strategies, one per line.");

        context
            .prompt_list("differentiation_opportunities", &prompt, 200, 5, Vec::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::{ScriptedClient, context_with, sample_concept};
    use crate::types::CompetitionLevel;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_competitor_lists_feed_later_prompts() {
        let client = Arc::new(
            ScriptedClient::new()
                .reply("Identify direct competitors", "1. Blue Bottle\n2. Trade Coffee\n3. Atlas\n4. Bean Box")
                .reply("Identify indirect competitors", "- Local cafes\n- Grocery stores")
                .reply("competitive advantages", "Faster delivery")
                .reply("market gaps", "Office subscriptions")
                .reply("differentiation opportunities", "Roaster meetups"),
        );
        let context = context_with(client.clone());
        let insights = MarketInsights {
            competition_level: CompetitionLevel::High,
            ..MarketInsights::default()
        };

        let analysis = MarketResearcher
            .analyze_competition(&context, &sample_concept(), &insights)
            .await;

        assert_eq!(analysis.direct_competitors.len(), 4);
        assert_eq!(analysis.indirect_competitors, vec!["Local cafes", "Grocery stores"]);
        assert_eq!(analysis.competitive_advantages, vec!["Faster delivery"]);
        assert_eq!(analysis.market_gaps, vec!["Office subscriptions"]);
        assert_eq!(analysis.differentiation_opportunities, vec!["Roaster meetups"]);

        let prompts = client.prompts();
        let gaps_prompt = prompts.iter().find(|p| p.contains("market gaps")).unwrap();
        assert!(gaps_prompt.contains("Competition Level: high"));
        assert!(gaps_prompt.contains("Key Competitors: Blue Bottle, Trade Coffee, Atlas\n"));
    }

    #[tokio::test]
    async fn test_failed_advantages_fall_back_to_stated_advantages() {
        let context = context_with(Arc::new(ScriptedClient::new()));

        let analysis = MarketResearcher
            .analyze_competition(&context, &sample_concept(), &MarketInsights::default())
            .await;

        assert!(analysis.direct_competitors.is_empty());
        assert!(analysis.indirect_competitors.is_empty());
        assert_eq!(analysis.competitive_advantages, vec!["Curated local beans"]);
        assert!(analysis.market_gaps.is_empty());
        assert!(analysis.differentiation_opportunities.is_empty());
    }
}
