//! Market research stage: market insights and competitive landscape

mod competition;
mod market;

/// Issues the market and competition prompts for one concept
#[derive(Default)]
pub struct MarketResearcher;
