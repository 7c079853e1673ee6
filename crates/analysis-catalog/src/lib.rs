//! The immutable analysis catalog.
//!
//! Catalog content is data only. Every id is bound to a calculator by the
//! orchestrator's registry, and the two are cross-checked at startup.

mod advanced;
mod basic;
mod comprehensive;
mod intermediate;

use std::collections::HashMap;

use analysis_core::{
    AnalysisDefinition, AnalysisError, AnalysisTier, Category, LocalizedText, Unit,
};

/// Number of entries in the standard catalog
pub const STANDARD_SIZE: usize = 181;

pub(crate) fn def(
    id: &'static str,
    category: Category,
    name: (&'static str, &'static str),
    description: (&'static str, &'static str),
    unit: Unit,
) -> AnalysisDefinition {
    AnalysisDefinition::new(
        id,
        category,
        LocalizedText::new(name.0, name.1),
        LocalizedText::new(description.0, description.1),
        unit,
    )
}

#[derive(Debug, Clone)]
pub struct Catalog {
    definitions: Vec<AnalysisDefinition>,
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and ids whose prefix does not
    /// match the definition's tier and category.
    pub fn new(definitions: Vec<AnalysisDefinition>) -> Result<Self, AnalysisError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            let prefix = def.expected_prefix();
            if !def.id.starts_with(&prefix) || def.id.len() == prefix.len() {
                return Err(AnalysisError::Configuration(format!(
                    "analysis id '{}' must start with '{}'",
                    def.id, prefix
                )));
            }
            if index.insert(def.id, i).is_some() {
                return Err(AnalysisError::Configuration(format!(
                    "duplicate analysis id '{}'",
                    def.id
                )));
            }
        }
        Ok(Self { definitions, index })
    }

    /// The built-in catalog, in presentation order
    pub fn standard() -> Result<Self, AnalysisError> {
        let mut definitions = Vec::with_capacity(STANDARD_SIZE);
        definitions.extend(basic::structural());
        definitions.extend(basic::ratios());
        definitions.extend(basic::flow());
        definitions.extend(intermediate::comparison());
        definitions.extend(intermediate::valuation());
        definitions.extend(intermediate::performance());
        definitions.extend(advanced::modeling());
        definitions.extend(advanced::statistical());
        definitions.extend(comprehensive::risk());
        definitions.extend(comprehensive::detection());

        let catalog = Self::new(definitions)?;
        tracing::debug!("Loaded analysis catalog with {} entries", catalog.len());
        Ok(catalog)
    }

    pub fn all(&self) -> &[AnalysisDefinition] {
        &self.definitions
    }

    pub fn get_by_id(&self, id: &str) -> Option<&AnalysisDefinition> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    /// Catalog position of an id, used to restore order after parallel runs
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get_by_category(&self, category: Category) -> Vec<&AnalysisDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Definitions selected by a requested tier (tiers are cumulative)
    pub fn for_tier(&self, tier: AnalysisTier) -> Vec<&AnalysisDefinition> {
        self.definitions
            .iter()
            .filter(|d| tier.includes(d.tier))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::ExecutionBudget;
    use std::collections::HashSet;

    #[test]
    fn test_standard_catalog_size_and_partition() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.len(), STANDARD_SIZE);

        let expected = [
            (Category::Structural, 17),
            (Category::Ratios, 52),
            (Category::Flow, 18),
            (Category::Comparison, 15),
            (Category::Valuation, 20),
            (Category::Performance, 15),
            (Category::Modeling, 14),
            (Category::Statistical, 11),
            (Category::Risk, 10),
            (Category::Detection, 9),
        ];
        for (category, count) in expected {
            assert_eq!(
                catalog.get_by_category(category).len(),
                count,
                "category {}",
                category.as_str()
            );
        }
    }

    #[test]
    fn test_tiers_are_cumulative() {
        let catalog = Catalog::standard().unwrap();
        let basic = catalog.for_tier(AnalysisTier::Basic);
        assert_eq!(basic.len(), 87);
        assert!(basic.iter().all(|d| d.id.starts_with("basic.")));
        assert_eq!(catalog.for_tier(AnalysisTier::Intermediate).len(), 137);
        assert_eq!(catalog.for_tier(AnalysisTier::Advanced).len(), 162);
        assert_eq!(catalog.for_tier(AnalysisTier::Comprehensive).len(), 181);
    }

    #[test]
    fn test_every_entry_is_bilingual_and_unique() {
        let catalog = Catalog::standard().unwrap();
        let mut ids = HashSet::new();
        for def in catalog.all() {
            assert!(ids.insert(def.id));
            assert!(!def.name.en.is_empty() && !def.name.ar.is_empty(), "{}", def.id);
            assert!(!def.description.en.is_empty() && !def.description.ar.is_empty(), "{}", def.id);
        }
    }

    #[test]
    fn test_modeling_entries_are_time_boxed() {
        let catalog = Catalog::standard().unwrap();
        for def in catalog.get_by_category(Category::Modeling) {
            assert_eq!(def.budget, ExecutionBudget::TimeBoxed);
        }
        let npv = catalog.get_by_id("intermediate.valuation.npv").unwrap();
        assert_eq!(npv.budget, ExecutionBudget::Instant);
    }

    #[test]
    fn test_rejects_duplicates_and_bad_prefix() {
        let a = def("basic.ratios.x", Category::Ratios, ("X", "س"), ("X", "س"), Unit::Times);
        let dup = Catalog::new(vec![a.clone(), a.clone()]);
        assert!(matches!(dup, Err(AnalysisError::Configuration(_))));

        let wrong = def("advanced.ratios.y", Category::Ratios, ("Y", "ص"), ("Y", "ص"), Unit::Times);
        assert!(Catalog::new(vec![wrong]).is_err());
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::standard().unwrap();
        let def = catalog.get_by_id("basic.ratios.debt_to_equity").unwrap();
        assert_eq!(def.direction, analysis_core::Direction::LowerIsBetter);
        assert_eq!(def.benchmark_key, Some("leverage.debtToEquity"));
        assert_eq!(catalog.position("basic.structural.vertical_current_assets"), Some(0));
        assert!(catalog.get_by_id("basic.ratios.nope").is_none());
    }
}
