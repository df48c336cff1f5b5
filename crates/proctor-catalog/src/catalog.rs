//! The in-memory test registry.

use thiserror::Error;
use uuid::Uuid;

use proctor_core::authoring::validate_for_publish;
use proctor_core::error::IncompletePublication;
use proctor_core::model::TestDefinition;

use crate::gate::Role;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no test with id '{0}'")]
    NotFound(String),

    /// The publish gate rejected the definition; the authoring flow stays
    /// open for correction.
    #[error(transparent)]
    NotPublishable(#[from] IncompletePublication),
}

/// Operator-dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_tests: usize,
    pub active_tests: usize,
    pub total_questions: usize,
}

/// Registry of published test definitions, insertion-ordered.
#[derive(Default)]
pub struct Catalog {
    tests: Vec<TestDefinition>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a definition: run the publish gate, assign an id on first
    /// publication, and make it visible to takers. Republishing a known id
    /// replaces the stored definition in place.
    pub fn publish(
        &mut self,
        mut definition: TestDefinition,
    ) -> Result<&TestDefinition, CatalogError> {
        validate_for_publish(&definition)?;

        let id = match definition.id() {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        definition.mark_published(id.clone());

        tracing::info!(test_id = %id, title = definition.title(), "test published");

        let position = match self.position(&id) {
            Some(position) => {
                self.tests[position] = definition;
                position
            }
            None => {
                self.tests.push(definition);
                self.tests.len() - 1
            }
        };
        Ok(&self.tests[position])
    }

    /// Every stored test, insertion order.
    pub fn list(&self) -> &[TestDefinition] {
        &self.tests
    }

    /// The subset a taker may browse: published and active.
    pub fn active(&self) -> impl Iterator<Item = &TestDefinition> {
        self.tests.iter().filter(|t| t.is_active())
    }

    /// What `role` is allowed to see.
    pub fn visible_to(&self, role: Role) -> Vec<&TestDefinition> {
        match role {
            Role::Taker => self.active().collect(),
            Role::Operator => self.tests.iter().collect(),
        }
    }

    /// Case-insensitive substring search over title and category, active
    /// tests only.
    pub fn search(&self, query: &str) -> Vec<&TestDefinition> {
        let query = query.to_lowercase();
        self.active()
            .filter(|t| {
                t.title().to_lowercase().contains(&query)
                    || t.category().to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&TestDefinition> {
        self.tests.iter().find(|t| t.id() == Some(id))
    }

    /// Hide or show a test without deleting it.
    pub fn set_active(&mut self, id: &str, active: bool) -> Result<(), CatalogError> {
        let position = self
            .position(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        self.tests[position].set_active(active);
        Ok(())
    }

    /// Flip visibility, returning the new state.
    pub fn toggle_active(&mut self, id: &str) -> Result<bool, CatalogError> {
        let position = self
            .position(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        let next = !self.tests[position].is_active();
        self.tests[position].set_active(next);
        Ok(next)
    }

    /// Delete a test, returning the definition.
    pub fn remove(&mut self, id: &str) -> Result<TestDefinition, CatalogError> {
        let position = self
            .position(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        Ok(self.tests.remove(position))
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_tests: self.tests.len(),
            active_tests: self.active().count(),
            total_questions: self.tests.iter().map(TestDefinition::question_count).sum(),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tests.iter().position(|t| t.id() == Some(id))
    }
}
