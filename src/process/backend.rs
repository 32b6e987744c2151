use super::model::{
    ApplicationMetadata, DataType, LayoutSetConfig, LayoutSets, Policy, PolicyRule, ProcessDiagram,
};
use crate::error::BackendError;

/// The mutations the process-task handlers issue against the app repository.
///
/// Every call is independent. There is no transaction spanning several of them.
pub trait ProcessBackend {
    fn add_data_type(&mut self, data_type: DataType) -> Result<(), BackendError>;
    fn delete_data_type(&mut self, data_type_id: &str) -> Result<(), BackendError>;
    fn add_layout_set(&mut self, layout_set: LayoutSetConfig) -> Result<(), BackendError>;
    fn delete_layout_set(&mut self, layout_set_id: &str) -> Result<(), BackendError>;
    fn add_policy_rule(&mut self, rule: PolicyRule) -> Result<(), BackendError>;
    fn delete_policy_rule(&mut self, rule_id: &str) -> Result<(), BackendError>;
    /// Replaces the `uniqueFromSignaturesInDataTypes` list of a signing task.
    fn update_unique_signature_data_types(
        &mut self,
        task_id: &str,
        data_types: Vec<String>,
    ) -> Result<(), BackendError>;
}

/// Keeps the application metadata, layout sets, policy and diagram in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProcessBackend {
    pub metadata: ApplicationMetadata,
    pub layout_sets: LayoutSets,
    pub policy: Policy,
    pub diagram: ProcessDiagram,
}

impl MemoryProcessBackend {
    pub fn new(
        metadata: ApplicationMetadata,
        layout_sets: LayoutSets,
        policy: Policy,
        diagram: ProcessDiagram,
    ) -> Self {
        Self {
            metadata,
            layout_sets,
            policy,
            diagram,
        }
    }
}

impl ProcessBackend for MemoryProcessBackend {
    fn add_data_type(&mut self, data_type: DataType) -> Result<(), BackendError> {
        if self.metadata.data_type(&data_type.id).is_some() {
            return Err(BackendError::Request(format!(
                "Data type '{}' already exists",
                data_type.id
            )));
        }
        self.metadata.data_types.push(data_type);
        Ok(())
    }

    fn delete_data_type(&mut self, data_type_id: &str) -> Result<(), BackendError> {
        let before = self.metadata.data_types.len();
        self.metadata.data_types.retain(|d| d.id != data_type_id);
        if self.metadata.data_types.len() == before {
            return Err(BackendError::NotFound(format!("data type '{data_type_id}'")));
        }
        Ok(())
    }

    fn add_layout_set(&mut self, layout_set: LayoutSetConfig) -> Result<(), BackendError> {
        if self.layout_sets.get(&layout_set.id).is_some() {
            return Err(BackendError::Request(format!(
                "Layout set '{}' already exists",
                layout_set.id
            )));
        }
        self.layout_sets.sets.push(layout_set);
        Ok(())
    }

    fn delete_layout_set(&mut self, layout_set_id: &str) -> Result<(), BackendError> {
        let before = self.layout_sets.sets.len();
        self.layout_sets.sets.retain(|s| s.id != layout_set_id);
        if self.layout_sets.sets.len() == before {
            return Err(BackendError::NotFound(format!("layout set '{layout_set_id}'")));
        }
        Ok(())
    }

    fn add_policy_rule(&mut self, rule: PolicyRule) -> Result<(), BackendError> {
        self.policy.rules.retain(|r| r.rule_id != rule.rule_id);
        self.policy.rules.push(rule);
        Ok(())
    }

    fn delete_policy_rule(&mut self, rule_id: &str) -> Result<(), BackendError> {
        let before = self.policy.rules.len();
        self.policy.rules.retain(|r| r.rule_id != rule_id);
        if self.policy.rules.len() == before {
            return Err(BackendError::NotFound(format!("policy rule '{rule_id}'")));
        }
        Ok(())
    }

    fn update_unique_signature_data_types(
        &mut self,
        task_id: &str,
        data_types: Vec<String>,
    ) -> Result<(), BackendError> {
        let config = self
            .diagram
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .and_then(|t| t.signature_config.as_mut())
            .ok_or_else(|| BackendError::NotFound(format!("signing task '{task_id}'")))?;
        config.unique_from_signatures_in_data_types = data_types;
        Ok(())
    }
}
