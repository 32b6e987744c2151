use crate::component::JsonObject;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a BPMN task, read from its `taskType` extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    Data,
    Payment,
    Signing,
    UserControlledSigning,
    Other(String),
}

impl TaskType {
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::Data => "data",
            TaskType::Payment => "payment",
            TaskType::Signing => "signing",
            TaskType::UserControlledSigning => "userControlledSigning",
            TaskType::Other(name) => name,
        }
    }

    pub fn is_signing(&self) -> bool {
        matches!(self, TaskType::Signing | TaskType::UserControlledSigning)
    }
}

impl From<&str> for TaskType {
    fn from(name: &str) -> Self {
        match name {
            "data" => TaskType::Data,
            "payment" => TaskType::Payment,
            "signing" => TaskType::Signing,
            "userControlledSigning" => TaskType::UserControlledSigning,
            other => TaskType::Other(other.to_string()),
        }
    }
}

impl From<String> for TaskType {
    fn from(name: String) -> Self {
        TaskType::from(name.as_str())
    }
}

impl From<TaskType> for String {
    fn from(task_type: TaskType) -> Self {
        task_type.as_str().to_string()
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    pub payment_data_type: String,
    pub payment_receipt_pdf_data_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureConfig {
    pub signature_data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signee_states_data_type: Option<String>,
    #[serde(default)]
    pub data_types_to_sign: Vec<String>,
    #[serde(default)]
    pub unique_from_signatures_in_data_types: Vec<String>,
}

/// A task of the process diagram, with the extension configuration the handlers need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTask {
    pub id: String,
    pub task_type: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_config: Option<PaymentConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_config: Option<SignatureConfig>,
}

impl ProcessTask {
    pub fn new(id: &str, task_type: TaskType) -> Self {
        Self {
            id: id.to_string(),
            task_type,
            payment_config: None,
            signature_config: None,
        }
    }

    pub fn with_payment_config(mut self, data_type: &str, receipt_pdf_data_type: &str) -> Self {
        self.payment_config = Some(PaymentConfig {
            payment_data_type: data_type.to_string(),
            payment_receipt_pdf_data_type: receipt_pdf_data_type.to_string(),
        });
        self
    }

    pub fn with_signature_config(mut self, config: SignatureConfig) -> Self {
        self.signature_config = Some(config);
        self
    }

    pub fn payment_data_type(&self) -> Option<&str> {
        self.payment_config
            .as_ref()
            .map(|c| c.payment_data_type.as_str())
    }

    pub fn receipt_pdf_data_type(&self) -> Option<&str> {
        self.payment_config
            .as_ref()
            .map(|c| c.payment_receipt_pdf_data_type.as_str())
    }

    pub fn signature_data_type(&self) -> Option<&str> {
        self.signature_config
            .as_ref()
            .map(|c| c.signature_data_type.as_str())
    }

    pub fn signee_states_data_type(&self) -> Option<&str> {
        self.signature_config
            .as_ref()
            .and_then(|c| c.signee_states_data_type.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDiagram {
    #[serde(default)]
    pub tasks: Vec<ProcessTask>,
}

impl ProcessDiagram {
    pub fn task(&self, task_id: &str) -> Option<&ProcessTask> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn signing_tasks(&self) -> impl Iterator<Item = &ProcessTask> {
        self.tasks.iter().filter(|t| t.task_type.is_signing())
    }
}

/// A data type of the application metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataType {
    pub id: String,
    #[serde(default)]
    pub allowed_content_types: Vec<String>,
    #[serde(default)]
    pub min_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl DataType {
    pub fn new(id: &str, content_type: &str) -> Self {
        Self {
            id: id.to_string(),
            allowed_content_types: vec![content_type.to_string()],
            max_count: Some(1),
            ..Self::default()
        }
    }

    pub fn for_task(mut self, task_id: &str) -> Self {
        self.task_id = Some(task_id.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub data_types: Vec<DataType>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl ApplicationMetadata {
    pub fn data_type(&self, id: &str) -> Option<&DataType> {
        self.data_types.iter().find(|d| d.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSetConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl LayoutSetConfig {
    pub fn for_task(task_id: &str, data_type: Option<&str>) -> Self {
        Self {
            id: task_id.to_string(),
            data_type: data_type.map(str::to_string),
            tasks: vec![task_id.to_string()],
            extra: JsonObject::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSets {
    #[serde(default)]
    pub sets: Vec<LayoutSetConfig>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl LayoutSets {
    pub fn get(&self, id: &str) -> Option<&LayoutSetConfig> {
        self.sets.iter().find(|s| s.id == id)
    }

    /// Task id to layout set id, from the `tasks` of every set.
    pub fn task_layout_set_table(&self) -> AHashMap<String, String> {
        self.sets
            .iter()
            .flat_map(|set| set.tasks.iter().map(|task| (task.clone(), set.id.clone())))
            .collect()
    }

    pub fn layout_set_id_for_task(&self, task_id: &str) -> Option<&str> {
        self.sets
            .iter()
            .find(|set| set.tasks.iter().any(|t| t == task_id))
            .map(|set| set.id.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    pub rule_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Policy {
    pub fn rule(&self, rule_id: &str) -> Option<&PolicyRule> {
        self.rules.iter().find(|r| r.rule_id == rule_id)
    }
}

/// `urn:altinn:resource:app_{org}_{app}:ruleid:{taskId}`
pub fn policy_rule_id(org: &str, app: &str, task_id: &str) -> String {
    format!("urn:altinn:resource:app_{org}_{app}:ruleid:{task_id}")
}

/// The rule allowing the end user to carry out a payment task.
pub fn payment_policy_rule(org: &str, app: &str, task_id: &str) -> PolicyRule {
    PolicyRule {
        rule_id: policy_rule_id(org, app, task_id),
        description: format!("Rule that defines that user with specified role(s) can pay, reject and confirm for {org}/{app} when it is in payment task"),
        subject: vec![
            "urn:altinn:rolecode:PRIV".to_string(),
            "urn:altinn:rolecode:DAGL".to_string(),
        ],
        actions: ["read", "pay", "confirm", "reject"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        resources: vec![vec![
            format!("urn:altinn:org:{org}"),
            format!("urn:altinn:app:{app}"),
            format!("urn:altinn:task:{task_id}"),
        ]],
    }
}
