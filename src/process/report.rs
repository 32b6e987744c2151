use super::model::TaskType;
use crate::error::BackendError;
use std::fmt;

/// One backend mutation issued by a task handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStep {
    AddDataType(String),
    DeleteDataType(String),
    AddLayoutSet(String),
    DeleteLayoutSet(String),
    AddPolicyRule(String),
    DeletePolicyRule(String),
    ScrubUniqueSignatures { task_id: String, data_type: String },
}

impl fmt::Display for TaskStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStep::AddDataType(id) => write!(f, "add data type '{id}'"),
            TaskStep::DeleteDataType(id) => write!(f, "delete data type '{id}'"),
            TaskStep::AddLayoutSet(id) => write!(f, "add layout set '{id}'"),
            TaskStep::DeleteLayoutSet(id) => write!(f, "delete layout set '{id}'"),
            TaskStep::AddPolicyRule(id) => write!(f, "add policy rule '{id}'"),
            TaskStep::DeletePolicyRule(id) => write!(f, "delete policy rule '{id}'"),
            TaskStep::ScrubUniqueSignatures { task_id, data_type } => {
                write!(f, "remove '{data_type}' from unique signatures of '{task_id}'")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub step: TaskStep,
    pub result: Result<(), BackendError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Every step succeeded, or there was nothing to do.
    Completed,
    /// Some steps succeeded. The app is left half-updated until the user retries.
    PartiallyFailed,
    Failed,
}

/// What a task handler did, step by step.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskHandlingReport {
    pub task_id: String,
    pub task_type: TaskType,
    pub steps: Vec<StepResult>,
}

impl TaskHandlingReport {
    pub fn new(task_id: &str, task_type: TaskType) -> Self {
        Self {
            task_id: task_id.to_string(),
            task_type,
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, step: TaskStep, result: Result<(), BackendError>) {
        self.steps.push(StepResult { step, result });
    }

    pub fn outcome(&self) -> TaskOutcome {
        let failed = self.steps.iter().filter(|s| s.result.is_err()).count();
        match failed {
            0 => TaskOutcome::Completed,
            n if n == self.steps.len() => TaskOutcome::Failed,
            _ => TaskOutcome::PartiallyFailed,
        }
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|s| s.result.is_err())
    }

    pub fn is_noop(&self) -> bool {
        self.steps.is_empty()
    }
}
