use super::backend::ProcessBackend;
use super::model::{
    DataType, LayoutSetConfig, LayoutSets, ProcessDiagram, ProcessTask, TaskType,
    payment_policy_rule, policy_rule_id,
};
use super::report::{TaskHandlingReport, TaskStep};
use crate::error::{BackendError, ProcessError};
use tracing::{debug, error, info};

const JSON_CONTENT_TYPE: &str = "application/json";
const PDF_CONTENT_TYPE: &str = "application/pdf";

fn execute<B, F>(backend: &mut B, report: &mut TaskHandlingReport, step: TaskStep, action: F)
where
    B: ProcessBackend + ?Sized,
    F: FnOnce(&mut B) -> Result<(), BackendError>,
{
    let result = action(backend);
    match &result {
        Ok(()) => info!(task = %report.task_id, step = %step, "Applied process task step"),
        Err(err) => error!(task = %report.task_id, step = %step, error = %err, "Process task step failed"),
    }
    report.record(step, result);
}

fn missing(task: &ProcessTask, what: &'static str) -> ProcessError {
    ProcessError::MissingConfiguration {
        task_id: task.id.clone(),
        task_type: task.task_type.to_string(),
        missing: what,
    }
}

fn require<'t>(
    task: &ProcessTask,
    value: Option<&'t str>,
    what: &'static str,
) -> Result<&'t str, ProcessError> {
    value.ok_or_else(|| missing(task, what))
}

/// Applies the side effects of a task being added to the process diagram.
pub struct AddProcessTaskManager<'a, B: ProcessBackend + ?Sized> {
    backend: &'a mut B,
    org: String,
    app: String,
}

impl<'a, B: ProcessBackend + ?Sized> AddProcessTaskManager<'a, B> {
    pub fn new(backend: &'a mut B, org: &str, app: &str) -> Self {
        Self {
            backend,
            org: org.to_string(),
            app: app.to_string(),
        }
    }

    /// Issues the backend mutations for `task`, one by one.
    ///
    /// Missing task configuration is reported before anything is sent. Backend failures
    /// are recorded in the report and do not stop the remaining steps.
    pub fn handle_task_add(&mut self, task: &ProcessTask) -> Result<TaskHandlingReport, ProcessError> {
        let mut report = TaskHandlingReport::new(&task.id, task.task_type.clone());
        match &task.task_type {
            TaskType::Payment => self.add_payment_task(task, &mut report)?,
            TaskType::Signing | TaskType::UserControlledSigning => {
                self.add_signing_task(task, &mut report)?
            }
            TaskType::Data | TaskType::Other(_) => {
                debug!(task = %task.id, task_type = %task.task_type, "Nothing to add for task");
            }
        }
        Ok(report)
    }

    fn add_payment_task(
        &mut self,
        task: &ProcessTask,
        report: &mut TaskHandlingReport,
    ) -> Result<(), ProcessError> {
        let data_type = require(task, task.payment_data_type(), "payment data type")?;
        let receipt_type = require(task, task.receipt_pdf_data_type(), "receipt PDF data type")?;

        execute(&mut *self.backend, report, TaskStep::AddDataType(data_type.to_string()), |b| {
            b.add_data_type(DataType::new(data_type, JSON_CONTENT_TYPE).for_task(&task.id))
        });
        execute(&mut *self.backend, report, TaskStep::AddDataType(receipt_type.to_string()), |b| {
            b.add_data_type(DataType::new(receipt_type, PDF_CONTENT_TYPE).for_task(&task.id))
        });
        let rule = payment_policy_rule(&self.org, &self.app, &task.id);
        execute(&mut *self.backend, report, TaskStep::AddPolicyRule(rule.rule_id.clone()), |b| {
            b.add_policy_rule(rule)
        });
        execute(&mut *self.backend, report, TaskStep::AddLayoutSet(task.id.clone()), |b| {
            b.add_layout_set(LayoutSetConfig::for_task(&task.id, Some(data_type)))
        });
        Ok(())
    }

    fn add_signing_task(
        &mut self,
        task: &ProcessTask,
        report: &mut TaskHandlingReport,
    ) -> Result<(), ProcessError> {
        let signature_type = require(task, task.signature_data_type(), "signature data type")?;
        let signee_states_type = match task.task_type {
            TaskType::UserControlledSigning => Some(require(
                task,
                task.signee_states_data_type(),
                "signee states data type",
            )?),
            _ => None,
        };

        execute(&mut *self.backend, report, TaskStep::AddDataType(signature_type.to_string()), |b| {
            b.add_data_type(DataType::new(signature_type, JSON_CONTENT_TYPE).for_task(&task.id))
        });
        if let Some(states_type) = signee_states_type {
            execute(&mut *self.backend, report, TaskStep::AddDataType(states_type.to_string()), |b| {
                b.add_data_type(DataType::new(states_type, JSON_CONTENT_TYPE).for_task(&task.id))
            });
        }
        execute(&mut *self.backend, report, TaskStep::AddLayoutSet(task.id.clone()), |b| {
            b.add_layout_set(LayoutSetConfig::for_task(&task.id, Some(signature_type)))
        });
        Ok(())
    }
}

/// Applies the side effects of a task being removed from the process diagram.
///
/// Needs the layout sets to find the set bound to the task, and the diagram to fix up
/// the other signing tasks.
pub struct RemoveProcessTaskManager<'a, B: ProcessBackend + ?Sized> {
    backend: &'a mut B,
    org: String,
    app: String,
    layout_sets: LayoutSets,
    diagram: ProcessDiagram,
}

impl<'a, B: ProcessBackend + ?Sized> RemoveProcessTaskManager<'a, B> {
    pub fn new(backend: &'a mut B, org: &str, app: &str) -> Self {
        Self {
            backend,
            org: org.to_string(),
            app: app.to_string(),
            layout_sets: LayoutSets::default(),
            diagram: ProcessDiagram::default(),
        }
    }

    pub fn with_layout_sets(mut self, layout_sets: LayoutSets) -> Self {
        self.layout_sets = layout_sets;
        self
    }

    pub fn with_diagram(mut self, diagram: ProcessDiagram) -> Self {
        self.diagram = diagram;
        self
    }

    pub fn handle_task_remove(
        &mut self,
        task: &ProcessTask,
    ) -> Result<TaskHandlingReport, ProcessError> {
        let mut report = TaskHandlingReport::new(&task.id, task.task_type.clone());
        match &task.task_type {
            TaskType::Data => self.delete_layout_set(task, &mut report),
            TaskType::Payment => self.remove_payment_task(task, &mut report)?,
            TaskType::Signing | TaskType::UserControlledSigning => {
                self.remove_signing_task(task, &mut report)?
            }
            TaskType::Other(_) => {
                debug!(task = %task.id, task_type = %task.task_type, "Nothing to remove for task");
            }
        }
        Ok(report)
    }

    fn delete_layout_set(&mut self, task: &ProcessTask, report: &mut TaskHandlingReport) {
        let Some(layout_set_id) = self.layout_sets.layout_set_id_for_task(&task.id) else {
            debug!(task = %task.id, "No layout set is bound to the task");
            return;
        };
        let layout_set_id = layout_set_id.to_string();
        execute(&mut *self.backend, report, TaskStep::DeleteLayoutSet(layout_set_id.clone()), |b| {
            b.delete_layout_set(&layout_set_id)
        });
    }

    fn delete_data_type(&mut self, data_type: &str, report: &mut TaskHandlingReport) {
        execute(&mut *self.backend, report, TaskStep::DeleteDataType(data_type.to_string()), |b| {
            b.delete_data_type(data_type)
        });
    }

    fn remove_payment_task(
        &mut self,
        task: &ProcessTask,
        report: &mut TaskHandlingReport,
    ) -> Result<(), ProcessError> {
        let data_type = require(task, task.payment_data_type(), "payment data type")?;
        let receipt_type = require(task, task.receipt_pdf_data_type(), "receipt PDF data type")?;

        self.delete_data_type(data_type, report);
        self.delete_data_type(receipt_type, report);
        let rule_id = policy_rule_id(&self.org, &self.app, &task.id);
        execute(&mut *self.backend, report, TaskStep::DeletePolicyRule(rule_id.clone()), |b| {
            b.delete_policy_rule(&rule_id)
        });
        self.delete_layout_set(task, report);
        Ok(())
    }

    fn remove_signing_task(
        &mut self,
        task: &ProcessTask,
        report: &mut TaskHandlingReport,
    ) -> Result<(), ProcessError> {
        let signature_type = require(task, task.signature_data_type(), "signature data type")?;
        let signee_states_type = match task.task_type {
            TaskType::UserControlledSigning => Some(require(
                task,
                task.signee_states_data_type(),
                "signee states data type",
            )?),
            _ => None,
        };

        self.delete_data_type(signature_type, report);
        if let Some(states_type) = signee_states_type {
            self.delete_data_type(states_type, report);
        }
        self.delete_layout_set(task, report);
        if task.task_type == TaskType::Signing {
            self.scrub_unique_signatures(task, signature_type, report);
        }
        Ok(())
    }

    /// Other signing tasks may require their signatures to differ from the ones of the
    /// removed task. That reference would dangle once its data type is gone.
    fn scrub_unique_signatures(
        &mut self,
        removed: &ProcessTask,
        signature_type: &str,
        report: &mut TaskHandlingReport,
    ) {
        let updates: Vec<(String, Vec<String>)> = self
            .diagram
            .signing_tasks()
            .filter(|t| t.id != removed.id)
            .filter_map(|t| {
                let config = t.signature_config.as_ref()?;
                let unique = &config.unique_from_signatures_in_data_types;
                unique.iter().any(|d| d == signature_type).then(|| {
                    let kept = unique.iter().filter(|d| *d != signature_type).cloned().collect();
                    (t.id.clone(), kept)
                })
            })
            .collect();

        for (task_id, kept) in updates {
            let step = TaskStep::ScrubUniqueSignatures {
                task_id: task_id.clone(),
                data_type: signature_type.to_string(),
            };
            execute(&mut *self.backend, report, step, |b| {
                b.update_unique_signature_data_types(&task_id, kept)
            });
        }
    }
}
