//! Catalogue of task definitions keyed by id.

use std::collections::HashMap;

use thiserror::Error;

use super::catalogue::builtin_tasks;
use super::task::TaskDefinition;
use crate::config::ModelConfig;

/// Registration and lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("task `{0}` is already registered")]
    DuplicateTask(String),

    #[error("unknown task `{0}`")]
    UnknownTask(String),
}

/// Task definitions in registration order, indexed by id.
///
/// ```
/// use kurdish_ai_tools::config::ModelConfig;
/// use kurdish_ai_tools::prompt::TemplateRegistry;
///
/// let registry = TemplateRegistry::builtin(&ModelConfig::default());
/// let task = registry.lookup("summarize-text").unwrap();
/// assert_eq!(task.model(), "gemini-2.5-flash");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    tasks: Vec<TaskDefinition>,
    index: HashMap<String, usize>,
}

impl TemplateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in task.
    pub fn builtin(models: &ModelConfig) -> Self {
        let mut registry = Self::new();
        for task in builtin_tasks(models) {
            if let Err(e) = registry.register(task) {
                log::error!("skipping built-in task: {e}");
            }
        }
        registry
    }

    /// Add `task`.  A duplicate id is rejected and the registry is left
    /// untouched.
    pub fn register(&mut self, task: TaskDefinition) -> Result<(), RegistryError> {
        if self.index.contains_key(task.id()) {
            return Err(RegistryError::DuplicateTask(task.id().to_string()));
        }
        self.index.insert(task.id().to_string(), self.tasks.len());
        self.tasks.push(task);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Result<&TaskDefinition, RegistryError> {
        self.index
            .get(id)
            .map(|&i| &self.tasks[i])
            .ok_or_else(|| RegistryError::UnknownTask(id.to_string()))
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(TaskDefinition::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
