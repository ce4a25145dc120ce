//! Aggregation pipelines and their in-process evaluator
//!
//! Supports the subset of stages needed for count-and-slice pagination:
//! `Match`, a single null-keyed `Group`, and `Project` with `$slice`.

use serde_json::Value;

use super::{Document, Filter};
use crate::domain::DomainError;

/// Group accumulator
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Number of input documents (`{$sum: 1}`)
    Count,
    /// Every input document, in input order (`{$push: "$$ROOT"}`)
    PushRoot,
}

/// Group stage with a null grouping key: all inputs collapse into one output
/// document, and zero inputs produce zero outputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStage {
    pub accumulators: Vec<(String, Accumulator)>,
}

impl GroupStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, accumulator: Accumulator) -> Self {
        self.accumulators.push((field.into(), accumulator));
        self
    }
}

/// Projected field
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectField {
    /// Copy the field through unchanged
    Include,
    /// `{$slice: [source, position, n]}`
    Slice {
        source: String,
        position: i64,
        n: i64,
    },
}

/// Project stage; only the listed fields appear in the output (`_id` excluded unless listed)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectStage {
    pub fields: Vec<(String, ProjectField)>,
}

impl ProjectStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), ProjectField::Include));
        self
    }

    pub fn slice(
        mut self,
        field: impl Into<String>,
        source: impl Into<String>,
        position: i64,
        n: i64,
    ) -> Self {
        self.fields.push((
            field.into(),
            ProjectField::Slice {
                source: source.into(),
                position,
                n,
            },
        ));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    Group(GroupStage),
    Project(ProjectStage),
}

/// Ordered list of stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Splits off a leading `Match` stage so backends can push it down
    pub fn split_leading_match(&self) -> (Filter, &[Stage]) {
        match self.stages.split_first() {
            Some((Stage::Match(filter), rest)) => (filter.clone(), rest),
            _ => (Filter::all(), &self.stages),
        }
    }

    /// Runs every stage over the given documents
    pub fn evaluate(&self, documents: Vec<Document>) -> Result<Vec<Document>, DomainError> {
        evaluate_stages(&self.stages, documents)
    }
}

/// Runs a sequence of stages over the given documents
pub(crate) fn evaluate_stages(
    stages: &[Stage],
    mut documents: Vec<Document>,
) -> Result<Vec<Document>, DomainError> {
    for stage in stages {
        documents = match stage {
            Stage::Match(filter) => documents
                .into_iter()
                .filter(|doc| filter.matches(doc))
                .collect(),
            Stage::Group(group) => apply_group(group, documents),
            Stage::Project(project) => documents
                .iter()
                .map(|doc| apply_project(project, doc))
                .collect::<Result<Vec<_>, _>>()?,
        };
    }

    Ok(documents)
}

fn apply_group(group: &GroupStage, documents: Vec<Document>) -> Vec<Document> {
    if documents.is_empty() {
        return Vec::new();
    }

    let mut output = Document::new();
    output.insert("_id".to_string(), Value::Null);

    for (field, accumulator) in &group.accumulators {
        let value = match accumulator {
            Accumulator::Count => Value::from(documents.len() as u64),
            Accumulator::PushRoot => Value::Array(
                documents
                    .iter()
                    .map(|doc| Value::Object(doc.clone()))
                    .collect(),
            ),
        };
        output.insert(field.clone(), value);
    }

    vec![output]
}

fn apply_project(project: &ProjectStage, document: &Document) -> Result<Document, DomainError> {
    let mut output = Document::new();

    for (field, spec) in &project.fields {
        match spec {
            ProjectField::Include => {
                if let Some(value) = document.get(field) {
                    output.insert(field.clone(), value.clone());
                }
            }
            ProjectField::Slice {
                source,
                position,
                n,
            } => {
                let value = match document.get(source) {
                    None | Some(Value::Null) => Value::Null,
                    Some(Value::Array(values)) => Value::Array(slice(values, *position, *n)?),
                    Some(_) => {
                        return Err(DomainError::storage(format!(
                            "$slice source '{}' is not an array",
                            source
                        )));
                    }
                };
                output.insert(field.clone(), value);
            }
        }
    }

    Ok(output)
}

/// `$slice` with an explicit position
///
/// A negative position counts back from the end and is clamped to the first
/// element; a position past the end yields an empty slice. `n` must be positive.
pub fn slice(values: &[Value], position: i64, n: i64) -> Result<Vec<Value>, DomainError> {
    if n <= 0 {
        return Err(DomainError::validation(format!(
            "$slice count must be positive, got {}",
            n
        )));
    }

    let len = values.len() as i64;
    let start = if position < 0 {
        len.saturating_add(position).max(0)
    } else {
        position.min(len)
    };
    let end = start.saturating_add(n).min(len);

    Ok(values[start as usize..end as usize].to_vec())
}
