//! Ordered resolution of the fields a command needs.
//!
//! A [`Pipeline`] runs its [`Step`]s in declaration order against a shared
//! [`FormResult`]. Fields that already hold a value (from flags or
//! configuration) are never asked for again, and the first failing step stops
//! the pipeline. Values resolved before the failure are kept.

use async_trait::async_trait;
use strum::Display;
use thiserror::Error;
use tracing::{debug, trace};

use super::{
    fetch::Outcome,
    form::{self, FormField},
    program::TerminalError,
};
use crate::{client::ApiError, context::CloudConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Org,
    Env,
    Asset,
    AssetType,
    AssetName,
    VpcName,
    Engine,
    EngineVersion,
    OutgoingAsset,
    IncomingAsset,
    Description,
}

/// Values gathered for a command. An empty string means "not resolved yet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormResult {
    pub org: String,
    pub env: String,
    pub asset: String,
    pub asset_type: String,
    pub asset_name: String,
    pub vpc_name: String,
    pub engine: String,
    pub engine_version: String,
    pub outgoing_asset: String,
    pub incoming_asset: String,
    pub description: String,
}

impl FormResult {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Org => &self.org,
            Field::Env => &self.env,
            Field::Asset => &self.asset,
            Field::AssetType => &self.asset_type,
            Field::AssetName => &self.asset_name,
            Field::VpcName => &self.vpc_name,
            Field::Engine => &self.engine,
            Field::EngineVersion => &self.engine_version,
            Field::OutgoingAsset => &self.outgoing_asset,
            Field::IncomingAsset => &self.incoming_asset,
            Field::Description => &self.description,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Org => &mut self.org,
            Field::Env => &mut self.env,
            Field::Asset => &mut self.asset,
            Field::AssetType => &mut self.asset_type,
            Field::AssetName => &mut self.asset_name,
            Field::VpcName => &mut self.vpc_name,
            Field::Engine => &mut self.engine,
            Field::EngineVersion => &mut self.engine_version,
            Field::OutgoingAsset => &mut self.outgoing_asset,
            Field::IncomingAsset => &mut self.incoming_asset,
            Field::Description => &mut self.description,
        }
    }

    pub fn is_set(&self, field: Field) -> bool {
        !self.get(field).is_empty()
    }

    /// Stores the value unless the field already holds one.
    ///
    /// Returns whether the value was stored.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> bool {
        let slot = self.slot(field);
        if !slot.is_empty() {
            return false;
        }
        *slot = value.into();
        true
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A field was left empty
    #[error("{0}")]
    Required(&'static str),
    #[error("failed to load options: {0}")]
    Options(#[from] ApiError),
    #[error("cancelled by the user")]
    Cancelled,
    #[error(transparent)]
    Terminal(#[from] TerminalError),
}

/// Runs a form for a field and reports the value the user settled on.
#[async_trait]
pub trait Prompter: Send {
    async fn prompt(
        &mut self,
        config: &CloudConfig,
        field: FormField,
    ) -> Result<Outcome<String, ApiError>, TerminalError>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn prompt(
        &mut self,
        config: &CloudConfig,
        field: FormField,
    ) -> Result<Outcome<String, ApiError>, TerminalError> {
        form::run(config, field).await
    }
}

/// Resolves one field of the [`FormResult`].
#[derive(Clone, Copy)]
pub struct Step {
    field: Field,
    required: &'static str,
    prompt: fn(&FormResult) -> FormField,
}

impl Step {
    /// `prompt` builds the form from the values resolved so far, `required`
    /// is reported when the user leaves the field empty.
    pub const fn new(field: Field, required: &'static str, prompt: fn(&FormResult) -> FormField) -> Self {
        Self {
            field,
            required,
            prompt,
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub async fn run<P>(
        &self,
        config: &CloudConfig,
        result: &mut FormResult,
        prompter: &mut P,
    ) -> Result<(), PipelineError>
    where
        P: Prompter + ?Sized,
    {
        if result.is_set(self.field) {
            trace!("'{}' already set, skipping", self.field);
            return Ok(());
        }

        let form = (self.prompt)(result);
        match prompter.prompt(config, form).await? {
            Outcome::Succeeded(value) if value.is_empty() => Err(PipelineError::Required(self.required)),
            Outcome::Succeeded(value) => {
                debug!("Resolved '{}'", self.field);
                result.set(self.field, value);
                Ok(())
            }
            Outcome::Failed(error) => Err(error.into()),
            Outcome::Cancelled => Err(PipelineError::Cancelled),
        }
    }
}

#[derive(Clone)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    pub fn fields(&self) -> Vec<Field> {
        self.steps.iter().map(Step::field).collect()
    }

    pub async fn run<P>(
        &self,
        config: &CloudConfig,
        result: &mut FormResult,
        prompter: &mut P,
    ) -> Result<(), PipelineError>
    where
        P: Prompter + ?Sized,
    {
        for step in &self.steps {
            step.run(config, result, prompter).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::fake::FakeClient, context::testing::config_with};
    use std::collections::VecDeque;

    /// Answers prompts from a script and records the titles it was asked.
    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<Outcome<String, ApiError>>,
        asked: Vec<String>,
    }

    impl Scripted {
        fn answering(answers: Vec<Outcome<String, ApiError>>) -> Self {
            Self {
                answers: answers.into(),
                asked: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl Prompter for Scripted {
        async fn prompt(
            &mut self,
            _config: &CloudConfig,
            field: FormField,
        ) -> Result<Outcome<String, ApiError>, TerminalError> {
            self.asked.push(field.title().to_string());
            Ok(self.answers.pop_front().unwrap_or(Outcome::Cancelled))
        }
    }

    const A: Step = Step::new(Field::Org, "You must select an organization", |_| FormField::input("a"));
    const B: Step = Step::new(Field::Env, "You must select an environment", |_| FormField::input("b"));
    const C: Step = Step::new(Field::Asset, "You must select an asset", |_| FormField::input("c"));

    fn config() -> CloudConfig {
        config_with(FakeClient::default()).0
    }

    fn succeeded(value: &str) -> Outcome<String, ApiError> {
        Outcome::Succeeded(value.to_string())
    }

    #[tokio::test]
    async fn fills_fields_in_order() {
        let mut prompter = Scripted::answering(vec![succeeded("o"), succeeded("e"), succeeded("x")]);
        let mut result = FormResult::default();

        Pipeline::new([A, B, C])
            .run(&config(), &mut result, &mut prompter)
            .await
            .unwrap();

        assert_eq!(prompter.asked, vec!["a", "b", "c"]);
        assert_eq!((result.org.as_str(), result.env.as_str(), result.asset.as_str()), ("o", "e", "x"));
    }

    #[tokio::test]
    async fn fully_populated_result_prompts_nothing() {
        let mut prompter = Scripted::default();
        let mut result = FormResult {
            org: "o".into(),
            env: "e".into(),
            asset: "x".into(),
            ..Default::default()
        };
        let before = result.clone();

        Pipeline::new([A, B, C])
            .run(&config(), &mut result, &mut prompter)
            .await
            .unwrap();

        assert!(prompter.asked.is_empty());
        assert_eq!(result, before);
    }

    #[tokio::test]
    async fn first_failure_stops_the_pipeline() {
        let failure = Outcome::Failed(ApiError::UnexpectedStatus {
            status: 503,
            body: "unavailable".to_string(),
        });
        let mut prompter = Scripted::answering(vec![succeeded("o"), failure, succeeded("never")]);
        let mut result = FormResult::default();

        let error = Pipeline::new([A, B, C])
            .run(&config(), &mut result, &mut prompter)
            .await
            .unwrap_err();

        assert!(matches!(error, PipelineError::Options(_)));
        assert_eq!(prompter.asked, vec!["a", "b"]);
        assert_eq!(result.org, "o");
        assert!(result.asset.is_empty());
    }

    #[tokio::test]
    async fn empty_value_reports_the_field_message() {
        let mut prompter = Scripted::answering(vec![succeeded("")]);
        let mut result = FormResult::default();

        let error = Pipeline::new([A, B])
            .run(&config(), &mut result, &mut prompter)
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "You must select an organization");
        assert_eq!(prompter.asked.len(), 1);
    }

    #[tokio::test]
    async fn cancellation_is_distinct_from_failure() {
        let mut prompter = Scripted::answering(vec![Outcome::Cancelled]);
        let mut result = FormResult::default();

        let error = Pipeline::new([A])
            .run(&config(), &mut result, &mut prompter)
            .await
            .unwrap_err();

        assert!(matches!(error, PipelineError::Cancelled));
    }

    #[test]
    fn set_never_overwrites() {
        let mut result = FormResult::default();
        assert!(result.set(Field::VpcName, "main"));
        assert!(!result.set(Field::VpcName, "other"));
        assert_eq!(result.get(Field::VpcName), "main");
        assert!(!result.is_set(Field::Engine));
    }

    #[test]
    fn pipeline_lists_its_fields() {
        assert_eq!(Pipeline::new([B, C]).fields(), vec![Field::Env, Field::Asset]);
        assert_eq!(Field::EngineVersion.to_string(), "engine_version");
    }
}
