//! Command handlers.
//!
//! Each handler resolves the fields it needs through a pipeline, runs the
//! backend call behind a spinner and hands back what should be printed.

use std::future::Future;

use crate::{
    client::ApiError,
    context::CloudConfig,
    error::CliError,
    param_utils::CommandOptions,
    ui::{
        fetch,
        pipeline::{FormResult, Pipeline, Prompter},
    },
};

pub mod assets;
pub mod config;
pub mod connections;
pub mod environments;
pub mod organizations;

/// Everything a handler needs for one invocation.
pub struct Session {
    pub options: CommandOptions,
    pub config: CloudConfig,
    prompter: Box<dyn Prompter>,
}

impl Session {
    pub fn new(options: CommandOptions, config: CloudConfig, prompter: Box<dyn Prompter>) -> Self {
        Self {
            options,
            config,
            prompter,
        }
    }

    /// Org and env from the global options, the starting point of every pipeline.
    pub fn seed(&self) -> FormResult {
        self.options.seed()
    }

    /// Fill in whatever `pipeline` needs that `result` does not hold yet.
    pub async fn resolve(&mut self, pipeline: &Pipeline, mut result: FormResult) -> Result<FormResult, CliError> {
        pipeline.run(&self.config, &mut result, self.prompter.as_mut()).await?;
        Ok(result)
    }

    /// Run one backend call behind a labelled spinner.
    pub async fn fetch<T, F, Fut>(&self, label: impl Into<String>, f: F) -> Result<T, CliError>
    where
        T: Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        match fetch::run(label, self.options.mode, f).await?.into_result()? {
            Some(value) => Ok(value),
            None => Err(CliError::Cancelled),
        }
    }
}
