//! Resolving organization and environment through real forms driven by keys.

use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use cloud_cli::{
    client::{ApiError, CloudClient},
    configuration::DEFAULT_AUTH_DOMAIN,
    context::{CloudConfig, Settings},
    forms,
    model::{
        Asset, AssetBundle, AssetInput, AssetOperation, Connection, ConnectionInput, Environment, EnvironmentInput,
        Organization, OrganizationInput,
    },
    ui::{
        fetch::Outcome,
        form::{Form, FormField},
        pipeline::{FormResult, PipelineError, Prompter},
        program::{Program, TerminalError},
    },
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use futures::channel::mpsc;
use tokio::time::Instant;
use url::Url;

/// Two organizations, one environment; records which organization environments were listed for.
#[derive(Default)]
struct Backend {
    environments_listed_for: Mutex<Vec<String>>,
}

fn unsupported() -> ApiError {
    ApiError::UnexpectedStatus {
        status: 501,
        body: "not supported by this backend".to_string(),
    }
}

#[async_trait]
impl CloudClient for Backend {
    async fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        Ok(vec![
            Organization {
                id: "o1".to_string(),
                name: "Acme".to_string(),
                aws_ou: None,
                baa_status: None,
            },
            Organization {
                id: "o2".to_string(),
                name: "Initech".to_string(),
                aws_ou: None,
                baa_status: None,
            },
        ])
    }

    async fn create_organization(&self, _: &str, _: &OrganizationInput) -> Result<Organization, ApiError> {
        Err(unsupported())
    }

    async fn find_organization(&self, _: &str) -> Result<Organization, ApiError> {
        Err(unsupported())
    }

    async fn list_environments(&self, org_id: &str) -> Result<Vec<Environment>, ApiError> {
        self.environments_listed_for.lock().unwrap().push(org_id.to_string());
        Ok(vec![Environment {
            id: "e1".to_string(),
            name: "production".to_string(),
            description: String::new(),
            organization_id: Some(org_id.to_string()),
            aws_account_id: None,
        }])
    }

    async fn create_environment(&self, _: &str, _: &EnvironmentInput) -> Result<Environment, ApiError> {
        Err(unsupported())
    }

    async fn destroy_environment(&self, _: &str, _: &str) -> Result<(), ApiError> {
        Err(unsupported())
    }

    async fn list_asset_bundles(&self, _: &str, _: &str) -> Result<Vec<AssetBundle>, ApiError> {
        Err(unsupported())
    }

    async fn create_asset(&self, _: &str, _: &str, _: &AssetInput) -> Result<Asset, ApiError> {
        Err(unsupported())
    }

    async fn list_assets(&self, _: &str, _: &str) -> Result<Vec<Asset>, ApiError> {
        Err(unsupported())
    }

    async fn describe_asset(&self, _: &str, _: &str, _: &str) -> Result<Asset, ApiError> {
        Err(unsupported())
    }

    async fn destroy_asset(&self, _: &str, _: &str, _: &str) -> Result<(), ApiError> {
        Err(unsupported())
    }

    async fn list_operations_by_asset(&self, _: &str, _: &str) -> Result<Vec<AssetOperation>, ApiError> {
        Err(unsupported())
    }

    async fn create_connection(
        &self,
        _: &str,
        _: &str,
        _: &str,
        _: &ConnectionInput,
    ) -> Result<Connection, ApiError> {
        Err(unsupported())
    }
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Runs each form headless, feeding it the next script of timed keys.
struct KeyScript {
    scripts: Vec<Vec<(Duration, Event)>>,
    screens: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Prompter for KeyScript {
    async fn prompt(
        &mut self,
        config: &CloudConfig,
        field: FormField,
    ) -> Result<Outcome<String, ApiError>, TerminalError> {
        let script = if self.scripts.is_empty() {
            Vec::new()
        } else {
            self.scripts.remove(0)
        };

        let (tx, rx) = mpsc::unbounded();
        tokio::spawn(async move {
            let start = Instant::now();
            for (at, event) in script {
                tokio::time::sleep_until(start + at).await;
                if tx.unbounded_send(Ok::<_, io::Error>(event)).is_err() {
                    break;
                }
            }
        });

        let mut output = Vec::new();
        let form = Program::new(Form::new(config, field)).run_with(rx, &mut output).await?;
        self.screens
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(&output).into_owned());
        Ok(form.into_outcome())
    }
}

fn config(backend: Arc<Backend>) -> CloudConfig {
    CloudConfig::new(
        backend,
        Settings {
            api_domain: Url::parse("http://localhost:9").unwrap(),
            auth_domain: DEFAULT_AUTH_DOMAIN.to_string(),
            token: None,
            debug: false,
        },
    )
}

#[tokio::test(start_paused = true)]
async fn second_organization_then_only_environment() {
    let backend = Arc::new(Backend::default());
    let screens = Arc::new(Mutex::new(Vec::new()));
    let mut prompter = KeyScript {
        scripts: vec![vec![
            (Duration::from_millis(100), key(KeyCode::Down)),
            (Duration::from_millis(200), key(KeyCode::Enter)),
        ]],
        screens: screens.clone(),
    };
    let mut result = FormResult::default();

    forms::environment()
        .run(&config(backend.clone()), &mut result, &mut prompter)
        .await
        .unwrap();

    assert_eq!(result.org, "o2");
    assert_eq!(result.env, "e1");
    assert_eq!(*backend.environments_listed_for.lock().unwrap(), vec!["o2"]);

    let screens = screens.lock().unwrap();
    assert_eq!(screens.len(), 2);
    assert!(screens[0].contains("Initech"));
    assert!(screens[1].contains("(only option available)"));
}

#[tokio::test(start_paused = true)]
async fn preset_organization_is_not_asked_for() {
    let backend = Arc::new(Backend::default());
    let screens = Arc::new(Mutex::new(Vec::new()));
    let mut prompter = KeyScript {
        scripts: Vec::new(),
        screens: screens.clone(),
    };
    let mut result = FormResult {
        org: "o1".to_string(),
        ..Default::default()
    };

    forms::environment()
        .run(&config(backend.clone()), &mut result, &mut prompter)
        .await
        .unwrap();

    assert_eq!(result.env, "e1");
    assert_eq!(screens.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn leaving_a_choice_unmade_names_the_field() {
    let backend = Arc::new(Backend::default());
    let mut prompter = KeyScript {
        scripts: Vec::new(),
        screens: Arc::new(Mutex::new(Vec::new())),
    };
    let mut result = FormResult::default();

    let error = forms::environment()
        .run(&config(backend.clone()), &mut result, &mut prompter)
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::Required(_)));
    assert_eq!(error.to_string(), "You must select an organization");
    assert!(backend.environments_listed_for.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn escape_cancels_the_pipeline() {
    let backend = Arc::new(Backend::default());
    let mut prompter = KeyScript {
        scripts: vec![vec![(Duration::from_millis(100), key(KeyCode::Esc))]],
        screens: Arc::new(Mutex::new(Vec::new())),
    };
    let mut result = FormResult::default();

    let error = forms::environment()
        .run(&config(backend), &mut result, &mut prompter)
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::Cancelled));
    assert!(result.org.is_empty());
}
