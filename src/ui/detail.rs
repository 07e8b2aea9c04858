//! Full-screen view of one asset with its operations, refreshed periodically.

use std::time::Duration;

use crossterm::event::Event;

use super::{
    fetch::{Fetch, FetchMsg, FetchState, Operation, Outcome},
    program::{is_quit, key_press, Cmd, Mode, Model, Program, TerminalError},
    styles,
};
use crate::{
    client::ApiError,
    context::CloudConfig,
    model::{Asset, AssetOperation},
    view::operation_table,
};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(3);
const REFRESH_LABEL: &str = "refreshing";

pub enum DetailMsg {
    Input(Event),
    Operations(FetchMsg<Vec<AssetOperation>, ApiError>),
}

impl From<Event> for DetailMsg {
    fn from(event: Event) -> Self {
        DetailMsg::Input(event)
    }
}

pub struct Detail {
    asset: Asset,
    operations: Vec<AssetOperation>,
    fetch: Fetch<Vec<AssetOperation>, ApiError>,
}

impl Detail {
    pub fn new(config: &CloudConfig, org_id: &str, asset: Asset) -> Self {
        let client = config.client();
        let org_id = org_id.to_string();
        let asset_id = asset.id.clone();
        let operation = Operation::new(move || {
            let client = client.clone();
            let org_id = org_id.clone();
            let asset_id = asset_id.clone();
            async move { client.list_operations_by_asset(&org_id, &asset_id).await }
        });

        Self {
            asset,
            operations: Vec::new(),
            fetch: Fetch::polling(REFRESH_LABEL, REFRESH_INTERVAL, operation),
        }
    }

    /// Operations as of the latest successful refresh.
    pub fn operations(&self) -> &[AssetOperation] {
        &self.operations
    }

    pub fn refreshes(&self) -> usize {
        self.fetch.invocations()
    }

    /// Leaving the screen is a success, a failed refresh is not.
    pub fn into_outcome(self) -> Outcome<(), ApiError> {
        match self.fetch.into_outcome() {
            Outcome::Failed(error) => Outcome::Failed(error),
            _ => Outcome::Succeeded(()),
        }
    }

    fn bio_view(&self) -> String {
        let status = styles::health(&self.asset.status.to_string(), self.asset.status.health());
        [
            styles::highlight(self.asset.name()),
            String::new(),
            format!("{}: {}", styles::title("Id"), self.asset.id),
            format!("{}: {}", styles::title("Asset"), self.asset.asset),
            format!("{}: {}", styles::title("Status"), status),
        ]
        .join("\n")
    }
}

impl Model for Detail {
    type Msg = DetailMsg;

    fn init(&mut self) -> Cmd<DetailMsg> {
        self.fetch.init().map(DetailMsg::Operations)
    }

    fn update(&mut self, msg: DetailMsg) -> Cmd<DetailMsg> {
        match msg {
            DetailMsg::Input(event) => match key_press(&event) {
                Some(key) if is_quit(key) => Cmd::Quit,
                _ => Cmd::None,
            },
            DetailMsg::Operations(msg) => {
                let cmd = self.fetch.update(msg).map(DetailMsg::Operations);
                match self.fetch.state() {
                    FetchState::Succeeded(operations) => self.operations = operations.clone(),
                    FetchState::Failed(_) => return Cmd::Quit,
                    _ => {}
                }
                cmd
            }
        }
    }

    fn view(&self) -> String {
        format!(
            "{}\n\n\n{}  {}\n{}\n\n {}",
            self.bio_view(),
            styles::highlight("Operations"),
            self.fetch.view(),
            operation_table(&self.operations).render(),
            styles::help("esc: exit"),
        )
    }
}

/// Show the asset on the alternate screen until the user leaves.
pub async fn run(
    config: &CloudConfig,
    org_id: &str,
    asset: Asset,
    mode: Mode,
) -> Result<Outcome<(), ApiError>, TerminalError> {
    let detail = Program::new(Detail::new(config, org_id, asset))
        .with_alt_screen()
        .run_in(mode)
        .await?;
    Ok(detail.into_outcome())
}
