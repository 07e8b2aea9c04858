//! Printable results of the commands.

use serde::Serialize;

use crate::{
    format::{to_json, Cell, Formattable, FormattingError, OutputFormat, Table},
    model::{Asset, AssetBundle, AssetOperation, Connection, Environment, Organization},
};

/// Shown for optional attributes the API did not report
const UNKNOWN: &str = "unknown";

/// Everything a command can print.
///
/// JSON output is the API payload itself, table and CSV output share the
/// same columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultView {
    Organizations(Vec<Organization>),
    Organization(Organization),
    Environments(Vec<Environment>),
    Environment(Environment),
    Assets(Vec<Asset>),
    Asset(Asset),
    AssetBundles(Vec<AssetBundle>),
    Operations(Vec<AssetOperation>),
    Connection(Connection),
}

fn organization_table<'a>(organizations: impl IntoIterator<Item = &'a Organization>) -> Table {
    organizations.into_iter().fold(
        Table::new(&["Organization Id", "Organization Name", "AWS OU"]),
        |table, org| {
            table.row([
                Cell::from(org.id.as_str()),
                Cell::from(org.name.as_str()),
                Cell::from(org.aws_ou.as_deref().unwrap_or(UNKNOWN)),
            ])
        },
    )
}

fn environment_table<'a>(environments: impl IntoIterator<Item = &'a Environment>) -> Table {
    environments.into_iter().fold(
        Table::new(&["Environment Id", "Environment Name", "AWS Account Id"]),
        |table, env| {
            table.row([
                Cell::from(env.id.as_str()),
                Cell::from(env.name.as_str()),
                Cell::from(env.aws_account_id.as_deref().unwrap_or(UNKNOWN)),
            ])
        },
    )
}

pub fn asset_table<'a>(assets: impl IntoIterator<Item = &'a Asset>) -> Table {
    assets.into_iter().fold(
        Table::new(&["Id", "Status", "Name", "Cloud", "Type", "Version"]),
        |table, asset| {
            table.row([
                Cell::from(asset.id.as_str()),
                Cell::colored(asset.status.to_string(), asset.status.health()),
                Cell::from(asset.name()),
                Cell::from(asset.cloud()),
                Cell::from(asset.asset_type()),
                Cell::from(asset.version()),
            ])
        },
    )
}

fn bundle_table(bundles: &[AssetBundle]) -> Table {
    bundles
        .iter()
        .fold(Table::new(&["Id", "Name", "Description"]), |table, bundle| {
            table.row([
                Cell::from(bundle.identifier.as_str()),
                Cell::from(bundle.name.as_str()),
                Cell::from(bundle.description.as_str()),
            ])
        })
}

pub fn operation_table(operations: &[AssetOperation]) -> Table {
    operations
        .iter()
        .fold(Table::new(&["Id", "Type", "Status"]), |table, op| {
            table.row([
                Cell::from(op.id.as_str()),
                Cell::from(op.operation_type.as_str()),
                Cell::colored(op.status.to_string(), op.status.health()),
            ])
        })
}

fn connection_table(connection: &Connection) -> Table {
    Table::new(&["Id", "Connection"]).row([
        Cell::from(connection.id.as_str()),
        Cell::from(format!(
            "{} => {}",
            connection.outgoing_asset_id, connection.incoming_asset_id
        )),
    ])
}

impl ResultView {
    pub fn table(&self) -> Table {
        match self {
            ResultView::Organizations(organizations) => organization_table(organizations),
            ResultView::Organization(organization) => organization_table([organization]),
            ResultView::Environments(environments) => environment_table(environments),
            ResultView::Environment(environment) => environment_table([environment]),
            ResultView::Assets(assets) => asset_table(assets),
            ResultView::Asset(asset) => asset_table([asset]),
            ResultView::AssetBundles(bundles) => bundle_table(bundles),
            ResultView::Operations(operations) => operation_table(operations),
            ResultView::Connection(connection) => connection_table(connection),
        }
    }
}

impl Formattable for ResultView {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        match f {
            OutputFormat::Json(options) => to_json(self, options),
            OutputFormat::Csv(options) => self.table().to_csv(options.with_headers),
            OutputFormat::Table(_) => Ok(self.table().render()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        format::OutputFormatOptions,
        model::{AssetParameters, AssetStatus, OperationStatus},
    };
    use serde_json::{json, Map};

    fn asset() -> Asset {
        let mut data = Map::new();
        data.insert("name".to_string(), json!("db"));
        Asset {
            id: "a1".to_string(),
            asset: "aws__rds__latest".to_string(),
            status: AssetStatus::Deploying,
            current_asset_parameters: AssetParameters { data },
        }
    }

    fn csv() -> OutputFormat {
        OutputFormat::Csv(OutputFormatOptions {
            with_headers: true,
            pretty: false,
        })
    }

    #[test]
    fn assets_show_kind_parts_and_status() {
        let output = ResultView::Assets(vec![asset()]).format(&csv()).unwrap();
        assert_eq!(output, "Id,Status,Name,Cloud,Type,Version\na1,DEPLOYING,db,aws,rds,latest\n");
    }

    #[test]
    fn json_is_the_payload_itself() {
        let output = ResultView::Asset(asset())
            .format(&OutputFormat::Json(Default::default()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["id"], "a1");
        assert_eq!(value["status"], "DEPLOYING");
    }

    #[test]
    fn missing_environment_account_is_unknown() {
        let env = Environment {
            id: "e1".to_string(),
            name: "prod".to_string(),
            description: String::new(),
            organization_id: None,
            aws_account_id: None,
        };
        let output = ResultView::Environment(env).format(&csv()).unwrap();
        assert!(output.ends_with("e1,prod,unknown\n"));
    }

    #[test]
    fn operations_table_lists_every_operation() {
        let operations = vec![
            AssetOperation {
                id: "op1".to_string(),
                operation_type: "APPLY".to_string(),
                status: OperationStatus::Complete,
            },
            AssetOperation {
                id: "op2".to_string(),
                operation_type: "DESTROY".to_string(),
                status: OperationStatus::Failed,
            },
        ];

        let table = operation_table(&operations);
        assert_eq!(table.rows().len(), 2);
        assert!(table.render().contains("DESTROY"));
    }

    #[test]
    fn connection_shows_direction() {
        let connection = Connection {
            id: "c1".to_string(),
            description: "db access".to_string(),
            outgoing_asset_id: "a1".to_string(),
            incoming_asset_id: "a2".to_string(),
        };
        let output = ResultView::Connection(connection)
            .format(&OutputFormat::Csv(Default::default()))
            .unwrap();
        assert_eq!(output, "c1,a1 => a2\n");
    }
}
