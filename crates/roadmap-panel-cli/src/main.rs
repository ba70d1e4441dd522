mod console;
mod store;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use console::{ArgDialog, ConsoleNotifier};
use roadmap_panel::{
    CachingRoadmapStore, CachingScenarioStore, CloneOutcome, EntityKind, PanelConfig,
    PanelServices, ParentEntityRef, Roadmap, RoadmapsPanel, Scenario, ViewState,
};
use std::path::PathBuf;
use std::sync::Arc;
use store::{Fixture, FixtureStore};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("roadmap-panel")
        .version(roadmap_panel::VERSION)
        .about("Drive a roadmaps panel against fixture data")
        .arg(
            Arg::new("fixture")
                .long("fixture")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON file with roadmaps, scenarios and entity links"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML panel configuration"),
        )
        .arg(
            Arg::new("kind")
                .long("kind")
                .default_value("ORG_UNIT")
                .value_parser(parse_kind)
                .help("Kind of the parent entity"),
        )
        .arg(
            Arg::new("id")
                .long("id")
                .required(true)
                .value_parser(value_parser!(i64))
                .help("Id of the parent entity"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(Command::new("show").about("Load and print the panel state"))
        .subcommand(
            Command::new("add")
                .about("Open the add-scenario view for a roadmap")
                .arg(scenario_or_roadmap_arg("roadmap")),
        )
        .subcommand(
            Command::new("select")
                .about("Inspect a scenario")
                .arg(scenario_or_roadmap_arg("scenario")),
        )
        .subcommand(
            Command::new("clone")
                .about("Clone a scenario")
                .arg(scenario_or_roadmap_arg("scenario"))
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Name for the copy; omit to decline the prompt"),
                ),
        )
}

fn scenario_or_roadmap_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .value_parser(value_parser!(i64))
}

fn parse_kind(raw: &str) -> Result<EntityKind, String> {
    let normalised = raw.trim().to_uppercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalised))
        .map_err(|_| format!("unknown entity kind: {raw}"))
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("json-logs"));

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => PanelConfig::from_toml_file(path)?,
        None => PanelConfig::default(),
    };
    let fixture_path = matches
        .get_one::<PathBuf>("fixture")
        .context("--fixture is required")?;
    let kind = *matches
        .get_one::<EntityKind>("kind")
        .context("--kind is required")?;
    let id = *matches.get_one::<i64>("id").context("--id is required")?;

    let clone_name = match matches.subcommand() {
        Some(("clone", args)) => args.get_one::<String>("name").cloned(),
        _ => None,
    };

    let store = FixtureStore::new(Fixture::from_file(fixture_path)?);
    let services = PanelServices::new(
        Arc::new(CachingRoadmapStore::new(store.clone(), config.cache)),
        Arc::new(CachingScenarioStore::new(store, config.cache)),
        Arc::new(ArgDialog::new(clone_name)),
        Arc::new(ConsoleNotifier),
    );
    let panel = RoadmapsPanel::new(ParentEntityRef::new(kind, id), services, config);

    panel.init().await?;
    run_intent(&panel, &matches).await?;

    println!("{}", serde_json::to_string_pretty(&panel.state())?);
    Ok(())
}

async fn run_intent(panel: &RoadmapsPanel, matches: &ArgMatches) -> anyhow::Result<()> {
    let state = panel.state();
    match matches.subcommand() {
        Some(("add", args)) => {
            let roadmap = find_roadmap(&state, required_id(args, "roadmap")?)?;
            panel.on_add_scenario(&roadmap);
        }
        Some(("select", args)) => {
            let scenario = find_scenario(&state, required_id(args, "scenario")?)?;
            let roadmap = find_roadmap(&state, scenario.roadmap_id.0)?;
            panel.on_select_scenario(&scenario, &roadmap);
        }
        Some(("clone", args)) => {
            let scenario = find_scenario(&state, required_id(args, "scenario")?)?;
            if let CloneOutcome::Cloned { name, reload } =
                panel.on_clone_scenario(&scenario).await?
            {
                tracing::info!(name = %name, scenarios = reload.scenario_count, "clone complete");
            }
        }
        _ => {}
    }
    Ok(())
}

fn required_id(args: &ArgMatches, name: &str) -> anyhow::Result<i64> {
    args.get_one::<i64>(name)
        .copied()
        .with_context(|| format!("--{name} is required"))
}

fn find_roadmap(state: &ViewState, id: i64) -> anyhow::Result<Roadmap> {
    state
        .roadmaps
        .iter()
        .find(|r| r.id.0 == id)
        .cloned()
        .with_context(|| format!("roadmap {id} is not shown in this panel"))
}

fn find_scenario(state: &ViewState, id: i64) -> anyhow::Result<Scenario> {
    state
        .scenarios
        .iter()
        .find(|s| s.id.0 == id)
        .cloned()
        .with_context(|| format!("scenario {id} is not shown in this panel"))
}
