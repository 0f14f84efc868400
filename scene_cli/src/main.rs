use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use scene_tools::assets::SceneSnapshot;
use scene_tools::core::config::{BlockOrder, Config, FloatFormat, ToolsConfig};
use scene_tools::foundation::logging;
use scene_tools::plugin::{
    initialize_plugin, uninitialize_plugin, CommandOutput, CommandRegistry, EXPORT_SCENE_COMMAND,
    MESH_TO_BOXES_COMMAND,
};
use scene_tools::scene::{InMemoryScene, SceneReader, SceneWriter};
use scene_tools::script::SceneScriptReader;

fn snapshot_arg() -> Arg {
    Arg::new("snapshot")
        .value_name("SNAPSHOT")
        .help("Scene snapshot file (.ron or .toml)")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
}

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("Tools configuration file (.toml or .ron)")
        .value_parser(clap::value_parser!(PathBuf))
}

fn main() -> Result<()> {
    let matches = Command::new("scene_cli")
        .about("Exports scene scripts and converts mesh faces to boxes for the bx engine")
        .subcommand_required(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (error, warn, info, debug, trace)")
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .about("Write the scene's spheres, boxes and leaf cameras as a scene script")
                .arg(snapshot_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("root")
                        .short('r')
                        .long("root")
                        .value_name("DIR")
                        .help("Content root (defaults to the BX_ROOT environment variable)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("order")
                        .long("order")
                        .value_name("ORDER")
                        .help("Block order")
                        .value_parser(["cameras-first", "design-blocks-first"]),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .help("Write integral values without a trailing .0")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("mesh-to-boxes")
                .about("Create one box per face of the selected mesh")
                .arg(snapshot_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("select")
                        .short('s')
                        .long("select")
                        .value_name("NAME")
                        .help("Object to convert (overrides the snapshot selection)"),
                )
                .arg(
                    Arg::new("save")
                        .long("save")
                        .value_name("FILE")
                        .help("Write the edited scene to a new snapshot")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Read a scene script and list its blocks")
                .arg(
                    Arg::new("script")
                        .value_name("FILE")
                        .help("Scene script file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Fail on the first malformed line")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("export", args)) => run_export(args),
        Some(("mesh-to-boxes", args)) => run_mesh_to_boxes(args),
        Some(("inspect", args)) => run_inspect(args),
        _ => Ok(()),
    }
}

/// Load the configuration and start logging
///
/// `--log-level` wins over the configured level.
fn load_config(args: &ArgMatches) -> Result<ToolsConfig> {
    let path = args.try_get_one::<PathBuf>("config").ok().flatten();
    let config = ToolsConfig::load_or_default(path)
        .with_context(|| format!("Failed to load configuration {:?}", path))?;

    let level = args
        .get_one::<String>("log-level")
        .map_or(config.logging.level.as_str(), String::as_str);
    logging::init_with_level(level);

    config.validate().map_err(anyhow::Error::msg).context("Invalid configuration")?;
    Ok(config)
}

fn load_scene(args: &ArgMatches) -> Result<(PathBuf, InMemoryScene)> {
    let path = args
        .get_one::<PathBuf>("snapshot")
        .context("Missing snapshot path")?
        .clone();
    let scene = SceneSnapshot::load_scene(&path)
        .with_context(|| format!("Failed to load scene snapshot {}", path.display()))?;
    log::info!("Loaded {} node(s) from {}", scene.len(), path.display());
    Ok((path, scene))
}

fn run_export(args: &ArgMatches) -> Result<()> {
    let mut config = load_config(args)?;
    if let Some(root) = args.get_one::<PathBuf>("root") {
        config.export = config.export.with_root(root.clone());
    }
    match args.get_one::<String>("order").map(String::as_str) {
        Some("cameras-first") => config.export.block_order = BlockOrder::CamerasFirst,
        Some("design-blocks-first") => config.export.block_order = BlockOrder::DesignBlocksFirst,
        _ => {}
    }
    if args.get_flag("compact") {
        config.export.float_format = FloatFormat::Compact;
    }

    let (_, mut scene) = load_scene(args)?;
    let output = run_command(&config, EXPORT_SCENE_COMMAND, &mut scene)?;
    if let CommandOutput::Exported(report) = output {
        println!(
            "Exported {} design block(s) and {} camera(s) to {}",
            report.design_blocks,
            report.cameras,
            report.path.display()
        );
    }
    Ok(())
}

fn run_mesh_to_boxes(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let (_, mut scene) = load_scene(args)?;

    if let Some(name) = args.get_one::<String>("select") {
        let node = scene
            .find(name)
            .with_context(|| format!("No object named '{name}'"))?;
        scene.select(node)?;
    }

    let output = run_command(&config, MESH_TO_BOXES_COMMAND, &mut scene)?;
    if let CommandOutput::Converted(report) = output {
        println!(
            "Created {} box(es) from '{}'",
            report.boxes.len(),
            scene.node_name(report.mesh)?
        );
    }

    if let Some(save) = args.get_one::<PathBuf>("save") {
        SceneSnapshot::from_scene(&scene)?
            .save_to_file(save)
            .with_context(|| format!("Failed to save scene snapshot {}", save.display()))?;
        println!("Saved scene to {}", save.display());
    }
    Ok(())
}

fn run_inspect(args: &ArgMatches) -> Result<()> {
    load_config(args)?;
    let path = args.get_one::<PathBuf>("script").context("Missing script path")?;
    let document = SceneScriptReader::new()
        .strict(args.get_flag("strict"))
        .read_file(path)?;

    for camera in document.camera_blocks() {
        println!(
            "camera  {:<24} pos {:?} rot {:?}",
            camera.name,
            camera.position.as_slice(),
            camera.rotation.as_slice()
        );
    }
    for block in document.design_blocks() {
        println!(
            "dblock  {:<24} {:?} pos {:?} material {}",
            block.name,
            block.shape,
            block.position.as_slice(),
            block.material
        );
    }
    println!("{} block(s)", document.len());
    Ok(())
}

/// Run one command through a freshly loaded plugin
fn run_command(config: &ToolsConfig, name: &str, scene: &mut InMemoryScene) -> Result<CommandOutput> {
    let mut registry = CommandRegistry::new();
    initialize_plugin(&mut registry, config)?;
    let output = registry
        .invoke(name, scene)
        .with_context(|| format!("{name} failed"))?;
    uninitialize_plugin(&mut registry)?;
    Ok(output)
}
