use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use glam::{Quat, Vec3};
use rig_math::config::{self, ValidationConfig};
use rig_math::{RotationMode, Selector, TransformComponent, TransformSpace, flatten_matrix};
use rig_target::{Scene, Target, get_transform_matrix, target_component};
use serde_json::{Value, json};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rig_probe", about = "Evaluate rig target transforms against a JSON scene")]
struct Args {
    /// Path to a JSON scene description
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Enable strict validation (overrides RIG_STRICT)
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a target's matrix as 16 column-major entries
    Matrix {
        #[arg(short, long)]
        object: String,
        #[arg(short, long, default_value = "")]
        bone: String,
        #[arg(long, default_value = "WORLD_SPACE")]
        space: String,
    },
    /// Print one scalar channel of a target
    Component {
        #[arg(short, long)]
        object: String,
        #[arg(short, long, default_value = "")]
        bone: String,
        #[arg(long, default_value = "WORLD_SPACE")]
        space: String,
        #[arg(short, long)]
        component: String,
        #[arg(short, long, default_value = "AUTO")]
        mode: String,
        /// Reproject quaternion and swing channels to driver angles
        #[arg(long)]
        driver: bool,
    },
    /// Print the distance between two targets, given as OBJECT[:BONE]
    Distance {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, default_value = "WORLD_SPACE")]
        from_space: String,
        #[arg(long, default_value = "WORLD_SPACE")]
        to_space: String,
    },
    /// Print the world rotation angle between two targets, given as OBJECT[:BONE]
    RotationalDifference {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Compose a matrix from location, rotation (w,x,y,z), and scale
    Compose {
        #[arg(long, default_value = "0,0,0", value_parser = parse_floats::<3>, allow_hyphen_values = true)]
        location: [f32; 3],
        #[arg(long, default_value = "1,0,0,0", value_parser = parse_floats::<4>, allow_hyphen_values = true)]
        rotation: [f32; 4],
        #[arg(long, default_value = "1,1,1", value_parser = parse_floats::<3>, allow_hyphen_values = true)]
        scale: [f32; 3],
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut validation = ValidationConfig::from_env();
    if args.strict {
        validation = validation.with_strict(true);
    }
    if let Err(rejected) = config::install(validation) {
        warn!(?rejected, "validation config already installed");
    }

    let scene = match &args.scene {
        Some(path) => {
            info!(path = %path.display(), "loading scene");
            Scene::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Scene::default(),
    };

    let output = run(&scene, args.command)?;
    println!("{output}");
    Ok(())
}

fn run(scene: &Scene, command: Command) -> Result<Value> {
    let output = match command {
        Command::Matrix {
            object,
            bone,
            space,
        } => {
            let space = TransformSpace::parse_in(&space, "get_transform_matrix")?;
            let matrix = get_transform_matrix(lookup(scene, &object, &bone), space)?;
            json!(flatten_matrix(&matrix))
        }
        Command::Component {
            object,
            bone,
            space,
            component,
            mode,
            driver,
        } => {
            let space = TransformSpace::parse_in(&space, "get_transform_matrix")?;
            let component = TransformComponent::parse_in(&component, "decompose_component")?;
            let mode = RotationMode::parse_in(&mode, "decompose_component")?;
            let target = lookup(scene, &object, &bone);
            json!(target_component(target, space, component, mode, driver)?)
        }
        Command::Distance {
            from,
            to,
            from_space,
            to_space,
        } => {
            let from_space = TransformSpace::parse_in(&from_space, "target_distance")?;
            let to_space = TransformSpace::parse_in(&to_space, "target_distance")?;
            let distance = rig_target::target_distance(
                lookup_path(scene, &from),
                lookup_path(scene, &to),
                from_space,
                to_space,
            )?;
            json!(distance)
        }
        Command::RotationalDifference { from, to } => {
            let angle = rig_target::target_rotational_difference(
                lookup_path(scene, &from),
                lookup_path(scene, &to),
            )?;
            json!(angle)
        }
        Command::Compose {
            location,
            rotation: [w, x, y, z],
            scale,
        } => {
            let matrix = rig_math::compose_matrix(
                Vec3::from_array(location),
                Quat::from_xyzw(x, y, z, w),
                Vec3::from_array(scale),
            )?;
            json!(flatten_matrix(&matrix))
        }
    };
    Ok(output)
}

/// Resolve an object and bone name, warning when the object is unknown.
fn lookup<'a>(scene: &'a Scene, object: &str, bone: &str) -> Option<Target<'a>> {
    if scene.object(object).is_none() {
        warn!(object, "object not found in scene");
    }
    scene.target(object, bone)
}

/// Resolve an `OBJECT[:BONE]` argument.
fn lookup_path<'a>(scene: &'a Scene, path: &str) -> Option<Target<'a>> {
    let (object, bone) = path.split_once(':').unwrap_or((path, ""));
    lookup(scene, object, bone)
}

fn parse_floats<const N: usize>(text: &str) -> Result<[f32; N]> {
    let values = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .with_context(|| format!("invalid number {part:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    match <[f32; N]>::try_from(values) {
        Ok(array) => Ok(array),
        Err(values) => bail!("expected {N} comma-separated numbers, got {}", values.len()),
    }
}
