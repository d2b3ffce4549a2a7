//! DCM Export CLI
//!
//! Convert JSON scene descriptions into DCM files.

use clap::{Parser, Subcommand, ValueEnum};
use dcm_export::{
    export_dcm_to_path, load_scene, DcmError, ExportConfig, ExportScope, FieldWidths, Scene,
    SceneSource, SubmeshPartitioning, TextureExtension,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dcm-export")]
#[command(author, version, about = "Export scene meshes to Dreamcast Mesh (DCM) files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene to a DCM file
    Export {
        /// Input JSON scene description
        input: PathBuf,

        /// Output file path (defaults to the input name with a .dcm extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON export configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Texture extension written into material records
        #[arg(short, long, value_enum)]
        texture_extension: Option<TextureFormat>,

        /// Export every object instead of only the active one
        #[arg(long)]
        all_objects: bool,

        /// Give each submesh only its own triangles
        #[arg(long)]
        partition_submeshes: bool,

        /// Use the 32-byte mesh name field declared by the format
        #[arg(long)]
        declared_widths: bool,
    },

    /// Show the objects and materials in a scene description
    Info {
        /// Input JSON scene description
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TextureFormat {
    /// Dreamcast texture (.dtex)
    Dtex,
    /// PNG image (.png)
    Png,
}

impl From<TextureFormat> for TextureExtension {
    fn from(format: TextureFormat) -> Self {
        match format {
            TextureFormat::Dtex => TextureExtension::Dtex,
            TextureFormat::Png => TextureExtension::Png,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            texture_extension,
            all_objects,
            partition_submeshes,
            declared_widths,
        } => {
            let mut export_config = match &config {
                Some(path) => ExportConfig::load(path)?,
                None => ExportConfig::default(),
            };
            if let Some(format) = texture_extension {
                export_config.texture_extension = format.into();
            }
            if all_objects {
                export_config.export_scope = ExportScope::AllObjects;
            }
            if partition_submeshes {
                export_config.partitioning = SubmeshPartitioning::PerSubmesh;
            }
            if declared_widths {
                export_config.field_widths = FieldWidths::declared();
            }

            let output = output.unwrap_or_else(|| input.with_extension("dcm"));
            export_scene(&input, &output, &export_config)?;
        }
        Commands::Info { input } => {
            show_scene_info(&input)?;
        }
    }

    Ok(())
}

fn export_scene(
    input: &Path,
    output: &Path,
    config: &ExportConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading scene from {:?}", input);
    let scene = load_scene(input)?;

    match export_dcm_to_path(&scene, config, output) {
        Ok(summary) => {
            println!(
                "Exported {} meshes, {} materials, {} vertices ({} bytes) to {:?}",
                summary.mesh_count,
                summary.material_count,
                summary.vertex_count,
                summary.byte_len,
                output
            );
            for name in &summary.skipped_targets {
                println!("  Skipped '{}': no mesh", name);
            }
            Ok(())
        }
        Err(DcmError::NoExportTargets) => {
            println!("Nothing to export: no objects with mesh geometry in scope");
            Ok(())
        }
        Err(err) => {
            // A failed write leaves an invalid file behind.
            if matches!(err, DcmError::Io(_)) && output.exists() {
                let _ = fs::remove_file(output);
            }
            Err(err.into())
        }
    }
}

fn show_scene_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let scene = Scene::load(input)?;

    println!("Scene: {:?}", input);
    println!("  Materials: {}", scene.materials.len());
    for (i, material) in scene.materials.iter().enumerate() {
        let texture = material
            .texture
            .as_ref()
            .map(|t| t.base_name.as_str())
            .unwrap_or("-");
        println!("    [{}] '{}' texture: {}", i, material.name, texture);
    }

    let active = scene.active_object().map(|o| o.name.as_str());
    println!("  Objects: {}", scene.objects.len());
    for object in &scene.objects {
        let marker = if Some(object.name.as_str()) == active { "*" } else { " " };
        match object.resolve_mesh() {
            Some(mesh) => println!(
                "   {} '{}': {} triangles, {} submeshes",
                marker,
                object.name,
                mesh.triangle_count(),
                mesh.submesh_count
            ),
            None => println!("   {} '{}': no mesh", marker, object.name),
        }
    }
    if scene.is_live() {
        println!("  Scene is live; export will be refused");
    }

    Ok(())
}
