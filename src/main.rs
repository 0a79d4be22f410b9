mod app;
mod assets;

use std::path::PathBuf;

use clap::Parser;

use tiny_rasterizer::Config;

#[derive(Parser, Debug)]
#[command(name = "tiny_rasterizer")]
#[command(about = "Software rasterizer rendering an .obj mesh", long_about = None)]
struct Args {
    /// TOML config file, missing fields and files fall back to defaults.
    #[arg(short, long, default_value = "rasterizer.toml")]
    config: PathBuf,

    /// Mesh to draw, overrides `[scene] mesh`.
    #[arg(short, long)]
    mesh: Option<String>,

    /// Texture of the next shape of the mesh, repeatable. Replaces `[scene] textures`.
    #[arg(short, long)]
    texture: Vec<String>,

    /// Render without a window and save the last frame to this image.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of frames to render before exiting.
    #[arg(short, long)]
    frames: Option<u32>,

    #[arg(long)]
    print_fps: bool,
}

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG overrides the default level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config);
    if args.mesh.is_some() {
        config.scene.mesh = args.mesh;
    }
    if !args.texture.is_empty() {
        config.scene.textures = args.texture;
    }

    let params = app::Params {
        config,
        output: args.output,
        frames: args.frames,
        print_fps: args.print_fps,
    };

    app::run(params)?;

    return Ok(());
}
