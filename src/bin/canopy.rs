use std::path::PathBuf;

use anyhow::Context as _;
use canopy::{
    Align, Engine, EngineConfig, FrameOutcome, NodeKind, OutputKind, Padding, PatchBuilder,
    PatchOp, decode_patch,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

const FRAME_INTERVAL_NANOS: u64 = 16_666_667;

#[derive(Parser, Debug)]
#[command(name = "canopy", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a patch file and render frames.
    Render(RenderArgs),
    /// Print the records of a patch file as JSON.
    Dump(DumpArgs),
    /// Write a sample patch file.
    Demo(DemoArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Ppm,
    Png,
    Null,
}

impl From<Format> for OutputKind {
    fn from(f: Format) -> Self {
        match f {
            Format::Ppm => OutputKind::Ppm,
            Format::Png => OutputKind::Png,
            Format::Null => OutputKind::Null,
        }
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Binary patch file.
    #[arg(long)]
    patch: PathBuf,

    /// Number of frames to render.
    #[arg(long, default_value_t = 1)]
    frames: u64,

    /// Engine config JSON. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(long)]
    width: Option<i32>,

    /// Surface height in pixels.
    #[arg(long)]
    height: Option<i32>,

    /// Device type code (0=Metal, 1=GLES, 2=D3D11, 3=GL).
    #[arg(long)]
    device: Option<i32>,

    /// Output directory for frame files.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<Format>,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Binary patch file.
    #[arg(long)]
    patch: PathBuf,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Output patch path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Dump(args) => cmd_dump(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => EngineConfig::from_json_path(path)?,
        None => EngineConfig::default(),
    };
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(d) = args.device {
        cfg.device_type = d;
    }
    if let Some(dir) = args.out_dir {
        cfg.output.dir = dir;
    }
    if let Some(format) = args.format {
        cfg.output.kind = format.into();
    }

    let bytes = std::fs::read(&args.patch)
        .with_context(|| format!("read patch '{}'", args.patch.display()))?;
    let mut engine = Engine::create(cfg.clone())?;
    let report = engine.apply_patches(&bytes);
    if !report.is_clean() {
        eprintln!(
            "patch: {} applied, {} rejected, status {:?}",
            report.records_applied, report.records_rejected, report.status
        );
    }

    let mut failed = 0u64;
    for i in 0..args.frames {
        let frame = engine.begin_frame(i.saturating_mul(FRAME_INTERVAL_NANOS));
        if let FrameOutcome::SinkFailed(msg) = frame.outcome {
            eprintln!("frame {:?}: {msg}", frame.index);
            failed += 1;
        }
    }
    let presented = engine.stats().frames_presented;
    engine.destroy()?;

    if failed > 0 {
        anyhow::bail!("{failed} of {} frames failed to write", args.frames);
    }
    eprintln!(
        "rendered {presented} frame(s) to {}",
        cfg.output.dir.display()
    );
    Ok(())
}

fn op_json(op: &PatchOp<'_>) -> serde_json::Value {
    use serde_json::json;
    let fields = match *op {
        PatchOp::CreateNode { id, kind } => json!({ "id": id, "type": kind }),
        PatchOp::DeleteNode { id } => json!({ "id": id }),
        PatchOp::SetProp { id, key, value } => json!({ "id": id, "key": key, "value": value }),
        PatchOp::AppendChild { parent, child } => json!({ "parent": parent, "child": child }),
        PatchOp::InsertChild {
            parent,
            child,
            index,
        } => json!({ "parent": parent, "child": child, "index": index }),
        PatchOp::RemoveChild { parent, child } => json!({ "parent": parent, "child": child }),
        PatchOp::ReplaceChild { parent, old, new } => {
            json!({ "parent": parent, "old": old, "new": new })
        }
        PatchOp::SetPropStr { id, key, bytes } => {
            json!({ "id": id, "key": key, "value": String::from_utf8_lossy(bytes) })
        }
    };
    json!({ "op": op.name(), "args": fields })
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.patch)
        .with_context(|| format!("read patch '{}'", args.patch.display()))?;
    let decoded = decode_patch(&bytes);
    let records: Vec<serde_json::Value> = decoded.ops.iter().map(op_json).collect();
    let summary = serde_json::json!({
        "len": bytes.len(),
        "consumed": decoded.consumed,
        "records": records,
        "error": decoded.error.as_ref().map(ToString::to_string),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn demo_patch() -> Vec<u8> {
    let mut b = PatchBuilder::new();
    b.create_node(1, NodeKind::Column)
        .set_padding(
            1,
            Padding {
                left: 16,
                top: 16,
                right: 16,
                bottom: 16,
            },
        )
        .set_gap(1, 12)
        .set_align(1, Align::Start, Align::Center)
        .create_node(2, NodeKind::Text)
        .set_text(2, "Hello from canopy")
        .set_size(2, 320, 40)
        .append_child(1, 2)
        .create_node(3, NodeKind::Row)
        .set_gap(3, 8)
        .set_size(3, 0, 56)
        .append_child(1, 3)
        .create_node(4, NodeKind::Button)
        .set_text(4, "OK")
        .append_child(3, 4)
        .create_node(5, NodeKind::Button)
        .set_text(5, "Cancel")
        .set_size(5, 128, 0)
        .append_child(3, 5)
        .create_node(6, NodeKind::Center)
        .set_size(6, 0, 200)
        .append_child(1, 6)
        .create_node(7, NodeKind::SizedBox)
        .set_size(7, 240, 120)
        .append_child(6, 7)
        .create_node(8, NodeKind::Text)
        .set_text(8, "centered")
        .append_child(7, 8);
    b.build()
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let bytes = demo_patch();
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write patch '{}'", args.out.display()))?;
    eprintln!("wrote {} ({} bytes)", args.out.display(), bytes.len());
    Ok(())
}
