use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::{error, info};

use gesture_hud::channel::{command_channel, CommandReceiver, StopSignal};
use gesture_hud::config::Config;
use gesture_hud::display::{build_hud, DisplayLoop};
use gesture_hud::hud::{HudController, HudState};
use gesture_hud::render::{HeadlessSurface, HudView};
use gesture_hud::sensing::SensingLoop;
use gesture_hud::source::ReplaySource;

#[derive(Parser, Debug)]
#[command(name = "gesture-hud", about = "Hand-gesture controlled heads-up display")]
struct Cli {
    /// 設定ファイル
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// ランドマーク記録 (設定の [source] path を上書き)
    #[arg(long)]
    landmarks: Option<String>,

    /// ウィンドウを開かずNフレーム描画して終了
    #[arg(long)]
    headless: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_hud=info".into()),
        )
        .init();

    info!("gesture-hud ({})", env!("GIT_VERSION"));

    let mut config = Config::load_or_default(&cli.config);
    if let Some(path) = cli.landmarks {
        config.source.path = path;
    }
    info!(
        "display {}x{} @ {}fps, sensing @ {}fps, source {}",
        config.display.width,
        config.display.height,
        config.app.display_fps,
        config.app.sensing_fps,
        config.source.path
    );

    let source = ReplaySource::open(&config.source.path, config.source.repeat)?;
    info!("loaded {} landmark frames", source.len());

    let (tx, rx) = command_channel();
    let stop = StopSignal::new();

    let sensing = SensingLoop::new(
        source,
        tx,
        stop.clone(),
        config.app.sensing_fps,
        config.display.width,
        config.display.height,
    )
    .with_mirror_x(config.source.mirror_x);
    let sensing_handle = std::thread::Builder::new()
        .name("sensing".to_string())
        .spawn(move || sensing.run())
        .context("failed to spawn sensing thread")?;

    std::thread::sleep(Duration::from_millis(config.app.startup_delay_ms));

    let display_result = run_display(&config, cli.headless, rx, stop.clone());
    if let Err(e) = &display_result {
        error!("display loop failed: {:#}", e);
        stop.stop();
    }

    match sensing_handle.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => info!("sensing loop ended: {:#}", e),
        Err(_) => error!("sensing thread panicked"),
    }

    info!("Shutting down...");
    display_result
}

fn run_display(
    config: &Config,
    headless: Option<u64>,
    rx: CommandReceiver,
    stop: StopSignal,
) -> Result<()> {
    let (controller, view) = build_hud(config)?;
    let fps = config.app.display_fps;

    let state = match headless {
        Some(frames) => {
            DisplayLoop::new(HeadlessSurface::new(frames), rx, stop, controller, view, fps).run()?
        }
        None => open_window(config, rx, stop, controller, view, fps)?,
    };
    info!(
        "final state: song {} ({}), {}, mode {}",
        state.song_index(),
        state.current_song(),
        if state.is_playing() { "playing" } else { "paused" },
        state.drive_mode().name
    );
    Ok(())
}

#[cfg(feature = "desktop")]
fn open_window(
    config: &Config,
    rx: CommandReceiver,
    stop: StopSignal,
    controller: HudController,
    view: HudView,
    fps: u32,
) -> Result<HudState> {
    use gesture_hud::render::MinifbSurface;

    let surface = MinifbSurface::new(
        &config.display.title,
        config.display.width as usize,
        config.display.height as usize,
    )?;
    DisplayLoop::new(surface, rx, stop, controller, view, fps).run()
}

#[cfg(not(feature = "desktop"))]
fn open_window(
    _config: &Config,
    _rx: CommandReceiver,
    _stop: StopSignal,
    _controller: HudController,
    _view: HudView,
    _fps: u32,
) -> Result<HudState> {
    anyhow::bail!("built without the `desktop` feature; run with --headless N")
}
