mod board;
mod paths;
mod settings;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use log::{info, warn};
use overlay::prelude::*;
use overlay::overlay_area;
use simplelog::{Config, LevelFilter, WriteLogger};
use surface::{Key, PointerEvents, Rect};
use tokio::time::sleep;

const SCREEN: Rect = Rect::new(0, 0, 120, 40);

fn init_logging() {
    let path = paths::log_file().unwrap_or_else(|| PathBuf::from("overlay-demo.log"));
    paths::keep_previous_log(&path);

    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

fn load_config() -> ServiceConfig {
    let Some(path) = paths::settings_file() else {
        return ServiceConfig::default();
    };
    settings::load(&path).unwrap_or_else(|e| {
        warn!("[demo] {}, using defaults", e);
        ServiceConfig::default()
    })
}

fn focused(surface: &SurfaceHandle) -> String {
    surface.lock().focused().unwrap_or("<none>").to_string()
}

/// Walk through a short dispatcher session: book a transfer, use the
/// filters drawer, recover from a leaked pointer lock and confirm quitting.
async fn run_session(driver: &OverlayDriver, surface: &SurfaceHandle, config: ServiceConfig) -> Result<bool, Box<dyn Error>> {
    let settle = config.focus_settle * 2;

    surface.with(|s| s.focus("new-booking"))?;
    println!("focus: {}", focused(surface));

    let outcome = driver.with_service(|s| {
        s.open_dialog(
            board::booking_form(),
            OverlayOptions::new().size(OverlaySize::Md).final_focus("transfer-1"),
        )
    });
    let area = driver.with_service(|s| s.get_active(OverlayKind::Dialog).map(|r| overlay_area(SCREEN, r)));
    println!("booking form: {:?} at {:?}, focus: {}", outcome, area, focused(surface));

    driver.send(SurfaceEvent::key(Key::Tab)).await?;
    driver.send(SurfaceEvent::pointer_down("booking-submit")).await?;
    sleep(settle).await;
    println!("booked, focus: {}", focused(surface));

    driver.with_service(|s| {
        s.open_drawer(
            board::filters_panel(),
            OverlayOptions::new().side(DrawerSide::Left).title("Filters"),
        )
    });
    println!("filters open, focus: {}", focused(surface));
    driver
        .send(SurfaceEvent::TouchStart {
            target: Some("status".into()),
        })
        .await?;
    sleep(settle).await;
    println!("filters dismissed, focus: {}", focused(surface));

    // A third-party transition that never cleans up after itself
    surface.with(|s| s.set_pointer_events(PointerEvents::None))?;
    println!("pointer leaked: interactive={}", surface.lock().is_interactive());
    sleep(config.guard_interval + config.correction_delay).await;
    println!("after guard: interactive={}", surface.lock().is_interactive());

    let (_, answer) = driver.with_service(|s| s.confirm(ConfirmDialog::new("Quit the dispatch board?").title("Quit?")));
    driver.send(SurfaceEvent::key(Key::Tab)).await?;
    driver.send(SurfaceEvent::key(Key::Enter)).await?;
    let quit = answer.await.unwrap_or(false);
    println!("quit confirmed: {}", quit);
    Ok(quit)
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = load_config();
    info!("[demo] starting with {:?}", config);

    let surface = SurfaceHandle::new(Surface::with_root(board::dispatch_board()));
    let driver = OverlayDriver::spawn(OverlayService::new(surface.clone(), config));

    let result = run_session(&driver, &surface, config).await;
    driver.shutdown().await?;
    result.map(|quit| info!("[demo] session finished, quit={}", quit))
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
    }
}
