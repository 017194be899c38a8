use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use simulation::clock_sampler::ToggleDayNight;
use simulation::config::IslandConfig;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Ambient Island".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            fit_canvas_to_parent: true,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .insert_resource(IslandConfig::from_env())
    .add_plugins((
        simulation::SimulationPlugin,
        rendering::RenderingPlugin,
        ui::UiPlugin,
    ));

    // Screenshot mode: one shot as started, one after a manual toggle, then exit
    if std::env::var("ISLAND_SCREENSHOTS").is_ok() {
        app.insert_resource(ScreenshotQueue::default());
        app.add_systems(Update, drive_screenshots);
    }

    app.run();
}

/// Frames to wait for models to load before the first capture.
const WARMUP_FRAMES: u32 = 180;
/// Frames between the day/night toggle and the capture.
const SETTLE_FRAMES: u32 = 30;
const SHOTS: [&str; 2] = ["01_start", "02_toggled"];

#[derive(Resource, Default)]
struct ScreenshotQueue {
    frame: u32,
    current: usize,
}

fn drive_screenshots(
    mut commands: Commands,
    mut queue: ResMut<ScreenshotQueue>,
    mut toggles: EventWriter<ToggleDayNight>,
    mut exit: EventWriter<AppExit>,
) {
    queue.frame += 1;
    if queue.frame < WARMUP_FRAMES {
        return;
    }

    let idx = queue.current;
    if idx >= SHOTS.len() {
        // All done; wait a few frames for the last save, then exit
        if queue.frame > WARMUP_FRAMES + SHOTS.len() as u32 * SETTLE_FRAMES + 20 {
            exit.send(AppExit::Success);
        }
        return;
    }

    let phase = (queue.frame - WARMUP_FRAMES) % SETTLE_FRAMES;
    if phase == 0 {
        let path = format!("/tmp/island_{}.png", SHOTS[idx]);
        info!("Capturing {}", path);
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(path));
        queue.current += 1;
        if queue.current < SHOTS.len() {
            toggles.send(ToggleDayNight);
        }
    }
}
