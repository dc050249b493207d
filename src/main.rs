//! Headless demo: render one frame of a synthetic peptide into a recording
//! backend and log what was drawn.

use std::f32::consts::FRAC_PI_2;
use std::path::Path;
use std::process::ExitCode;

use glam::Vec3;
use molshape::camera::{Camera, Viewport};
use molshape::engine::ShapeManager;
use molshape::error::ShapeError;
use molshape::g3d::recording::RecordingGraphics;
use molshape::model::{ideal_helix, ideal_strand, MolecularModel};
use molshape::options::Options;
use molshape::shape::ShapeKind;

const WIDTH: i32 = 800;
const HEIGHT: i32 = 600;

/// Helix, a short coil, then a strand, as a CA trace.
fn peptide() -> Result<MolecularModel, ShapeError> {
    let mut points = ideal_helix(12, Vec3::ZERO);
    let mut last = points[points.len() - 1];
    for step in [Vec3::new(3.0, 1.5, 1.0), Vec3::new(2.5, -2.0, 1.5)] {
        last += step;
        points.push(last);
    }
    points.extend(ideal_strand(8, last + Vec3::new(3.8, 0.0, 0.0), Vec3::X));
    MolecularModel::from_ca_trace('A', &points)
}

fn run() -> Result<(), ShapeError> {
    let options = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading options preset {path}");
            Options::load(Path::new(&path))?
        }
        None => Options::default(),
    };

    let model = peptide()?;
    let (center, radius) = model.bounds();
    let camera = Camera::framing(center, radius, WIDTH as f32 / HEIGHT as f32, &options.camera);
    let mut view = Viewport::new(camera, WIDTH, HEIGHT);

    let mut manager = ShapeManager::new(model, options);
    let all = manager.model().all_atoms();
    manager.set_size(ShapeKind::Cartoon, -1, &all)?;
    manager.set_size(ShapeKind::Sticks, 150, &all)?;
    manager.set_size(ShapeKind::Dots, 1, &all)?;

    let mut g3d = RecordingGraphics::new(WIDTH, HEIGHT);
    render_and_log("still", &mut manager, &view, &mut g3d);

    // a quarter turn drawn the way an interactive rotation would be
    let mut camera = *view.camera();
    camera.orbit(FRAC_PI_2);
    view.set_camera(camera);
    manager.options_mut().display.in_motion = true;
    g3d.reset();
    render_and_log("in motion", &mut manager, &view, &mut g3d);
    Ok(())
}

fn render_and_log(
    label: &str,
    manager: &mut ShapeManager,
    view: &Viewport,
    g3d: &mut RecordingGraphics,
) {
    let report = manager.render_frame(view, g3d);
    log::info!(
        "{label}: rendered {:?}, failed {:?}",
        report.rendered,
        report.failed
    );
    for (kind, count) in g3d.counts() {
        log::info!("  {kind:?}: {count}");
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
