//! Editing session: the explicit context for one open project
//!
//! A [`Session`] owns the canvas, the edit engine, input state and timers.
//! The frontend calls [`Session::tick`] once per frame with the elapsed
//! time and the input events collected since the previous tick.

use std::path::{Path, PathBuf};

use crate::core::config::EditorConfig;
use crate::core::input::{Control, InputEvent, InputState};
use crate::core::time::{IdleTimer, RepeatTimer};
use crate::core::types::{Result, Vec3};
use crate::render::{render_frame, Frame, FrameCamera};
use crate::storage::{backup_path, load_snapshot, project_path, save_snapshot};
use crate::voxel::canvas::Canvas;
use crate::voxel::edit::{EditContext, EditEngine, EditOp, EditOutcome, ScrollTarget};
use crate::voxel::palette::Palette;
use crate::voxel::state::EditorState;

/// Keyboard look speed in radians per second
const KEY_LOOK_SPEED: f32 = 0.7;

/// Seconds a transient message stays up
const MESSAGE_SECS: f32 = 1.0;

/// Where a project is stored
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectLocation {
    /// `<data_dir>/<name>.wox.gz`
    Named { data_dir: PathBuf, name: String },
    /// An explicit snapshot path
    Path(PathBuf),
}

impl ProjectLocation {
    pub fn path(&self) -> PathBuf {
        match self {
            ProjectLocation::Named { data_dir, name } => project_path(data_dir, name),
            ProjectLocation::Path(path) => path.clone(),
        }
    }

    /// Display name of the project
    pub fn title(&self) -> String {
        match self {
            ProjectLocation::Named { name, .. } => name.clone(),
            ProjectLocation::Path(path) => path.display().to_string(),
        }
    }
}

/// A short-lived message for the HUD
#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: f32,
}

/// What happened during one tick
#[derive(Debug, Default)]
pub struct TickReport {
    pub edits: Vec<(EditOp, EditOutcome)>,
    pub backup_written: bool,
}

impl TickReport {
    pub fn changed_volume(&self) -> bool {
        self.edits.iter().any(|(_, outcome)| outcome.changed_volume())
    }
}

/// One open project and everything needed to edit it
pub struct Session {
    config: EditorConfig,
    location: ProjectLocation,
    canvas: Canvas,
    engine: EditEngine,
    input: InputState,
    place_repeat: RepeatTimer,
    delete_repeat: RepeatTimer,
    replace_repeat: RepeatTimer,
    idle: IdleTimer,
    fast: bool,
    message: Option<StatusMessage>,
    dirty: bool,
    now: f32,
}

impl Session {
    /// Open `<data_dir>/<name>.wox.gz`, creating a seeded project if it is
    /// missing or unreadable.
    pub fn open(config: EditorConfig, name: &str) -> Self {
        let location = ProjectLocation::Named {
            data_dir: config.data_dir.clone(),
            name: name.to_string(),
        };
        Self::with_location(config, location)
    }

    /// Open a snapshot at an explicit path
    pub fn open_path(config: EditorConfig, path: &Path) -> Self {
        Self::with_location(config, ProjectLocation::Path(path.to_path_buf()))
    }

    fn with_location(config: EditorConfig, location: ProjectLocation) -> Self {
        let path = location.path();
        let canvas = match load_snapshot(&path) {
            Ok(Some(canvas)) => canvas,
            Ok(None) => {
                log::info!("New volumetric canvas created.");
                Canvas::seeded()
            }
            Err(e) => {
                log::error!("Could not load {}: {}; starting a new canvas", path.display(), e);
                Canvas::seeded()
            }
        };
        Self::from_canvas(config, location, canvas)
    }

    /// Wrap an existing canvas without touching the disk
    pub fn from_canvas(config: EditorConfig, location: ProjectLocation, canvas: Canvas) -> Self {
        let repeat = RepeatTimer::new(config.repeat_delay_secs, config.repeat_interval_secs);
        let fast = canvas.state.is_fast();
        Self {
            idle: IdleTimer::new(config.idle_backup_secs),
            place_repeat: repeat,
            delete_repeat: repeat,
            replace_repeat: repeat,
            config,
            location,
            canvas,
            engine: EditEngine::new(),
            input: InputState::new(),
            fast,
            message: None,
            dirty: false,
            now: 0.0,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn state(&self) -> &EditorState {
        &self.canvas.state
    }

    pub fn location(&self) -> &ProjectLocation {
        &self.location
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    pub fn is_mirrored(&self) -> bool {
        self.engine.mirror
    }

    /// Unsaved volume changes since the last save or load
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current transient message, if it has not expired
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|m| self.now <= m.expires_at)
            .map(|m| m.text.as_str())
    }

    /// Set mouse sensitivity; zero or negative selects the configured default
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.canvas.state.sensitivity = if sensitivity > 0.0 {
            sensitivity
        } else {
            self.config.default_sensitivity
        };
        log::info!(
            "Custom mouse sensitivity applied to project \"{}\".",
            self.location.title()
        );
    }

    /// Replace the palette
    pub fn apply_palette(&mut self, palette: Palette) {
        self.canvas.palette = palette;
        log::info!(
            "Custom color palette applied to project \"{}\".",
            self.location.title()
        );
    }

    /// Apply one edit operation immediately
    pub fn apply(&mut self, op: EditOp) -> EditOutcome {
        let canvas = &mut self.canvas;
        let mut ctx = EditContext {
            volume: &mut canvas.volume,
            palette: &canvas.palette,
            state: &mut canvas.state,
        };
        let outcome = self.engine.apply(op, &mut ctx);

        if outcome.changed_volume() {
            self.dirty = true;
        }
        if let EditOutcome::Rejected(rejection) = outcome {
            if let Some(text) = rejection.message() {
                self.message = Some(StatusMessage {
                    text: text.to_string(),
                    expires_at: self.now + MESSAGE_SECS,
                });
            }
        }
        outcome
    }

    /// Advance one frame.
    ///
    /// `now` is the session clock in seconds and `dt` the time since the
    /// previous tick. Events are applied in order, then due key repeats,
    /// then held movement and look.
    pub fn tick(&mut self, now: f32, dt: f32, events: &[InputEvent]) -> TickReport {
        self.now = now;
        let mut report = TickReport::default();

        for event in events {
            if self.input.process_event(event) {
                self.idle.touch(now);
            }
            match *event {
                InputEvent::Pressed(control) => self.on_press(control, now, &mut report),
                InputEvent::Released(control) => self.on_release(control),
                InputEvent::Wheel(steps) if steps != 0 => {
                    let delta = if steps < 0 { 1 } else { -1 };
                    let op = EditOp::Scroll { delta, target: ScrollTarget::Selection };
                    report.edits.push((op, self.apply(op)));
                }
                _ => {}
            }
        }

        for (op, due) in [
            (EditOp::Place, self.place_repeat.poll(now)),
            (EditOp::Delete, self.delete_repeat.poll(now)),
            (EditOp::Replace, self.replace_repeat.poll(now)),
        ] {
            if due {
                report.edits.push((op, self.apply(op)));
            }
        }

        self.update_camera(dt);

        if self.idle.poll(now) {
            match self.save_backup() {
                Ok(()) => report.backup_written = true,
                Err(e) => log::error!("Idle backup failed: {}", e),
            }
        }

        report
    }

    fn on_press(&mut self, control: Control, now: f32, report: &mut TickReport) {
        let op = match control {
            Control::Place => {
                self.place_repeat.arm(now);
                Some(EditOp::Place)
            }
            Control::Delete => {
                self.delete_repeat.arm(now);
                Some(EditOp::Delete)
            }
            Control::Replace => {
                self.replace_repeat.arm(now);
                Some(EditOp::Replace)
            }
            Control::CloneColor => Some(EditOp::CloneColor),
            Control::ScrollColorUp => Some(EditOp::Scroll { delta: 1, target: ScrollTarget::Pointed }),
            Control::ScrollColorDown => Some(EditOp::Scroll { delta: -1, target: ScrollTarget::Pointed }),
            Control::ToggleMirror => Some(EditOp::ToggleMirror),
            Control::PlaceAtViewpoint => Some(EditOp::PlaceAtViewpoint),
            Control::ToggleFast => {
                self.fast = self.canvas.state.toggle_fast(self.fast);
                None
            }
            Control::SpeedTier(tier) => {
                self.canvas.state.select_speed_tier(tier, self.fast);
                None
            }
            Control::TogglePitchLock => {
                let state = &mut self.canvas.state;
                state.pitch_lock = !state.pitch_lock;
                state.clamp_pitch();
                None
            }
            Control::Reset => {
                self.canvas.state.reset();
                self.fast = false;
                None
            }
            Control::Save => {
                if let Err(e) = self.save() {
                    log::error!("Save failed: {}", e);
                }
                None
            }
            Control::Load => {
                if let Err(e) = self.reload() {
                    log::error!("Load failed: {}", e);
                }
                None
            }
            _ => None,
        };

        if let Some(op) = op {
            report.edits.push((op, self.apply(op)));
        }
    }

    fn on_release(&mut self, control: Control) {
        match control {
            Control::Place => self.place_repeat.disarm(),
            Control::Delete => self.delete_repeat.disarm(),
            Control::Replace => self.replace_repeat.disarm(),
            _ => {}
        }
    }

    fn update_camera(&mut self, dt: f32) {
        let input = &self.input;
        let state = &mut self.canvas.state;

        let view = state.view();
        let look = state.look_direction();
        let step = state.speed * dt;
        let mut eye = state.eye();

        if input.is_held(Control::Forward) {
            eye += look * step;
        } else if input.is_held(Control::Back) {
            eye -= look * step;
        }

        if input.is_held(Control::Left) {
            eye -= view.right * step;
        } else if input.is_held(Control::Right) {
            eye += view.right * step;
        }

        let up = if state.pitch_lock { Vec3::Z } else { view.up };
        if input.is_held(Control::Down) {
            eye -= up * step;
        } else if input.is_held(Control::Up) {
            eye += up * step;
        }
        state.set_eye(eye);

        let turn = KEY_LOOK_SPEED * dt;
        if input.is_held(Control::LookLeft) {
            state.yaw += turn;
        } else if input.is_held(Control::LookRight) {
            state.yaw -= turn;
        }
        let pitched = if input.is_held(Control::LookUp) {
            state.pitch += turn;
            true
        } else if input.is_held(Control::LookDown) {
            state.pitch -= turn;
            true
        } else {
            false
        };
        if pitched {
            state.clamp_pitch();
        }

        let (dx, dy) = self.input.take_mouse_delta();
        self.canvas.state.apply_mouse_look(dx, dy);
    }

    /// Write the project to its location
    pub fn save(&mut self) -> Result<()> {
        save_snapshot(&self.location.path(), &self.canvas)?;
        self.dirty = false;
        Ok(())
    }

    /// Write the idle backup next to the project file
    pub fn save_backup(&self) -> Result<()> {
        save_snapshot(&backup_path(&self.location.path()), &self.canvas)
    }

    /// Reload the project from disk, discarding unsaved changes.
    ///
    /// Returns false if there is nothing on disk yet.
    pub fn reload(&mut self) -> Result<bool> {
        match load_snapshot(&self.location.path())? {
            Some(canvas) => {
                self.fast = canvas.state.is_fast();
                self.canvas = canvas;
                self.dirty = false;
                Ok(true)
            }
            None => {
                log::warn!("No saved project at {}", self.location.path().display());
                Ok(false)
            }
        }
    }

    /// Render the current viewpoint
    pub fn render(&self, width: u32, height: u32) -> Frame {
        let camera = FrameCamera {
            eye: self.canvas.state.eye(),
            view: self.canvas.state.view(),
        };
        render_frame(&self.canvas.volume, &self.canvas.palette, camera, width, height)
    }

    /// Save and close
    pub fn close(mut self) -> Result<()> {
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::edit::aim_at;

    fn session_in(dir: &Path) -> Session {
        let config = EditorConfig {
            data_dir: dir.to_path_buf(),
            ..EditorConfig::default()
        };
        Session::open(config, "test")
    }

    /// Eye above a single cell at (64, 64, 64), looking straight down
    fn aimed_session(dir: &Path) -> Session {
        let mut session = session_in(dir);
        session.canvas.volume.clear();
        session.canvas.volume.set(64, 64, 64, 8);
        aim_at(&mut session.canvas.state, Vec3::new(64.0, 64.0, 100.0), Vec3::new(64.0, 64.0, 0.0));
        session
    }

    #[test]
    fn test_new_project_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        assert_eq!(session.canvas().volume.count_occupied(), 15);
        assert!(!session.is_fast());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_place_repeats_while_held() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = aimed_session(dir.path());

        let report = session.tick(0.0, 0.0, &[InputEvent::Pressed(Control::Place)]);
        assert!(report.changed_volume());
        assert_eq!(session.canvas().volume.get(64, 64, 65), 8);

        // Inside the initial delay nothing repeats
        assert!(session.tick(0.25, 0.0, &[]).edits.is_empty());
        let report = session.tick(0.31, 0.0, &[]);
        assert_eq!(report.edits.len(), 1);
        assert_eq!(session.canvas().volume.get(64, 64, 66), 8);

        assert!(session.tick(0.35, 0.0, &[]).edits.is_empty());
        session.tick(0.42, 0.0, &[]);
        assert_eq!(session.canvas().volume.get(64, 64, 67), 8);

        session.tick(0.45, 0.0, &[InputEvent::Released(Control::Place)]);
        assert!(session.tick(5.0, 0.0, &[]).edits.is_empty());
        assert!(session.is_dirty());
    }

    #[test]
    fn test_clone_system_color_shows_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = aimed_session(dir.path());
        session.canvas.volume.set(64, 64, 64, 1);

        session.tick(10.0, 0.0, &[InputEvent::Pressed(Control::CloneColor)]);
        assert_eq!(session.message(), Some("This is a system color you cannot clone this."));
        session.tick(10.5, 0.0, &[]);
        assert!(session.message().is_some());
        session.tick(11.5, 0.0, &[]);
        assert_eq!(session.message(), None);
    }

    #[test]
    fn test_wheel_scrolls_selection_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = aimed_session(dir.path());
        session.tick(0.0, 0.0, &[InputEvent::Wheel(-1)]);
        assert_eq!(session.state().selected, 9);
        assert_eq!(session.canvas().volume.get(64, 64, 64), 8);
        session.tick(0.1, 0.0, &[InputEvent::Wheel(1), InputEvent::Wheel(1)]);
        assert_eq!(session.state().selected, 39);
    }

    #[test]
    fn test_forward_movement() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = aimed_session(dir.path());
        let speed = session.state().speed;
        session.tick(0.0, 0.5, &[InputEvent::Pressed(Control::Forward)]);
        let eye = session.state().eye();
        assert!((eye.z - (100.0 - speed * 0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_speed_controls() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.tick(0.0, 0.0, &[InputEvent::Pressed(Control::ToggleFast)]);
        assert!(session.is_fast());
        assert_eq!(session.state().speed, 74.4);
        session.tick(0.1, 0.0, &[InputEvent::Pressed(Control::SpeedTier(6))]);
        assert_eq!(session.state().speed_high, 297.6);
        session.tick(0.2, 0.0, &[InputEvent::Pressed(Control::Reset)]);
        assert!(!session.is_fast());
        assert_eq!(session.state().speed_high, 297.6);
        assert_eq!(session.state().yaw, 0.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = aimed_session(dir.path());
        session.apply(EditOp::Place);
        session.save().unwrap();
        assert!(dir.path().join("test.wox.gz").exists());

        session.apply(EditOp::Delete);
        assert_eq!(session.canvas().volume.get(64, 64, 65), 0);
        assert!(session.reload().unwrap());
        assert_eq!(session.canvas().volume.get(64, 64, 65), 8);

        let reopened = session_in(dir.path());
        assert_eq!(reopened.canvas(), session.canvas());
    }

    #[test]
    fn test_idle_backup_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.tick(0.0, 0.0, &[InputEvent::MouseMotion { dx: 0.0, dy: 0.0 }]);
        assert!(!session.tick(100.0, 0.0, &[]).backup_written);
        assert!(session.tick(181.0, 0.0, &[]).backup_written);
        assert!(!session.tick(500.0, 0.0, &[]).backup_written);
        assert!(dir.path().join("test.wox.gz.idle").exists());
    }

    #[test]
    fn test_corrupt_file_starts_new_canvas() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test.wox.gz"), b"garbage").unwrap();
        let session = session_in(dir.path());
        assert_eq!(session.canvas().volume.count_occupied(), 15);
    }

    #[test]
    fn test_render_sees_cell() {
        let dir = tempfile::tempdir().unwrap();
        let session = aimed_session(dir.path());
        let frame = session.render(9, 9);
        assert_eq!(frame.pixel(4, 4), [204, 204, 204, 255]);
    }
}
