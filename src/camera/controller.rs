//! Orbit controller: pan/rotate gestures and stepped zoom around a target.

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use crate::camera::core::Camera;
use crate::camera::spherical::Spherical;
use crate::options::CameraOptions;

/// How the current drag gesture is being interpreted.
///
/// Resolved on the first move sample of a gesture and kept until the
/// gesture ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    /// No move sample seen yet.
    #[default]
    Undetermined,
    /// Rigid lateral translation of camera and target.
    Pan,
    /// Orbit of the camera around a fixed target.
    Rotate,
}

/// Camera state captured when a drag gesture begins.
///
/// Move samples carry the total translation since the gesture began, so
/// every update is computed from this snapshot rather than accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct PanSession {
    mode: GestureMode,
    absolute: Vec3,
    target: Vec3,
    basis_x: Vec3,
    basis_y: Vec3,
    relative: Spherical,
    unrotation: Quat,
    scale: f32,
    angle: f32,
}

impl PanSession {
    fn capture(camera: &Camera, viewport_height: f32) -> Option<Self> {
        let offset = camera.position - camera.target;
        if offset.length_squared() == 0.0 || viewport_height <= 0.0 {
            return None;
        }

        let orientation = camera.orientation();
        let rotation = Quat::from_rotation_arc(camera.up.normalize(), Vec3::Y);
        let relative = Spherical::from_vec3(rotation * offset);

        Some(Self {
            mode: GestureMode::Undetermined,
            absolute: camera.position,
            target: camera.target,
            basis_x: orientation * Vec3::X,
            basis_y: orientation * Vec3::Y,
            relative,
            unrotation: rotation.inverse(),
            scale: relative.radius / viewport_height,
            angle: PI / viewport_height,
        })
    }

    /// Resolved gesture mode.
    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    /// Camera-from-target offset in the de-rotated frame at gesture start.
    #[must_use]
    pub fn relative(&self) -> Spherical {
        self.relative
    }

    /// World units per pixel of translation.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Radians per pixel of rotation.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

/// Orbital camera controller.
///
/// Owns the [`Camera`] and the live [`PanSession`]. The host drives it with
/// one `begin_pan` / many `update_pan` / one `end_pan` per drag, plus
/// `zoom` at any time.
#[derive(Debug, Clone)]
pub struct OrbitController {
    camera: Camera,
    pan: Option<PanSession>,
    /// Set between `begin_pan` and `end_pan`, even when the begin snapshot
    /// was degenerate and left no session.
    gesture_open: bool,
    zoom_step: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::from_options(&CameraOptions::default())
    }
}

impl OrbitController {
    /// Wrap an existing camera with a one-unit zoom step.
    #[must_use]
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            pan: None,
            gesture_open: false,
            zoom_step: 1.0,
        }
    }

    /// Build the camera and zoom step from configuration.
    #[must_use]
    pub fn from_options(options: &CameraOptions) -> Self {
        Self {
            camera: Camera::from_options(options),
            pan: None,
            gesture_open: false,
            zoom_step: options.zoom_step,
        }
    }

    /// The controlled camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access for projection updates (aspect, clip planes).
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Current orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.camera.target
    }

    /// Move the orbit target; the camera keeps its position.
    pub fn look_at(&mut self, target: Vec3) {
        self.camera.look_at(target);
    }

    /// Place the camera; it keeps looking at the current target.
    pub fn set_position(&mut self, position: Vec3) {
        self.camera.position = position;
    }

    /// Whether a drag gesture is in progress.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Live gesture session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&PanSession> {
        self.pan.as_ref()
    }

    /// Mode of the live gesture (`Undetermined` when idle).
    #[must_use]
    pub fn gesture_mode(&self) -> GestureMode {
        self.pan.as_ref().map_or(GestureMode::Undetermined, PanSession::mode)
    }

    /// Snapshot the camera at the start of a drag.
    ///
    /// `viewport_height` is the logical height of the view in pixels: a
    /// full-height vertical drag sweeps π radians, and a full-height pan
    /// moves the camera by its distance to the target. A camera sitting on
    /// its target (or a zero-height viewport) leaves no session, so the
    /// following moves are ignored.
    pub fn begin_pan(&mut self, viewport_height: f32) {
        self.pan = PanSession::capture(&self.camera, viewport_height);
        self.gesture_open = true;
        if self.pan.is_none() {
            log::trace!(
                "begin_pan skipped: distance {}, viewport height {viewport_height}",
                self.camera.distance()
            );
        }
    }

    /// Apply a move sample.
    ///
    /// `delta_x`/`delta_y` are the total translation in pixels since the
    /// gesture began. The first sample decides between pan and rotate: a held
    /// modifier or more than one pointer means pan.
    pub fn update_pan(
        &mut self,
        delta_x: f32,
        delta_y: f32,
        pointer_count: u32,
        modifier_held: bool,
    ) {
        debug_assert!(self.gesture_open, "update_pan called without begin_pan");
        if !self.accepts_moves() {
            return;
        }
        let Some(session) = self.pan.as_mut() else {
            return;
        };

        if session.mode == GestureMode::Undetermined {
            session.mode = if modifier_held || pointer_count > 1 {
                GestureMode::Pan
            } else {
                GestureMode::Rotate
            };
        }

        match session.mode {
            GestureMode::Pan => translate(&mut self.camera, session, delta_x, delta_y),
            GestureMode::Rotate | GestureMode::Undetermined => {
                rotate(&mut self.camera, session, delta_x, delta_y);
            }
        }
    }

    /// Whether a move sample would be applied. Outside a gesture, moves are
    /// logged and dropped.
    fn accepts_moves(&self) -> bool {
        if !self.gesture_open {
            log::warn!("update_pan called without an active gesture");
        }
        self.gesture_open
    }

    /// Drop the gesture session. Safe to call when no gesture is active.
    pub fn end_pan(&mut self) {
        self.pan = None;
        self.gesture_open = false;
    }

    /// Step the camera along the camera→target axis.
    ///
    /// Moving forward never crosses the near plane in front of the target;
    /// moving backward always adds exactly one step.
    pub fn zoom(&mut self, forward: bool) {
        let direction = self.camera.target - self.camera.position;
        let length = direction.length();
        if length == 0.0 {
            log::trace!("zoom skipped: camera sits on its target");
            return;
        }
        let direction = direction / length;

        if forward {
            let room = length - self.camera.znear;
            if room > 0.0 {
                self.camera.position += direction * room.min(self.zoom_step);
            }
        } else {
            self.camera.position -= direction * self.zoom_step;
        }
    }
}

fn translate(camera: &mut Camera, session: &PanSession, delta_x: f32, delta_y: f32) {
    let dx = session.basis_x * (delta_x * session.scale);
    let dy = session.basis_y * (delta_y * session.scale);
    camera.position = session.absolute - dx + dy;
    camera.target = session.target - dx + dy;
}

fn rotate(camera: &mut Camera, session: &PanSession, delta_x: f32, delta_y: f32) {
    let mut spherical = session.relative;
    spherical.theta -= delta_x * session.angle;
    spherical.phi -= delta_y * session.angle;
    let spherical = spherical.make_safe();

    let target = camera.target;
    camera.position = session.unrotation * spherical.to_vec3() + target;
    camera.look_at(target);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn controller_at(position: Vec3, target: Vec3) -> OrbitController {
        let mut camera = Camera::default();
        camera.position = position;
        camera.target = target;
        OrbitController::new(camera)
    }

    fn spherical_of(controller: &OrbitController) -> Spherical {
        let camera = controller.camera();
        Spherical::from_vec3(camera.position - camera.target)
    }

    #[test]
    fn rotate_drag_tilts_view_and_keeps_radius() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.begin_pan(500.0);
        c.update_pan(0.0, -100.0, 1, false);

        assert_eq!(c.gesture_mode(), GestureMode::Rotate);
        let s = spherical_of(&c);
        assert!((s.radius - 5.0).abs() < EPS);
        assert!((s.theta).abs() < EPS);
        // phi -= dy * π / height with dy = -100 and height = 500
        assert!((s.phi - (PI / 2.0 + PI / 5.0)).abs() < EPS);
        // The camera dropped below the target, so it now looks upward.
        assert!(c.camera().forward().y > 0.0);
        assert_eq!(c.target(), Vec3::ZERO);
    }

    #[test]
    fn rotate_preserves_radius_for_arbitrary_drags() {
        let target = Vec3::new(1.0, 2.0, -3.0);
        let mut c = controller_at(Vec3::new(4.0, -1.0, 6.0), target);
        let radius = c.camera().distance();
        c.begin_pan(720.0);
        for (dx, dy) in [(10.0, 0.0), (-250.0, 40.0), (900.0, -3000.0), (0.5, 0.5)] {
            c.update_pan(dx, dy, 1, false);
            assert!((c.camera().distance() - radius).abs() < EPS * radius);
            assert_eq!(c.target(), target);
        }
    }

    #[test]
    fn rotate_samples_are_absolute_not_cumulative() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.begin_pan(400.0);
        c.update_pan(60.0, 20.0, 1, false);
        let first = c.camera().position;
        c.update_pan(60.0, 20.0, 1, false);
        assert!(c.camera().position.abs_diff_eq(first, EPS));
        c.update_pan(0.0, 0.0, 1, false);
        assert!(c.camera().position.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), EPS));
    }

    #[test]
    fn horizontal_rotate_moves_theta() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.begin_pan(500.0);
        // theta -= 125 * π / 500 = -π / 4
        c.update_pan(125.0, 0.0, 1, false);
        let s = spherical_of(&c);
        assert!((s.theta + PI / 4.0).abs() < EPS);
        assert!((s.phi - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn rotate_never_reaches_the_poles() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.begin_pan(100.0);
        for dy in [1.0e3, 1.0e5, 1.0e9, -1.0e3, -1.0e9] {
            c.update_pan(0.0, dy, 1, false);
            let offset = c.camera().position - c.target();
            // Never collinear with the up axis, so the azimuth stays defined.
            assert!(offset.cross(Vec3::Y).length() > 0.0, "dy {dy}");
            assert!(!c.camera().orientation().is_nan());
        }
    }

    #[test]
    fn rotate_respects_a_rolled_up_vector() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.camera_mut().up = Vec3::X;
        c.begin_pan(300.0);
        c.update_pan(0.0, 0.0, 1, false);
        assert!(c.camera().position.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), EPS));
        c.update_pan(75.0, -40.0, 1, false);
        assert!((c.camera().distance() - 5.0).abs() < EPS);
    }

    #[test]
    fn pan_translates_camera_and_target_together() {
        let mut c = controller_at(Vec3::new(1.0, 2.0, 8.0), Vec3::new(0.5, 0.0, -1.0));
        let view = c.target() - c.camera().position;
        c.begin_pan(600.0);
        for (dx, dy) in [(30.0, 0.0), (-120.0, 75.0), (5.0, -400.0)] {
            c.update_pan(dx, dy, 2, false);
            let after = c.target() - c.camera().position;
            assert!(after.abs_diff_eq(view, EPS));
        }
        assert_eq!(c.gesture_mode(), GestureMode::Pan);
    }

    #[test]
    fn pan_follows_the_finger() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.begin_pan(500.0);
        // scale = radius / height = 0.01 world units per pixel
        c.update_pan(100.0, 50.0, 1, true);
        assert!(c.camera().position.abs_diff_eq(Vec3::new(-1.0, 0.5, 5.0), EPS));
        assert!(c.target().abs_diff_eq(Vec3::new(-1.0, 0.5, 0.0), EPS));
    }

    #[test]
    fn mode_is_sticky_for_the_whole_gesture() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.begin_pan(500.0);
        c.update_pan(1.0, 1.0, 1, false);
        c.update_pan(2.0, 2.0, 3, true);
        assert_eq!(c.gesture_mode(), GestureMode::Rotate);
        c.end_pan();

        c.begin_pan(500.0);
        assert_eq!(c.gesture_mode(), GestureMode::Undetermined);
        c.update_pan(1.0, 1.0, 2, false);
        c.update_pan(2.0, 2.0, 1, false);
        assert_eq!(c.gesture_mode(), GestureMode::Pan);
    }

    #[test]
    fn begin_pan_is_a_pure_snapshot() {
        let mut a = controller_at(Vec3::new(3.0, 1.0, 4.0), Vec3::ZERO);
        let mut b = a.clone();
        a.begin_pan(480.0);
        b.begin_pan(480.0);
        assert_eq!(a.session(), b.session());
        let session = a.session().unwrap();
        assert!((session.scale() - session.relative().radius / 480.0).abs() < 1e-7);
        assert!((session.angle() - PI / 480.0).abs() < 1e-7);
    }

    #[test]
    fn degenerate_begin_leaves_no_session() {
        let mut c = controller_at(Vec3::ZERO, Vec3::ZERO);
        c.begin_pan(500.0);
        assert!(!c.is_panning());
        c.update_pan(40.0, 40.0, 1, false);
        assert_eq!(c.camera().position, Vec3::ZERO);
        c.end_pan();

        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.begin_pan(0.0);
        assert!(!c.is_panning());
    }

    #[test]
    fn end_pan_is_idempotent() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.end_pan();
        c.begin_pan(500.0);
        c.end_pan();
        c.end_pan();
        assert!(!c.is_panning());
    }

    #[test]
    fn moves_outside_a_gesture_are_refused() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        assert!(!c.accepts_moves());
        c.begin_pan(500.0);
        assert!(c.accepts_moves());
        c.end_pan();
        assert!(!c.accepts_moves());

        // A degenerate begin still opens the gesture.
        let mut c = controller_at(Vec3::ZERO, Vec3::ZERO);
        c.begin_pan(500.0);
        assert!(c.accepts_moves());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "update_pan called without begin_pan")]
    fn update_without_begin_asserts_in_debug() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.update_pan(10.0, 10.0, 1, false);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn update_after_end_leaves_camera_in_release() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.begin_pan(500.0);
        c.update_pan(30.0, 0.0, 1, false);
        c.end_pan();
        let before = c.camera().clone();
        c.update_pan(200.0, -80.0, 2, true);
        assert_eq!(*c.camera(), before);
        assert!(!c.is_panning());
    }

    #[test]
    fn zoom_in_stops_at_the_near_plane() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let near = c.camera().znear;
        let mut last = c.camera().distance();
        for _ in 0..20 {
            c.zoom(true);
            let d = c.camera().distance();
            assert!(d <= last);
            assert!(d >= near - 1e-5);
            last = d;
        }
        assert!((last - near).abs() < 1e-5);
    }

    #[test]
    fn zoom_in_moves_one_unit_when_far() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.zoom(true);
        assert!(c.camera().position.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-6));
    }

    #[test]
    fn zoom_out_adds_exactly_one_unit() {
        let mut c = controller_at(Vec3::new(1.0, 1.0, 1.0), Vec3::ZERO);
        let mut last = c.camera().distance();
        for _ in 0..10 {
            c.zoom(false);
            let d = c.camera().distance();
            assert!((d - last - 1.0).abs() < EPS);
            last = d;
        }
    }

    #[test]
    fn zoom_on_target_is_skipped() {
        let mut c = controller_at(Vec3::ZERO, Vec3::ZERO);
        c.zoom(false);
        c.zoom(true);
        assert_eq!(c.camera().position, Vec3::ZERO);
    }

    #[test]
    fn zoom_works_during_a_gesture() {
        let mut c = controller_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        c.begin_pan(500.0);
        c.zoom(false);
        assert!((c.camera().distance() - 6.0).abs() < EPS);
        assert!(c.is_panning());
    }

    #[test]
    fn zoom_step_comes_from_options() {
        let options = CameraOptions {
            zoom_step: 0.25,
            ..CameraOptions::default()
        };
        let mut c = OrbitController::from_options(&options);
        let before = c.camera().distance();
        c.zoom(false);
        assert!((c.camera().distance() - before - 0.25).abs() < EPS);
    }
}
