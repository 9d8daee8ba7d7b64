//! The full tutorial scene: two animated cubes, mouse look, and
//! `W A S D Q E` movement with Escape to exit. The volume shader is loaded
//! from disk next to the demo instead of the compiled-in default.

use phalanx::{AppConfig, KeyCode, Shape, Vec3, Volume, run_with_config};

const MOVE_STEP: f32 = 0.1;

fn main() {
    run_with_config(
        AppConfig::new()
            .title("OpenTkTutorial5")
            // Cornsilk
            .clear_color(1.0, 0.973, 0.863),
        |ctx| {
            ctx.volume_shader_from_path("demos/shaders/volume.wgsl");

            ctx.scene.push(Volume::new(Shape::Cube));
            ctx.scene.push(Volume::new(Shape::Cube));

            move |frame| {
                if frame.input.key_pressed(KeyCode::Escape) {
                    frame.exit();
                    return;
                }

                let t = frame.time;
                let volumes = frame.scene.volumes_mut();

                volumes[0].position = Vec3::new(0.3, -0.5 + t.sin(), -3.0);
                volumes[0].rotation = Vec3::new(0.55 * t, 0.25 * t, 0.0);
                volumes[0].scale = Vec3::splat(0.5);

                volumes[1].position = Vec3::new(-1.0, 0.5 + t.cos(), -2.0);
                volumes[1].rotation = Vec3::new(0.25 * t, 0.35 * t, 0.0);
                volumes[1].scale = Vec3::splat(0.7);

                // Look follows the pointer; deltas are previous-minus-current.
                // The cursor is not grabbed and focus is not checked, so any
                // motion over the window rotates the view.
                let look = -frame.input.pointer_delta();
                frame.camera.add_rotation(look.x, look.y);

                if frame.input.key_down(KeyCode::KeyW) {
                    frame.camera.move_by(0.0, MOVE_STEP, 0.0);
                }
                if frame.input.key_down(KeyCode::KeyA) {
                    frame.camera.move_by(-MOVE_STEP, 0.0, 0.0);
                }
                if frame.input.key_down(KeyCode::KeyS) {
                    frame.camera.move_by(0.0, -MOVE_STEP, 0.0);
                }
                if frame.input.key_down(KeyCode::KeyD) {
                    frame.camera.move_by(MOVE_STEP, 0.0, 0.0);
                }
                if frame.input.key_down(KeyCode::KeyQ) {
                    frame.camera.move_by(0.0, 0.0, MOVE_STEP);
                }
                if frame.input.key_down(KeyCode::KeyE) {
                    frame.camera.move_by(0.0, 0.0, -MOVE_STEP);
                }
            }
        },
    );
}
