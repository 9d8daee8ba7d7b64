//! Two uniformly tinted cubes weaving past each other on sine and cosine
//! orbits, seen from a fixed camera.

use phalanx::{AppConfig, Shape, Vec3, Volume, run_with_config};

fn main() {
    run_with_config(
        AppConfig::new()
            .title("Tutorial 4")
            // CornflowerBlue
            .clear_color(0.392, 0.584, 0.929),
        |ctx| {
            ctx.scene
                .push(Volume::new(Shape::ColorCube(Vec3::new(1.0, 0.0, 0.0))));
            ctx.scene
                .push(Volume::new(Shape::ColorCube(Vec3::new(0.0, 0.0, 1.0))));

            move |frame| {
                let t = frame.time;
                let volumes = frame.scene.volumes_mut();

                volumes[0].position = Vec3::new(0.3, -0.5 + t.sin(), -3.0);
                volumes[0].rotation = Vec3::new(0.55 * t, 0.25 * t, 0.0);
                volumes[0].scale = Vec3::splat(0.5);

                volumes[1].position = Vec3::new(-1.0, 0.5 + t.cos(), -2.0);
                volumes[1].rotation = Vec3::new(0.25 * t, 0.35 * t, 0.0);
                volumes[1].scale = Vec3::splat(0.7);
            }
        },
    );
}
