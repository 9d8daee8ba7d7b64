//! One cube tumbling in place, corner colors interpolating across its faces.

use phalanx::{AppConfig, Shape, Vec3, Volume, run_with_config};

fn main() {
    run_with_config(
        AppConfig::new()
            .title("Tutorial 3")
            // CornflowerBlue
            .clear_color(0.392, 0.584, 0.929),
        |ctx| {
            ctx.scene.push(
                Volume::new(Shape::Cube)
                    .at([0.0, 0.0, -3.0])
                    .scaled([1.6, 1.6, 1.6]),
            );

            move |frame| {
                let cube = &mut frame.scene.volumes_mut()[0];
                cube.rotation = Vec3::new(0.15 * frame.time, 0.55 * frame.time, 0.0);
            }
        },
    );
}
