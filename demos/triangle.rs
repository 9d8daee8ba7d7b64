//! A single triangle with red, green, and blue corners - the smallest
//! possible scene.

use phalanx::{AppConfig, Shape, Volume, run_with_config};

fn main() {
    run_with_config(
        AppConfig::new()
            .title("TestShaders")
            // AliceBlue
            .clear_color(0.941, 0.973, 1.0),
        |ctx| {
            ctx.scene.push(Volume::new(Shape::Triangle).at([0.0, 0.0, -2.0]));

            move |_frame| {}
        },
    );
}
