//! Watch a scene settle on the CPU reference world.
//!
//! Run with: cargo run -p sim --example settle

use sim::{Grid, World};

fn main() {
    let mut world = World::new(16, 12, 24).expect("config");
    world.set_cells(Grid::from_rows(&[
        "....SSSSSSSS....",
        "....SSSSSSSS....",
        "................",
        "................",
        "WWWWWWWWWWWWWWWW",
        "WWWWWWWWWWWWWWWW",
        "................",
        "................",
        "......LL........",
        "................",
        "................",
        "RRRRRRRRRRRRRRRR",
    ]));

    for frame in 0..120 {
        world.step();
        if frame % 20 == 19 {
            println!(
                "frame {:3}  particles {}",
                frame + 1,
                world.particle_count()
            );
            println!("{}", world.current_grid().render());
        }
    }
}
