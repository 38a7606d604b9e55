use glam::Vec3;
use vantage::math::Aabb;
use vantage::model::{InMemoryLoader, ModelData};
use vantage::options::ViewportOptions;
use vantage::Viewer;

/// Demo scene: a CAD block next to a wide, flat point-cloud scan.
fn demo_loader() -> InMemoryLoader {
    InMemoryLoader::new()
        .with_model(
            1,
            1,
            ModelData::Cad {
                bounds: Aabb::new(Vec3::ZERO, Vec3::splat(10.0)),
            },
        )
        .with_model(
            2,
            1,
            ModelData::PointCloud {
                bounds: Aabb::new(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(40.0, 2.0, 40.0)),
                point_budget: 3_000_000,
            },
        )
}

fn main() {
    env_logger::init();

    // Optional first argument: a TOML options preset
    let options = match std::env::args().nth(1) {
        Some(path) => match ViewportOptions::load(std::path::Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => ViewportOptions::default(),
    };

    let result = Viewer::builder()
        .with_loader(demo_loader())
        .with_model(1, 1)
        .with_model(2, 1)
        .with_options(options)
        .build()
        .run();

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
