use std::{env, time::Instant};

use env_logger::Builder;
use image::open;
use log::info;
use tcanny::{detect_gray8, visualize_edges, CannyParams};

fn main() {
    Builder::from_default_env().format_timestamp_nanos().init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "test_image/edge-small.png".to_string());
    let img = open(&path).unwrap().to_luma8();
    info!("loaded {path}: {}x{}", img.width(), img.height());

    let edges_params = CannyParams {
        sigma: 1.5,
        mode: 0,
        ..CannyParams::default()
    };
    let instance = Instant::now();
    let edges = detect_gray8(&img, &edges_params).unwrap();
    info!("edge map took {:?}", instance.elapsed());

    let count = edges.pixels().filter(|p| p.0[0] != 0).count();
    info!("{count} edge pixels");

    let magnitude_params = CannyParams {
        mode: 1,
        gmmax: 30.0,
        ..edges_params.clone()
    };
    let instance = Instant::now();
    let magnitude = detect_gray8(&img, &magnitude_params).unwrap();
    info!("magnitude map took {:?}", instance.elapsed());

    edges.save("test_image/edge_map.png").unwrap();
    magnitude.save("test_image/magnitude_map.png").unwrap();
    visualize_edges(&img, &edges)
        .save("test_image/edge_overlay.png")
        .unwrap();
}
