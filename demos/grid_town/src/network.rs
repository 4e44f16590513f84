//! Synthetic street grid shared by both runs.

use cf_core::{GeoPoint, RawNodeId};
use cf_spatial::{Bounds, RawNode, RawWay, RoadNetwork, RoadNetworkBuilder};

/// Degrees between neighbouring intersections (~55 m north-south).
const SPACING_DEG: f64 = 0.0005;

const ORIGIN_LAT: f64 = 52.5000;
const ORIGIN_LON: f64 = 13.4000;

/// Build a `size × size` grid of streets around a fixed origin.
///
/// Every row and every column is one way.  The map bounds sit half a
/// block outside the outermost streets so all intersections are inside.
pub fn build_grid(size: usize) -> RoadNetwork {
    let raw = |row: usize, col: usize| RawNodeId((row * size + col) as i64);

    let nodes: Vec<RawNode> = (0..size)
        .flat_map(|row| (0..size).map(move |col| (row, col)))
        .map(|(row, col)| RawNode {
            id:  raw(row, col),
            pos: GeoPoint::new(
                ORIGIN_LAT + row as f64 * SPACING_DEG,
                ORIGIN_LON + col as f64 * SPACING_DEG,
            ),
        })
        .collect();

    let rows = (0..size).map(|row| (0..size).map(|col| raw(row, col)).collect());
    let cols = (0..size).map(|col| (0..size).map(|row| raw(row, col)).collect());
    let ways: Vec<RawWay> = rows
        .chain(cols)
        .enumerate()
        .map(|(i, refs)| RawWay { id: i as i64, refs })
        .collect();

    let half = SPACING_DEG / 2.0;
    let extent = (size.saturating_sub(1)) as f64 * SPACING_DEG;
    let bounds = Bounds::new(
        ORIGIN_LAT + extent + half,
        ORIGIN_LAT - half,
        ORIGIN_LON - half,
        ORIGIN_LON + extent + half,
    );
    RoadNetworkBuilder::from_parts(&nodes, &ways, bounds).build()
}
