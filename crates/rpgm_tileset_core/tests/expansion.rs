//! Full traversals of every layout

use rpgm_tileset_core::{
    expand, expand_indexed, placements, AutotileKind, LayoutKind, Quadrant, SubtileCoord,
};
use std::collections::{HashMap, HashSet};

fn blank_slots(kind: LayoutKind) -> usize {
    kind.layout()
        .rows()
        .iter()
        .flat_map(|row| row.iter())
        .map(|k| k.table().empty_slots())
        .sum()
}

#[test]
fn grid_dimensions_match_layout_tables() {
    let expected = [
        (LayoutKind::A1, (102, 56)),
        (LayoutKind::A2, (112, 56)),
        (LayoutKind::A3, (64, 32)),
        (LayoutKind::A4, (112, 66)),
    ];

    for (kind, size) in expected {
        let layout = kind.layout();
        let grid = expand_indexed(layout, layout.input_subtile_width, Some);
        assert_eq!((grid.width(), grid.height()), size, "{kind}");
    }
}

#[test]
fn no_cell_is_written_twice() {
    for kind in LayoutKind::ALL {
        let plan = placements(kind.layout());
        let mut writes: HashMap<(u32, u32), usize> = HashMap::new();
        for p in &plan {
            *writes.entry((p.dest_x, p.dest_y)).or_default() += 1;
        }
        assert!(writes.values().all(|&n| n == 1), "{kind} writes a cell twice");
    }
}

#[test]
fn written_cells_plus_blank_slots_fill_used_area() {
    for kind in LayoutKind::ALL {
        let layout = kind.layout();
        let grid = expand_indexed(layout, layout.input_subtile_width, Some);

        let written = placements(layout).len();
        assert_eq!(grid.populated_count(), written);
        assert_eq!(grid.missing_sources(), 0);

        let used_tiles: usize = layout
            .rows()
            .iter()
            .flat_map(|row| row.iter())
            .map(|k| (k.table().output_width * k.table().output_height) as usize)
            .sum();
        assert_eq!(written + blank_slots(kind) * 4, used_tiles * 4, "{kind}");
    }
}

#[test]
fn a2_has_every_terrain_tile() {
    // 32 terrain blocks, 47 tiles each
    assert_eq!(placements(LayoutKind::A2.layout()).len(), 32 * 47 * 4);
    assert_eq!(blank_slots(LayoutKind::A2), 64);
}

#[test]
fn sources_stay_inside_the_sheet() {
    for kind in LayoutKind::ALL {
        let layout = kind.layout();
        for p in placements(layout) {
            assert!(p.source.x < layout.input_subtile_width, "{kind}");
            assert!(p.source.y < layout.input_subtile_height, "{kind}");
        }
    }
}

#[test]
fn every_source_subtile_of_a3_is_used() {
    let layout = LayoutKind::A3.layout();
    let used: HashSet<SubtileCoord> = placements(layout).iter().map(|p| p.source).collect();
    assert_eq!(
        used.len(),
        (layout.input_subtile_width * layout.input_subtile_height) as usize
    );
}

#[test]
fn expansion_is_deterministic() {
    let layout = LayoutKind::A4.layout();
    let marker = |x: u32, y: u32| Some(format!("{x}:{y}"));
    let first = expand(layout, marker);
    let second = expand(layout, marker);
    assert_eq!(first, second);
}

#[test]
fn a3_quadrants_follow_first_composition() {
    let layout = LayoutKind::A3.layout();
    let grid = expand(layout, |x, y| Some((x, y)));

    let composition = AutotileKind::Wall.table().composition(0, 0).unwrap();
    for (quadrant, local) in composition.quadrants() {
        let (dx, dy) = quadrant.offset();
        assert_eq!(grid.get(dx, dy), Some(&(local.x, local.y)));
    }

    assert_eq!(grid.get(0, 0), Some(&(0, 0)));
    assert_eq!(grid.get(1, 1), Some(&(1, 1)));
    assert_eq!(grid.get(1, 0), Some(&(1, 0)));
    assert_eq!(grid.get(0, 1), Some(&(0, 1)));
}

#[test]
fn terrain_blank_slots_stay_empty() {
    let layout = LayoutKind::A2.layout();
    let grid = expand_indexed(layout, 32, Some);

    // Slot 41 is (6, 5) and slot 48 is (6, 6) of each 7x7 block
    for (tx, ty) in [(6, 5), (6, 6)] {
        for (dx, dy) in Quadrant::ALL.map(Quadrant::offset) {
            assert_eq!(grid.get(tx * 2 + dx, ty * 2 + dy), None);
        }
    }
    // Neighbouring slot 40 is drawn
    assert!(grid.get(5 * 2, 5 * 2).is_some());
}

#[test]
fn a1_unchanged_blocks_copy_their_tiles() {
    let layout = LayoutKind::A1.layout();
    let grid = expand(layout, |x, y| Some((x, y)));

    // Column 7 of row 0 is unchanged, read from subtiles x 28..32
    let origin_x = 7 * 14;
    for y in 0..6 {
        for x in 0..4 {
            assert_eq!(grid.get(origin_x + x, y), Some(&(28 + x, y)));
        }
    }
    // Nothing lies to the right of a full 51-tile row
    assert_eq!(grid.width(), origin_x + 4);
}
