use super::*;
use crate::kernel_table::{KernelTableBuilder, SupportPolicy};

fn geometry() -> IndexGeometry {
    IndexGeometry {
        cell_size: 1.0,
        w_cell_size: 1.0,
        w_planes: 5,
        grid_size: 64,
        support: 3,
        oversample: 8,
    }
}

/// Kernel offset for the given phases and w-plane with a support of 3.
fn kernel(frac_u: usize, frac_v: usize, w_plane: usize) -> usize {
    49 * (frac_u + 8 * (frac_v + 8 * w_plane))
}

// ---------------------------------------------------------------------------
// locate
// ---------------------------------------------------------------------------

#[test]
fn test_negative_non_integer_is_floored() {
    let o = geometry().locate(-2.3, 0.0, 0.0, 1.0);
    assert_eq!(o.col, 32 - 3, "anchor column must be floor(-2.3) + grid_size/2");
    // 8 * (-2.3 - -3) = 5.6 -> phase 5
    assert_eq!(o.kernel, kernel(5, 0, 2));
}

#[test]
fn test_negative_non_integer_v_is_floored() {
    let o = geometry().locate(0.0, -0.25, 0.0, 1.0);
    assert_eq!(o.row, 31);
    assert_eq!(o.col, 32);
    assert_eq!(o.kernel, kernel(0, 6, 2));
}

#[test]
fn test_positive_non_integer() {
    let o = geometry().locate(2.3, 1.5, 0.0, 1.0);
    assert_eq!(o.col, 34);
    assert_eq!(o.row, 33);
    assert_eq!(o.kernel, kernel(2, 4, 2));
}

#[test]
fn test_negative_integer_not_decremented() {
    let o = geometry().locate(-2.0, -5.0, 0.0, 1.0);
    assert_eq!(o.col, 30);
    assert_eq!(o.row, 27);
    assert_eq!(o.kernel, kernel(0, 0, 2));
}

#[test]
fn test_origin_maps_to_grid_centre() {
    let o = geometry().locate(0.0, 0.0, 0.0, 1.0);
    assert_eq!(
        o,
        GridOffset {
            row: 32,
            col: 32,
            kernel: kernel(0, 0, 2),
        }
    );
}

#[test]
fn test_w_plane_truncates_toward_zero() {
    let g = geometry();
    // Truncation, not floor: -0.5 stays on the centre plane.
    assert_eq!(g.locate(0.0, 0.0, -0.5, 1.0).kernel, kernel(0, 0, 2));
    assert_eq!(g.locate(0.0, 0.0, -1.5, 1.0).kernel, kernel(0, 0, 1));
    assert_eq!(g.locate(0.0, 0.0, 0.9, 1.0).kernel, kernel(0, 0, 2));
    assert_eq!(g.locate(0.0, 0.0, 2.1, 1.0).kernel, kernel(0, 0, 4));
}

#[test]
fn test_frequency_scales_coordinates() {
    let g = geometry();
    // u * freq / cell_size = 2.5
    let o = g.locate(1.25, 0.0, 0.0, 2.0);
    assert_eq!(o.col, 34);
    assert_eq!(o.kernel, kernel(4, 0, 2));
    // w * freq / w_cell_size = 1.2
    let o = g.locate(0.0, 0.0, 0.6, 2.0);
    assert_eq!(o.kernel, kernel(0, 0, 3));
}

#[test]
fn test_cell_size_divides_coordinates() {
    let g = IndexGeometry {
        cell_size: 4.0,
        ..geometry()
    };
    let o = g.locate(-10.0, 6.0, 0.0, 1.0);
    // -2.5 -> floor -3, phase trunc(8 * 0.5) = 4
    assert_eq!(o.col, 29);
    // 1.5 -> 1, phase 4
    assert_eq!(o.row, 33);
    assert_eq!(o.kernel, kernel(4, 4, 2));
}

#[test]
fn test_phase_always_within_oversample() {
    let g = geometry();
    let mut u = -7.0;
    while u < 7.0 {
        let o = g.locate(u, 0.0, 0.0, 1.0);
        let frac_u = (o.kernel / 49) % 8;
        assert!(frac_u < 8);
        let cell = o.col as f64 - 32.0;
        assert!(cell <= u && u < cell + 1.0, "u={u} anchored to {cell}");
        u += 0.037;
    }
}

// ---------------------------------------------------------------------------
// build_offset_index
// ---------------------------------------------------------------------------

#[test]
fn test_build_is_sample_major() {
    let g = geometry();
    let u = [1.0, -1.5];
    let v = [0.5, 2.0];
    let w = [0.0, 1.0];
    let freqs = [1.0, 2.0];
    let index = build_offset_index(&u, &v, &w, &freqs, &g);

    assert_eq!(index.len(), 4);
    assert_eq!(index.channels(), 2);
    for i in 0..2 {
        for c in 0..2 {
            let expected = g.locate(u[i], v[i], w[i], freqs[c]);
            assert_eq!(index.get(i, c), expected);
            assert_eq!(index[i * 2 + c], expected);
        }
    }
}

#[test]
fn test_build_component_views() {
    let g = geometry();
    let index = build_offset_index(&[-2.3, 0.0], &[0.0, 1.0], &[0.0, 0.0], &[1.0], &g);
    assert_eq!(index.anchor_cols().collect::<Vec<_>>(), vec![29, 32]);
    assert_eq!(index.anchor_rows().collect::<Vec<_>>(), vec![32, 33]);
    assert_eq!(
        index.kernel_offsets().collect::<Vec<_>>(),
        vec![kernel(5, 0, 2), kernel(0, 0, 2)]
    );
}

#[test]
fn test_build_empty() {
    let index = build_offset_index(&[], &[], &[], &[1.0], &geometry());
    assert!(index.is_empty());
}

#[test]
#[should_panic(expected = "u and v must have equal length")]
fn test_build_length_mismatch_panics() {
    build_offset_index(&[0.0], &[], &[0.0], &[1.0], &geometry());
}

#[test]
fn test_geometry_for_table() {
    let table = KernelTableBuilder::new(10.0, 100.0, 5)
        .with_support_policy(SupportPolicy::Fixed(3))
        .build(&[1.0]);
    let g = IndexGeometry::for_table(&table, 10.0, 64);
    assert_eq!(g.support, 3);
    assert_eq!(g.w_planes, 5);
    assert_eq!(g.oversample, 8);
    assert!((g.w_cell_size - table.w_cell_size()).abs() < 1e-12);

    // The locator's offsets agree with the table's own layout.
    let o = g.locate(-23.0, 4.0, 0.0, 1.0);
    assert_eq!(o.kernel, table.base_offset(5, 3, 2));
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

#[test]
fn test_first_out_of_bounds() {
    let table = KernelTableBuilder::new(1.0, 1.0, 5)
        .with_support_policy(SupportPolicy::Fixed(3))
        .build(&[1.0]);
    let g = IndexGeometry::for_table(&table, 1.0, 64);

    let inside = build_offset_index(&[0.0, 20.0], &[0.0, 20.0], &[0.0, 0.0], &[1.0], &g);
    assert_eq!(inside.first_out_of_bounds(&table, 64), None);

    // Column 32 + 29 = 61: 61 + 3 is past the last column.
    let right = build_offset_index(&[0.0, 29.0], &[0.0, 0.0], &[0.0, 0.0], &[1.0], &g);
    assert_eq!(right.first_out_of_bounds(&table, 64), Some(1));

    // Row 32 + 26 = 58: rows 58..65 exceed the grid.
    let bottom = build_offset_index(&[0.0, 0.0], &[26.0, 0.0], &[0.0, 0.0], &[1.0], &g);
    assert_eq!(bottom.first_out_of_bounds(&table, 64), Some(0));

    // Negative anchors wrap and must be reported, not overflow.
    let left = build_offset_index(&[-40.0], &[0.0], &[0.0], &[1.0], &g);
    assert_eq!(left.first_out_of_bounds(&table, 64), Some(0));

    // w outside the plane range.
    let deep = build_offset_index(&[0.0], &[0.0], &[-1000.0], &[1.0], &g);
    assert_eq!(deep.first_out_of_bounds(&table, 64), Some(0));
}
