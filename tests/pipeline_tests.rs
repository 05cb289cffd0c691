mod common;

use level_creator::image::color_space::color_distance;
use level_creator::image::geom::Rect;
use level_creator::level::{LineImage, extract_regions};
use level_creator::{ImagePair, LevelCreator, LevelError, LevelSettings, Pixmap, Rgba};

#[test]
fn test_grid_produces_one_region_per_cell() {
    let pair = common::grid_pair(4, 3, 12);
    let level = LevelCreator::default().process(&pair).expect("Failed to process grid");

    assert_eq!(level.regions.len(), 12);
    for (i, region) in level.regions.iter().enumerate() {
        assert_eq!(region.index, i);
        assert_eq!((region.width, region.height), (12, 12));
        assert_eq!(region.pixel_count(), 144);
    }
    // Column-major seed order: the second region sits above the first.
    assert_eq!(level.regions[0].min_x, level.regions[1].min_x);
    assert!(level.regions[1].min_y > level.regions[0].min_y);
}

#[test]
fn test_processing_is_deterministic() {
    let pair = common::grid_pair(5, 4, 9);
    let creator = LevelCreator::new(LevelSettings::default().with_color_merge_threshold(2.0));

    let a = creator.process(&pair).expect("first run");
    let b = creator.process(&pair.clone()).expect("second run");

    assert_eq!(a.bytes, b.bytes);
    assert_eq!(a.id, b.id);
    assert_eq!(a.atlas_pngs, b.atlas_pngs);
}

#[test]
fn test_regions_partition_non_line_pixels() {
    let pair = common::grid_pair(3, 3, 10);
    let settings = LevelSettings::default().with_region_size_threshold(1.0);
    let level = LevelCreator::new(settings.clone()).process(&pair).expect("process");

    let line_image = LineImage::from_rgba(&pair.lines, settings.line_threshold);
    let (w, h) = pair.lines.dimensions();
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let owners = level.regions.iter().filter(|r| r.contains(x, y)).count();
            let alpha = line_image.pixel(x, y).expect("in bounds").alpha;
            if line_image.is_line(alpha) {
                assert_eq!(owners, 0, "line pixel ({x},{y}) owned by a region");
            } else {
                assert_eq!(owners, 1, "pixel ({x},{y}) owned by {owners} regions");
            }
        }
    }
}

#[test]
fn test_palette_entries_are_pairwise_distinct() {
    let pair = common::grid_pair(6, 4, 8);
    for threshold in [0.0f32, 0.05, 0.1, 2.0, 5.0, 40.0] {
        let settings = LevelSettings::default().with_color_merge_threshold(threshold);
        let level = LevelCreator::new(settings).process(&pair).expect("process");

        for (i, a) in level.colors.iter().enumerate() {
            for b in &level.colors[i + 1..] {
                assert_ne!(a, b);
                assert!(
                    color_distance(*a, *b) > threshold,
                    "{a:?} and {b:?} are within {threshold}"
                );
            }
        }
    }
}

#[test]
fn test_merge_threshold_controls_palette_size() {
    let pair = common::grid_pair(4, 2, 8);

    let exact = LevelSettings::default().with_color_merge_threshold(0.0);
    let level = LevelCreator::new(exact).process(&pair).expect("process");
    assert_eq!(level.colors.len(), 8);

    let generous = LevelSettings::default().with_color_merge_threshold(2.0);
    let level = LevelCreator::new(generous).process(&pair).expect("process");
    assert_eq!(level.colors.len(), 4);
    assert_eq!(level.colors[0], common::CELL_COLORS[0].rgb());
}

#[test]
fn test_near_reds_share_one_palette_entry() {
    // Two cells separated by a vertical line, red and 99% red.
    let lines = Pixmap::from_fn(21, 10, |x, _| if x == 10 { Rgba::opaque(0, 0, 0) } else { Rgba::transparent() });
    let colored = Pixmap::from_fn(21, 10, |x, _| if x < 10 { Rgba::opaque(255, 0, 0) } else { Rgba::opaque(252, 0, 0) });

    let settings = LevelSettings::default().with_color_merge_threshold(5.0);
    let level = LevelCreator::new(settings)
        .process(&ImagePair::new(colored, lines))
        .expect("process");

    assert_eq!(level.regions.len(), 2);
    assert_eq!(level.colors.len(), 1);
    assert_eq!(level.regions[0].color_index, 0);
    assert_eq!(level.regions[1].color_index, 0);
}

#[test]
fn test_atlas_placements_keep_padding() {
    let pair = common::grid_pair(8, 6, 14);
    let settings = LevelSettings::default().with_region_size_threshold(1.0);
    let pad = settings.pack.padding as i32;
    let level = LevelCreator::new(settings).process(&pair).expect("process");

    let packed: usize = level.atlases.iter().map(|a| a.packed.len()).sum();
    assert_eq!(packed, level.regions.len());

    for (atlas_index, atlas) in level.atlases.iter().enumerate() {
        let bounds = Rect::new(0, 0, atlas.width, atlas.height);
        for (i, a) in atlas.packed.iter().enumerate() {
            assert!(bounds.contains_rect(&a.rect()));
            assert_eq!(level.regions[a.region].atlas_index, atlas_index as i32);
            for b in &atlas.packed[i + 1..] {
                assert!(
                    !a.rect().inflate(pad).overlaps(&b.rect().inflate(pad)),
                    "padded boxes of regions {} and {} intersect",
                    a.region,
                    b.region
                );
            }
        }
    }
}

#[test]
fn test_number_area_lies_inside_region() {
    // Irregular shapes: a ring and a diagonal band.
    let lines = Pixmap::from_fn(40, 40, |x, y| {
        let (dx, dy) = (x as i32 - 20, y as i32 - 20);
        let d2 = dx * dx + dy * dy;
        let ring = (140..=196).contains(&d2);
        let band = (x as i32 - y as i32).abs() == 30;
        if ring || band { Rgba::opaque(0, 0, 0) } else { Rgba::transparent() }
    });
    let colored = Pixmap::from_pixel(40, 40, Rgba::opaque(10, 120, 200));
    let settings = LevelSettings::default().with_region_size_threshold(1.0);
    let level = LevelCreator::new(settings)
        .process(&ImagePair::new(colored, lines))
        .expect("process");

    assert!(level.regions.len() >= 2);
    for region in &level.regions {
        let area = region.number_area;
        assert!(area.x0 >= 0 && area.y0 >= 0);
        assert!(area.x1 < region.width as i32 && area.y1 < region.height as i32);
        for y in area.y0..=area.y1 {
            for x in area.x0..=area.x1 {
                assert!(region.is_filled(x as u32, y as u32), "region {} cell ({x},{y})", region.index);
            }
        }
    }
}

#[test]
fn test_open_square_scenario() {
    let pair = ImagePair::new(Pixmap::from_pixel(10, 10, Rgba::opaque(1, 2, 3)), Pixmap::new(10, 10));
    let level = LevelCreator::new(LevelSettings::default().with_region_size_threshold(100.0))
        .process(&pair)
        .expect("process");

    assert_eq!(level.regions.len(), 1);
    let region = &level.regions[0];
    assert_eq!((region.min_x, region.min_y, region.width, region.height), (0, 0, 10, 10));
    assert_eq!(region.number_area.as_array(), [0, 0, 9, 9]);
}

#[test]
fn test_small_pocket_is_discarded() {
    // 5 open pixels boxed in at the bottom-left corner, the rest is open.
    let lines = Pixmap::from_fn(20, 20, |x, y| {
        let wall = (y == 1 && x <= 5) || (y == 0 && x == 5);
        if wall { Rgba::opaque(0, 0, 0) } else { Rgba::transparent() }
    });
    let line_image = LineImage::from_rgba(&lines, 200.0);
    let regions = extract_regions(&line_image, 24.0);

    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].index, 0);
    assert!(!regions[0].contains(0, 0));
    assert_eq!(regions[0].pixel_count(), 400 - 7 - 5);
}

#[test]
fn test_large_regions_force_a_big_atlas() {
    // Five 600x600 open squares separated by vertical lines.
    let width = 5 * 600 + 4;
    let lines = Pixmap::from_fn(width, 600, |x, _| {
        if x % 601 == 600 { Rgba::opaque(0, 0, 0) } else { Rgba::transparent() }
    });
    let colored = Pixmap::from_pixel(width, 600, Rgba::opaque(90, 90, 90));
    let level = LevelCreator::default()
        .process(&ImagePair::new(colored, lines))
        .expect("process");

    assert_eq!(level.regions.len(), 5);
    assert!(level.atlases.iter().all(|a| a.width >= 1024 && a.height >= 1024));
    assert_eq!(level.atlases.len(), 1);
    assert_eq!((level.atlases[0].width, level.atlases[0].height), (2048, 2048));
}

#[test]
fn test_oversized_region_is_reported() {
    let pair = ImagePair::new(Pixmap::from_pixel(600, 8, Rgba::white()), Pixmap::new(600, 8));
    let settings = LevelSettings::default().with_max_pack_size(9);
    match LevelCreator::new(settings).process(&pair) {
        Err(LevelError::RegionTooLargeForAtlas { region, width, max_size, .. }) => {
            assert_eq!(region, 0);
            assert_eq!(width, 600);
            assert_eq!(max_size, 512);
        }
        other => panic!("expected RegionTooLargeForAtlas, got {other:?}"),
    }
}

#[test]
fn test_ignore_white_leaves_region_blank() {
    let pair = ImagePair::new(Pixmap::from_pixel(10, 10, Rgba::white()), Pixmap::new(10, 10));

    let level = LevelCreator::default().process(&pair).expect("process");
    assert_eq!(level.regions[0].color_index, 0);

    let settings = LevelSettings::default().with_ignore_white_regions(true);
    let level = LevelCreator::new(settings).process(&pair).expect("process");
    assert_eq!(level.regions[0].color_index, -1);
    assert!(level.colors.is_empty());
}
