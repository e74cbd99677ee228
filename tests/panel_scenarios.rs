//! End-to-end layout frames over nested panels.

use mpf_layout::{
    Brush, Color, DOCK, Dock, DockLayout, DockPanel, Element, ElementTrait, GRID_COLUMN, Grid,
    GridLayout, GridLength, LayoutConfig, LayoutContext, Layoutable, Orientation, Rect, Size,
    StackLayout, StackPanel, WrapLayout, WrapPanel, hit_test, update_frame,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn docked(mut element: Box<dyn ElementTrait>, dock: Dock) -> Box<dyn ElementTrait> {
    element.core_mut().set_attached(DOCK, dock);
    element
}

fn grid_cell(column: i32, width: f32) -> Box<dyn ElementTrait> {
    let mut element = Element::new(width, 16.0);
    element.core_mut().set_attached(GRID_COLUMN, column);
    Box::new(element)
}

struct Screen {
    root: DockPanel,
    header: u64,
    list: u64,
    rows: Vec<u64>,
    content: u64,
}

/// Header on top, a scrolling list on the left, and a two-column grid filling the rest.
fn screen() -> Screen {
    let mut root = DockPanel::new(DockLayout::default());
    root.set_background(Some(Brush::solid(Color::rgb(16, 16, 24))));

    let header = Box::new(Element::new(10.0, 20.0));
    let header_id = header.id();
    root.add_child(docked(header, Dock::Top));

    let mut list = StackPanel::new(StackLayout::scrollable(Orientation::Vertical));
    let rows = (0..10)
        .map(|_| {
            let mut row = Element::new(40.0, 30.0);
            row.core_mut().set_focusable(true);
            let id = row.id();
            list.add_child(Box::new(row));
            id
        })
        .collect();
    let list_id = list.id();
    root.add_child(docked(Box::new(list), Dock::Left));

    let mut content = Grid::new(GridLayout::new(
        [GridLength::auto(), GridLength::star(1.0)],
        [GridLength::auto()],
    ));
    content.add_child(grid_cell(0, 50.0));
    content.add_child(grid_cell(1, 80.0));
    let content_id = content.id();
    root.add_child(Box::new(content));

    Screen {
        root,
        header: header_id,
        list: list_id,
        rows,
        content: content_id,
    }
}

fn bounds(root: &DockPanel, id: u64) -> Option<Rect> {
    mpf_layout::find_element(root, id).map(|element| element.actual_bounds())
}

#[test]
fn nested_panels_share_the_viewport() {
    init_tracing();
    let mut screen = screen();
    let viewport = Rect::new(0.0, 0.0, 300.0, 200.0);
    update_frame(&mut screen.root, viewport, &LayoutContext::default());

    assert_eq!(bounds(&screen.root, screen.header), Some(Rect::new(0.0, 0.0, 300.0, 20.0)));
    assert_eq!(bounds(&screen.root, screen.list), Some(Rect::new(0.0, 20.0, 40.0, 180.0)));
    assert_eq!(bounds(&screen.root, screen.content), Some(Rect::new(40.0, 20.0, 260.0, 180.0)));

    let content = screen
        .root
        .child(screen.content)
        .and_then(|child| child.as_any().downcast_ref::<Grid>())
        .expect("grid child");
    assert_eq!(content.layout().column_definitions.get_length(0, 1), 50.0);
    assert_eq!(content.layout().column_definitions.get_length(1, 1), 210.0);

    let list = screen
        .root
        .child(screen.list)
        .and_then(|child| child.as_any().downcast_ref::<StackPanel>())
        .expect("stack child");
    assert_eq!(list.layout().last_visible(), Some(5));
    assert_eq!(list.render_order(), screen.rows[..6].to_vec());
}

#[test]
fn scrolling_a_nested_list_reaches_the_next_frame() {
    let mut screen = screen();
    let viewport = Rect::new(0.0, 0.0, 300.0, 200.0);
    let ctx = LayoutContext::default();
    update_frame(&mut screen.root, viewport, &ctx);

    if let Some(list) = screen
        .root
        .child_mut(screen.list)
        .and_then(|child| child.as_any_mut().downcast_mut::<StackPanel>())
    {
        list.set_scroll_index(3, true);
    }
    update_frame(&mut screen.root, viewport, &ctx);

    assert_eq!(bounds(&screen.root, screen.rows[3]).map(|b| b.y), Some(20.0));
    assert_eq!(bounds(&screen.root, screen.rows[0]).map(|b| b.y), Some(-70.0));
    assert_eq!(hit_test(&screen.root, 10.0, 25.0), Some(screen.rows[3]));
    // Scrolled-out rows are not reachable through the list.
    assert_eq!(hit_test(&screen.root, 10.0, 5.0), Some(screen.header));
}

#[test]
fn render_state_is_readable_from_another_thread() {
    let mut screen = screen();
    let handle = screen.root.render_handle();
    update_frame(&mut screen.root, Rect::new(0.0, 0.0, 300.0, 200.0), &LayoutContext::default());

    let expected = vec![screen.header, screen.list, screen.content];
    let (order, background) = std::thread::spawn(move || (handle.render_order(), handle.background()))
        .join()
        .expect("reader thread");
    assert_eq!(order, expected);
    let background = background.expect("root has a background brush");
    assert_eq!(background.bounds(), Rect::new(0.0, 0.0, 300.0, 200.0));
}

#[test]
fn zoom_scales_pixel_definitions() {
    let config: LayoutConfig = serde_json::from_str(r#"{ "zoom_x": 2.0 }"#).expect("config json");
    assert!(config.validate().is_ok());
    assert_eq!(config.zoom_y, 1.0);

    let mut grid = Grid::new(GridLayout::new(
        [GridLength::pixel(40.0), GridLength::star(1.0)],
        [GridLength::star(1.0)],
    ));
    grid.add_child(grid_cell(0, 10.0));
    update_frame(&mut grid, Rect::new(0.0, 0.0, 400.0, 100.0), &LayoutContext::new(config));
    assert_eq!(grid.layout().column_definitions.get_length(0, 1), 80.0);
    assert_eq!(grid.layout().column_definitions.get_length(1, 1), 320.0);
}

#[test]
fn wrap_lines_match_between_measure_and_arrange() {
    let mut wrap = WrapPanel::new(WrapLayout::new(Orientation::Horizontal));
    for width in [35.0, 20.0, 50.0, 45.0, 10.0, 70.0, 5.0] {
        wrap.add_child(Box::new(Element::new(width, width / 5.0)));
    }
    let ctx = LayoutContext::default();
    let desired = wrap.measure(Size::new(100.0, f32::NAN), &ctx);
    wrap.arrange(Rect::new(0.0, 0.0, 100.0, desired.height), &ctx);

    let layout = wrap.layout();
    assert_eq!(layout.measured_lines(), layout.arranged_lines());
    let thickness: f32 = layout.arranged_lines().iter().map(|line| line.thickness).sum();
    assert_eq!(thickness, desired.height);
}
