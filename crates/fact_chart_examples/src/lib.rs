#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    compose_chart_sheet, compose_grid, init_tracing, load_chart_data, write_png, SheetStyle,
};
