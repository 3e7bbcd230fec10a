pub mod controls;
pub mod layout;
pub mod render;
pub mod widgets;

pub use controls::{FilterState, GraphType, SelectOption, SliderMark, Tab};
pub use layout::build_layout;
pub use render::render_page;
pub use widgets::{ButtonAction, RangeSliderSpec, Widget};
