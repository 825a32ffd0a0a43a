pub mod bars;
pub mod coords;
pub mod filmstrip;
pub mod format;
pub mod hit;
pub mod layout;
pub mod ticks;

pub use bars::{action_label, build_bars, BarKind, TimelineBar};
pub use coords::{position_to_time, time_to_position, Boundaries};
pub use filmstrip::{frame_at, page_frame_at};
pub use format::{ms_to_string, trim_right};
pub use hit::find_hovered_bar;
pub use layout::TimelineLayout;
pub use ticks::{tick_step, ticks, Tick};
